//! Configuration for a Jetstream stream instance.

use std::time::Duration;

use atproto_sync_core::{EngineConfig, InitError, ReconnectStrategy, TlsOptions, DEFAULT_FLOW_CREDIT, DEFAULT_TIMEOUT};
use url::Url;

const MAX_WANTED_COLLECTIONS: usize = 100;
const MAX_WANTED_DIDS: usize = 10_000;

/// Configuration for one Jetstream connection.
///
/// Built with chained setters; only `host` is required. `wanted_collections`
/// and `wanted_dids` are validated against the server's documented limits at
/// `init` time, not here, so a config can still be built incrementally.
#[derive(Debug, Clone)]
pub struct JetstreamConfig {
    host: Url,
    timeout: Duration,
    flow_credit: u32,
    tls: TlsOptions,
    reconnect: ReconnectStrategy,
    cursor: Option<i64>,
    wanted_collections: Vec<String>,
    wanted_dids: Vec<String>,
    require_hello: bool,
    max_message_size_bytes: Option<u64>,
}

impl JetstreamConfig {
    /// Creates a config targeting `host` (e.g. `wss://jetstream2.us-west.bsky.network`).
    pub fn new(host: Url) -> Self {
        Self {
            host,
            timeout: DEFAULT_TIMEOUT,
            flow_credit: DEFAULT_FLOW_CREDIT,
            tls: TlsOptions::default(),
            reconnect: ReconnectStrategy::default(),
            cursor: None,
            wanted_collections: Vec::new(),
            wanted_dids: Vec::new(),
            require_hello: false,
            max_message_size_bytes: None,
        }
    }

    /// Overrides the connect/upgrade timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the per-connection flow credit.
    pub fn flow_credit(mut self, flow_credit: u32) -> Self {
        self.flow_credit = flow_credit;
        self
    }

    /// Overrides the TLS verification options.
    pub fn tls(mut self, tls: TlsOptions) -> Self {
        self.tls = tls;
        self
    }

    /// Overrides the reconnection strategy.
    pub fn reconnect(mut self, reconnect: ReconnectStrategy) -> Self {
        self.reconnect = reconnect;
        self
    }

    /// Sets the starting `time_us` cursor to resume from.
    pub fn cursor(mut self, time_us: i64) -> Self {
        self.cursor = Some(time_us);
        self
    }

    /// Sets the NSID collection filter (server limit: 100).
    pub fn wanted_collections(mut self, collections: Vec<String>) -> Self {
        self.wanted_collections = collections;
        self
    }

    /// Sets the DID filter (server limit: 10,000).
    pub fn wanted_dids(mut self, dids: Vec<String>) -> Self {
        self.wanted_dids = dids;
        self
    }

    /// Requests that the server hold the stream until the first
    /// `options_update` is sent.
    pub fn require_hello(mut self, require_hello: bool) -> Self {
        self.require_hello = require_hello;
        self
    }

    /// Caps the size of an individual decompressed ingress message.
    pub fn max_message_size_bytes(mut self, max: u64) -> Self {
        self.max_message_size_bytes = Some(max);
        self
    }

    pub(crate) fn validate(&self) -> Result<(), InitError> {
        if self.wanted_collections.len() > MAX_WANTED_COLLECTIONS {
            return Err(InitError::InvalidConfig(format!(
                "wanted_collections has {} entries, server limit is {MAX_WANTED_COLLECTIONS}",
                self.wanted_collections.len()
            )));
        }
        if self.wanted_dids.len() > MAX_WANTED_DIDS {
            return Err(InitError::InvalidConfig(format!(
                "wanted_dids has {} entries, server limit is {MAX_WANTED_DIDS}",
                self.wanted_dids.len()
            )));
        }
        Ok(())
    }

    pub(crate) fn starting_cursor(&self) -> Option<i64> {
        self.cursor
    }

    pub(crate) fn initial_collections(&self) -> Vec<String> {
        self.wanted_collections.clone()
    }

    pub(crate) fn initial_dids(&self) -> Vec<String> {
        self.wanted_dids.clone()
    }

    pub(crate) fn require_hello_flag(&self) -> bool {
        self.require_hello
    }

    pub(crate) fn max_message_size(&self) -> Option<u64> {
        self.max_message_size_bytes
    }

    pub(crate) fn to_engine_config(&self) -> EngineConfig {
        EngineConfig::new(self.host.clone())
            .timeout(self.timeout)
            .flow_credit(self.flow_credit)
            .tls(self.tls)
            .reconnect(self.reconnect.clone())
    }
}
