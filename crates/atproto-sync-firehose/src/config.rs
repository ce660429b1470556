//! Configuration for a Firehose stream instance.

use std::time::Duration;

use atproto_sync_core::{EngineConfig, ReconnectStrategy, TlsOptions, DEFAULT_FLOW_CREDIT, DEFAULT_TIMEOUT};
use url::Url;

/// Configuration for one Firehose connection.
///
/// Built with chained setters; only `host` is required.
#[derive(Debug, Clone)]
pub struct FirehoseConfig {
    host: Url,
    timeout: Duration,
    flow_credit: u32,
    tls: TlsOptions,
    reconnect: ReconnectStrategy,
    cursor: Option<i64>,
}

impl FirehoseConfig {
    /// Creates a config targeting `host` (e.g. `wss://bsky.network`), with
    /// no starting cursor and every other field at its documented default.
    pub fn new(host: Url) -> Self {
        Self {
            host,
            timeout: DEFAULT_TIMEOUT,
            flow_credit: DEFAULT_FLOW_CREDIT,
            tls: TlsOptions::default(),
            reconnect: ReconnectStrategy::default(),
            cursor: None,
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

    /// Sets the starting `seq` to resume from.
    pub fn cursor(mut self, seq: i64) -> Self {
        self.cursor = Some(seq);
        self
    }

    pub(crate) fn starting_cursor(&self) -> Option<i64> {
        self.cursor
    }

    pub(crate) fn to_engine_config(&self) -> EngineConfig {
        EngineConfig::new(self.host.clone())
            .timeout(self.timeout)
            .flow_credit(self.flow_credit)
            .tls(self.tls)
            .reconnect(self.reconnect.clone())
    }
}
