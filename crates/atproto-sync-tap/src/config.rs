//! Configuration for a Tap stream instance.

use std::time::Duration;

use atproto_sync_core::{EngineConfig, ReconnectStrategy, TlsOptions, DEFAULT_FLOW_CREDIT, DEFAULT_TIMEOUT};
use url::Url;

/// Configuration for one Tap connection.
///
/// Built with chained setters; only `host` is required.
#[derive(Debug, Clone)]
pub struct TapConfig {
    host: Url,
    timeout: Duration,
    flow_credit: u32,
    tls: TlsOptions,
    reconnect: ReconnectStrategy,
    admin_password: Option<String>,
    disable_acks: bool,
}

impl TapConfig {
    /// Creates a config targeting `host` (e.g. `wss://tap.example.com`).
    pub fn new(host: Url) -> Self {
        Self {
            host,
            timeout: DEFAULT_TIMEOUT,
            flow_credit: DEFAULT_FLOW_CREDIT,
            tls: TlsOptions::default(),
            reconnect: ReconnectStrategy::default(),
            admin_password: None,
            disable_acks: false,
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

    /// Sets the password sent as HTTP Basic `admin:<password>` on both the
    /// WebSocket upgrade and the admin HTTP client's requests.
    pub fn admin_password(mut self, password: impl Into<String>) -> Self {
        self.admin_password = Some(password.into());
        self
    }

    /// Suppresses all acks regardless of handler outcome.
    pub fn disable_acks(mut self, disable: bool) -> Self {
        self.disable_acks = disable;
        self
    }

    pub(crate) fn host(&self) -> &Url {
        &self.host
    }

    pub(crate) fn admin_password_ref(&self) -> Option<&str> {
        self.admin_password.as_deref()
    }

    pub(crate) fn acks_disabled(&self) -> bool {
        self.disable_acks
    }

    pub(crate) fn to_engine_config(&self) -> EngineConfig {
        EngineConfig::new(self.host.clone())
            .timeout(self.timeout)
            .flow_credit(self.flow_credit)
            .tls(self.tls)
            .reconnect(self.reconnect.clone())
    }
}
