//! Connection-engine configuration shared by every adapter.
//!
//! Adapter-specific fields (cursor, filters, admin password, ...) live on
//! each adapter's own `Config` type and are not part of this struct; the
//! engine only needs what it takes to drive the state machine.

use std::time::Duration;

use url::Url;

use crate::reconnect::ReconnectStrategy;
use crate::tls::TlsOptions;

/// Default connect/upgrade timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default per-connection flow credit.
pub const DEFAULT_FLOW_CREDIT: u32 = 10;

/// Configuration consumed by the connection engine.
///
/// Immutable once the engine is started; built with the chained setters
/// below.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    host: Url,
    timeout: Duration,
    flow_credit: u32,
    tls: TlsOptions,
    reconnect: ReconnectStrategy,
}

impl EngineConfig {
    /// Creates a config targeting `host` (scheme + host + port), with every
    /// other field at its documented default.
    pub fn new(host: Url) -> Self {
        Self {
            host,
            timeout: DEFAULT_TIMEOUT,
            flow_credit: DEFAULT_FLOW_CREDIT,
            tls: TlsOptions::default(),
            reconnect: ReconnectStrategy::default(),
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

    /// The configured host URL.
    pub fn host(&self) -> &Url {
        &self.host
    }

    /// The configured connect/upgrade timeout.
    pub fn connect_timeout(&self) -> Duration {
        self.timeout
    }

    /// The configured per-connection flow credit.
    pub fn flow_credit_count(&self) -> u32 {
        self.flow_credit
    }

    /// The configured TLS options.
    pub fn tls_options(&self) -> TlsOptions {
        self.tls
    }

    /// The configured reconnection strategy.
    pub fn reconnect_strategy(&self) -> &ReconnectStrategy {
        &self.reconnect
    }
}
