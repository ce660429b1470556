//! TLS verification options for the connection engine.

/// Controls certificate verification for the engine's TLS socket.
///
/// The default trusts the system CA bundle and verifies the server
/// hostname against the configured host, matching ordinary browser/`curl`
/// behavior. Disabling verification is deliberately awkward: it is a
/// footgun the rest of the corpus doesn't expose casually.
#[derive(Debug, Clone, Copy)]
pub struct TlsOptions {
    verify_peer: bool,
}

impl Default for TlsOptions {
    fn default() -> Self {
        Self { verify_peer: true }
    }
}

impl TlsOptions {
    /// The default: verify_peer + system CA bundle + hostname match.
    pub fn system_default() -> Self {
        Self::default()
    }

    /// Disables peer verification entirely. Only ever appropriate against a
    /// local test server with a self-signed certificate.
    #[doc(hidden)]
    pub fn insecure_skip_verify() -> Self {
        Self { verify_peer: false }
    }

    /// Whether certificate and hostname verification are enabled.
    pub fn verify_peer(&self) -> bool {
        self.verify_peer
    }
}
