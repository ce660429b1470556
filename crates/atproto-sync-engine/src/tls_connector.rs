//! Builds the `rustls` connector used for `wss` upgrades.

use std::sync::Arc;

use atproto_sync_core::TlsOptions;
use tokio_tungstenite::Connector;

/// Translates [`TlsOptions`] into the connector `tokio-tungstenite` expects.
///
/// `verify_peer = true` returns `None`, letting `tokio-tungstenite` build its
/// default `rustls` config from the native root store. `verify_peer = false`
/// builds a config around [`NoServerCertVerification`], which accepts any
/// certificate chain — only ever appropriate against a local test server.
pub fn build_connector(tls: TlsOptions) -> Option<Connector> {
    if tls.verify_peer() {
        return None;
    }

    let provider = rustls::crypto::ring::default_provider();
    let config = rustls::ClientConfig::builder_with_provider(Arc::new(provider))
        .with_safe_default_protocol_versions()
        .expect("ring provider supports the default protocol versions")
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(NoServerCertVerification))
        .with_no_client_auth();

    Some(Connector::Rustls(Arc::new(config)))
}

/// Accepts any server certificate without checking it. Used only when a
/// caller explicitly opted into [`TlsOptions::insecure_skip_verify`].
#[derive(Debug)]
struct NoServerCertVerification;

impl rustls::client::danger::ServerCertVerifier for NoServerCertVerification {
    fn verify_server_cert(
        &self,
        _end_entity: &rustls::pki_types::CertificateDer<'_>,
        _intermediates: &[rustls::pki_types::CertificateDer<'_>],
        _server_name: &rustls::pki_types::ServerName<'_>,
        _ocsp_response: &[u8],
        _now: rustls::pki_types::UnixTime,
    ) -> Result<rustls::client::danger::ServerCertVerified, rustls::Error> {
        Ok(rustls::client::danger::ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<rustls::SignatureScheme> {
        rustls::crypto::ring::default_provider()
            .signature_verification_algorithms
            .supported_schemes()
    }
}
