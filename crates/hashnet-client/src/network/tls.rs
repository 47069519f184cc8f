//! TLS trust policy for consensus nodes
//!
//! Node certificates are self-signed, so trust is established by comparing
//! the SHA-384 hash of the PEM encoded leaf certificate with the hash
//! published in the address book.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rustls::DigitallySignedStruct;
use rustls::SignatureScheme;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{CryptoProvider, verify_tls12_signature, verify_tls13_signature};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use sha2::{Digest, Sha384};
use tracing::warn;

use crate::error::{ClientError, Result};

const PEM_LINE_LENGTH: usize = 64;

/// Lowercase hex SHA-384 of the PEM encoding of a DER certificate.
pub fn certificate_hash(der: &[u8]) -> String {
    let encoded = STANDARD.encode(der);
    let mut pem = String::with_capacity(encoded.len() + encoded.len() / PEM_LINE_LENGTH + 64);
    pem.push_str("-----BEGIN CERTIFICATE-----\n");
    for line in encoded.as_bytes().chunks(PEM_LINE_LENGTH) {
        // base64 output is ASCII
        pem.push_str(std::str::from_utf8(line).unwrap_or_default());
        pem.push('\n');
    }
    pem.push_str("-----END CERTIFICATE-----\n");

    const_hex::encode(Sha384::digest(pem.as_bytes()))
}

/// Address books carry the hash either as UTF-8 hex text or as raw digest bytes.
fn normalize_hash(hash: &[u8]) -> String {
    match std::str::from_utf8(hash) {
        Ok(text) => {
            let digits = text.strip_prefix("0x").unwrap_or(text);
            if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit()) {
                digits.to_ascii_lowercase()
            } else {
                const_hex::encode(hash)
            }
        }
        Err(_) => const_hex::encode(hash),
    }
}

/// Verifier that pins the leaf certificate to a known hash, or trusts any
/// certificate when no hash is given.
#[derive(Debug)]
pub(crate) struct CertHashVerifier {
    expected: Option<String>,
    provider: Arc<CryptoProvider>,
}

impl CertHashVerifier {
    pub(crate) fn new(cert_hash: Option<&[u8]>, provider: Arc<CryptoProvider>) -> Self {
        Self {
            expected: cert_hash.map(normalize_hash),
            provider,
        }
    }
}

impl ServerCertVerifier for CertHashVerifier {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> std::result::Result<ServerCertVerified, rustls::Error> {
        let Some(expected) = &self.expected else {
            return Ok(ServerCertVerified::assertion());
        };

        let actual = certificate_hash(end_entity.as_ref());
        if &actual == expected {
            Ok(ServerCertVerified::assertion())
        } else {
            warn!("Node certificate hash mismatch: expected {}, got {}", expected, actual);
            Err(rustls::Error::General(
                "server certificate hash does not match the address book".to_string(),
            ))
        }
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}

/// Build a rustls client config that speaks HTTP/2 and trusts `cert_hash`
/// (or everything, when `cert_hash` is `None`).
pub(crate) fn client_config(cert_hash: Option<&[u8]>) -> Result<Arc<rustls::ClientConfig>> {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let verifier = CertHashVerifier::new(cert_hash, provider.clone());

    let mut config = rustls::ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| ClientError::config(format!("invalid TLS configuration: {}", e)))?
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(verifier))
        .with_no_client_auth();
    config.alpn_protocols = vec![b"h2".to_vec()];

    Ok(Arc::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_certificate_hash_is_hex_sha384() {
        let hash = certificate_hash(b"not really a certificate");
        assert_eq!(hash.len(), 96);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(hash, certificate_hash(b"not really a certificate"));
        assert_ne!(hash, certificate_hash(b"another certificate"));
    }

    #[test]
    fn test_normalize_accepts_text_and_raw_hashes() {
        assert_eq!(normalize_hash(b"ABCDEF01"), "abcdef01");
        assert_eq!(normalize_hash(b"0xabcdef01"), "abcdef01");
        assert_eq!(normalize_hash(&[0xab, 0xcd]), "abcd");
    }

    #[test]
    fn test_normalize_only_strips_leading_prefix() {
        assert_eq!(normalize_hash(b"0xABcd"), "abcd");
        // a stray x anywhere else is not hex text
        assert_eq!(normalize_hash(b"abxcd"), const_hex::encode(b"abxcd"));
        assert_eq!(normalize_hash(b"ab0xcd"), const_hex::encode(b"ab0xcd"));
        assert_eq!(normalize_hash(b"0x0xab"), const_hex::encode(b"0x0xab"));
        assert_eq!(normalize_hash(b"0x"), const_hex::encode(b"0x"));
        assert_eq!(normalize_hash(b"ab x cd"), const_hex::encode(b"ab x cd"));
    }

    #[test]
    fn test_verifier_pins_hash() {
        let der = b"leaf certificate bytes";
        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let name = ServerName::try_from("node.example.com").unwrap();
        let cert = CertificateDer::from(der.to_vec());

        let expected = certificate_hash(der);
        let pinned = CertHashVerifier::new(Some(expected.as_bytes()), provider.clone());
        assert!(
            pinned
                .verify_server_cert(&cert, &[], &name, &[], UnixTime::now())
                .is_ok()
        );

        let wrong = CertHashVerifier::new(Some(b"00ff"), provider.clone());
        assert!(
            wrong
                .verify_server_cert(&cert, &[], &name, &[], UnixTime::now())
                .is_err()
        );

        let open = CertHashVerifier::new(None, provider);
        assert!(
            open.verify_server_cert(&cert, &[], &name, &[], UnixTime::now())
                .is_ok()
        );
    }

    #[test]
    fn test_client_config_negotiates_h2() {
        let config = client_config(None).unwrap();
        assert_eq!(config.alpn_protocols, vec![b"h2".to_vec()]);
    }
}
