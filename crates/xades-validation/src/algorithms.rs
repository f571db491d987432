#![forbid(unsafe_code)]

//! Default algorithm selection.

use crate::cert::X509Certificate;
use crate::provider::AlgorithmsProvider;
use std::sync::Arc;
use xades_core::{algorithm, Algorithm, Error};

const OID_RSA_ENCRYPTION: &str = "1.2.840.113549.1.1.1";
const OID_EC_PUBLIC_KEY: &str = "1.2.840.10045.2.1";
const OID_DSA: &str = "1.2.840.10040.4.1";

/// Type of the signing key, which constrains the `SignatureMethod`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAlgorithm {
    Rsa,
    Ec,
    Dsa,
}

impl KeyAlgorithm {
    pub fn from_oid(oid: &str) -> Option<Self> {
        match oid {
            OID_RSA_ENCRYPTION => Some(Self::Rsa),
            OID_EC_PUBLIC_KEY => Some(Self::Ec),
            OID_DSA => Some(Self::Dsa),
            _ => None,
        }
    }

    /// Key type of the certificate's subject public key.
    pub fn of_certificate(cert: &X509Certificate) -> Result<Self, Error> {
        let oid = cert.public_key_algorithm_oid()?;
        Self::from_oid(&oid)
            .ok_or_else(|| Error::UnsupportedAlgorithm(format!("public key algorithm: {oid}")))
    }
}

/// RSA-SHA256 / ECDSA-SHA256 / DSA-SHA256 signatures, Canonical XML 1.0
/// everywhere and SHA-256 for every digest.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAlgorithmsProvider;

impl AlgorithmsProvider for DefaultAlgorithmsProvider {
    fn signature_algorithm(&self, key: KeyAlgorithm) -> Result<Arc<Algorithm>, Error> {
        let uri = match key {
            KeyAlgorithm::Rsa => algorithm::RSA_SHA256,
            KeyAlgorithm::Ec => algorithm::ECDSA_SHA256,
            KeyAlgorithm::Dsa => algorithm::DSA_SHA256,
        };
        Ok(Arc::new(Algorithm::new(uri)))
    }

    fn canonicalization_for_signature(&self) -> Arc<Algorithm> {
        Arc::new(Algorithm::new(algorithm::C14N))
    }

    fn canonicalization_for_time_stamps(&self) -> Arc<Algorithm> {
        Arc::new(Algorithm::new(algorithm::C14N))
    }

    fn canonicalization_for_references(&self) -> Arc<Algorithm> {
        Arc::new(Algorithm::new(algorithm::C14N))
    }

    fn digest_for_data_object_references(&self) -> &str {
        algorithm::SHA256
    }

    fn digest_for_reference_properties(&self) -> &str {
        algorithm::SHA256
    }

    fn digest_for_time_stamps(&self) -> &str {
        algorithm::SHA256
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGNER_DER: &[u8] = include_bytes!("../testdata/signer.der");

    #[test]
    fn test_signature_algorithm_follows_key_type() {
        let p = DefaultAlgorithmsProvider;
        assert_eq!(
            p.signature_algorithm(KeyAlgorithm::Rsa).unwrap().uri(),
            algorithm::RSA_SHA256
        );
        assert_eq!(
            p.signature_algorithm(KeyAlgorithm::Ec).unwrap().uri(),
            algorithm::ECDSA_SHA256
        );
    }

    #[test]
    fn test_each_call_hands_out_a_fresh_instance() {
        let p = DefaultAlgorithmsProvider;
        let a = p.canonicalization_for_time_stamps();
        let b = p.canonicalization_for_time_stamps();
        assert_eq!(a, b);
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_key_algorithm_of_fixture() {
        let cert = X509Certificate::from_der(SIGNER_DER.to_vec());
        assert_eq!(KeyAlgorithm::of_certificate(&cert).unwrap(), KeyAlgorithm::Rsa);
        assert_eq!(KeyAlgorithm::from_oid("1.2.3"), None);
    }
}
