#![forbid(unsafe_code)]

//! Contracts of the external collaborators.
//!
//! Implementations are shared by every signing/verification operation that
//! runs concurrently, hence the `Send + Sync` bound: a provider is either
//! stateless or synchronizes internally. Calls may block (network access to
//! a TSA or OCSP responder); timeouts belong to the implementation.

use crate::algorithms::KeyAlgorithm;
use crate::cert::X509Certificate;
use crate::data::{TimeStampTokenResult, ValidationData};
use std::sync::Arc;
use xades_core::{Algorithm, Error, Timestamp};

/// Identifies the certificate whose path is to be validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CertificateSelector {
    /// The certificate itself is at hand (e.g. from `KeyInfo`).
    Certificate(X509Certificate),
    /// Issuer name (RFC 4514) and decimal serial number.
    IssuerSerial { issuer: String, serial: String },
    /// Subject name (RFC 4514).
    SubjectName(String),
}

impl CertificateSelector {
    /// Whether `cert` is the one selected. Unparseable certificates never match.
    pub fn matches(&self, cert: &X509Certificate) -> bool {
        match self {
            Self::Certificate(c) => c == cert,
            Self::IssuerSerial { issuer, serial } => {
                cert.issuer_name().is_ok_and(|i| &i == issuer)
                    && cert.serial_number().is_ok_and(|s| &s == serial)
            }
            Self::SubjectName(subject) => cert.subject_name().is_ok_and(|s| &s == subject),
        }
    }
}

/// PKIX certification path building and validation.
pub trait CertificateValidationProvider: Send + Sync {
    /// Validate the path of the selected certificate as of `as_of`.
    ///
    /// `other_certs` are extra certificates found in the signature that may
    /// help build the path. Failures are reported as
    /// [`Error::CertificateValidation`].
    fn validate(
        &self,
        selector: &CertificateSelector,
        as_of: &Timestamp,
        other_certs: &[X509Certificate],
    ) -> Result<ValidationData, Error>;
}

/// Time-stamp authority client.
pub trait TimeStampTokenProvider: Send + Sync {
    /// Obtain a token whose message imprint is `digest_alg_uri` over
    /// `digest_input`. Failures are reported as
    /// [`Error::TimeStampTokenGeneration`].
    fn get_token(
        &self,
        digest_input: &[u8],
        digest_alg_uri: &str,
    ) -> Result<TimeStampTokenResult, Error>;
}

/// Time-stamp token parser and verifier.
pub trait TimeStampVerificationProvider: Send + Sync {
    /// Check `token` against `digest_input` and return its generation time.
    ///
    /// Imprint mismatches, bad token signatures and untrusted or expired TSA
    /// certificates are reported as [`Error::TimeStampTokenVerification`].
    fn verify_token(&self, token: &[u8], digest_input: &[u8]) -> Result<Timestamp, Error>;

    /// Validated certification path of the TSA that issued `token`, as of
    /// the token's generation time.
    fn token_validation_data(&self, token: &[u8], time: &Timestamp)
        -> Result<ValidationData, Error>;
}

/// Selection of the algorithms a signature uses. Pure, stateless logic.
pub trait AlgorithmsProvider: Send + Sync {
    /// `SignatureMethod` for a signing key of the given type.
    fn signature_algorithm(&self, key: KeyAlgorithm) -> Result<Arc<Algorithm>, Error>;

    /// `CanonicalizationMethod` of `SignedInfo`.
    fn canonicalization_for_signature(&self) -> Arc<Algorithm>;

    /// Canonicalization applied to node-set inputs of time-stamps.
    fn canonicalization_for_time_stamps(&self) -> Arc<Algorithm>;

    /// Canonicalization appended to references whose transform chain ends
    /// on a node-set.
    fn canonicalization_for_references(&self) -> Arc<Algorithm>;

    /// Digest of the `ds:Reference`s to signed data objects.
    fn digest_for_data_object_references(&self) -> &str;

    /// Digest inside certificate and CRL references.
    fn digest_for_reference_properties(&self) -> &str;

    /// Message-imprint digest of time-stamp requests.
    fn digest_for_time_stamps(&self) -> &str;
}
