#![forbid(unsafe_code)]

//! Validation data and the contracts of the external providers a XAdES
//! signer or verifier plugs in: certificate path validation, time-stamp
//! issuance, time-stamp verification and algorithm selection.

pub mod algorithms;
pub mod cert;
pub mod data;
pub mod profile;
pub mod provider;

pub use algorithms::{DefaultAlgorithmsProvider, KeyAlgorithm};
pub use cert::{CertRef, CrlRef, X509Certificate, X509Crl};
pub use data::{TimeStampTokenResult, TimeStampVerificationData, ValidationData};
pub use profile::{XadesProfile, XadesProfileBuilder};
pub use provider::{
    AlgorithmsProvider, CertificateSelector, CertificateValidationProvider,
    TimeStampTokenProvider, TimeStampVerificationProvider,
};
