#![forbid(unsafe_code)]

use crate::kind::{PropertyKind, TargetMultiplicity};

/// Boxed cause carried by errors that originate outside this engine
/// (XML engine, PKIX validator, time-stamp authority client).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced by the XAdES qualifying-properties engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // ── Structural ───────────────────────────────────────────────────
    #[error("a {0} property is already present")]
    DuplicatePropertyKind(PropertyKind),

    #[error("this {0} property instance was already added")]
    DuplicateInstance(PropertyKind),

    #[error("transform already present in the chain: {0}")]
    DuplicateTransform(String),

    #[error("a signed data object with reference Id {0} is already present")]
    DuplicateDataObject(String),

    #[error("target multiplicity {multiplicity} of {kind} exceeded")]
    MultiplicityExceeded {
        kind: PropertyKind,
        multiplicity: TargetMultiplicity,
    },

    #[error("{0} applies to all data objects and cannot be attached to one")]
    AppliesToAllDataObjects(PropertyKind),

    #[error("{0} property is already attached to this data object")]
    AlreadyAttachedToTarget(PropertyKind),

    #[error("{0} property has no target data object")]
    MissingTarget(PropertyKind),

    #[error("property target does not match any signed reference: {0}")]
    UnresolvedTarget(String),

    #[error("{0} property is not present")]
    NotPresent(PropertyKind),

    #[error("validation data requires at least one certificate")]
    EmptyCertificateChain,

    #[error("time-stamp verification data is missing its {0}")]
    IncompleteTimeStampData(&'static str),

    #[error("{0} time-stamp was already resolved")]
    TimeStampAlreadyResolved(PropertyKind),

    #[error("{kind} property cannot appear in {container}")]
    MisplacedProperty {
        kind: PropertyKind,
        container: &'static str,
    },

    #[error("signature form {form} requires a {missing} property")]
    FormRequirement {
        form: &'static str,
        missing: PropertyKind,
    },

    #[error("no {0} provider configured")]
    MissingProvider(&'static str),

    // ── External dependencies ────────────────────────────────────────
    #[error("cannot build time-stamp digest input: {0}")]
    DigestInputConstructionFailed(#[source] BoxError),

    #[error("certificate validation failed: {0}")]
    CertificateValidation(#[source] BoxError),

    #[error("time-stamp token generation failed: {0}")]
    TimeStampTokenGeneration(#[source] BoxError),

    #[error("time-stamp token verification failed: {0}")]
    TimeStampTokenVerification(#[source] BoxError),

    // ── Ancillary ────────────────────────────────────────────────────
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    #[error("missing required element: {0}")]
    MissingElement(String),

    #[error("missing required attribute: {0}")]
    MissingAttribute(String),

    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("base64 decode error: {0}")]
    Base64(String),

    #[error("certificate error: {0}")]
    Certificate(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the caller caused this error by asking for an illegal
    /// structure. Such errors leave every container in its pre-call state.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::DuplicatePropertyKind(_)
                | Self::DuplicateInstance(_)
                | Self::DuplicateTransform(_)
                | Self::DuplicateDataObject(_)
                | Self::MultiplicityExceeded { .. }
                | Self::AppliesToAllDataObjects(_)
                | Self::AlreadyAttachedToTarget(_)
                | Self::MissingTarget(_)
                | Self::UnresolvedTarget(_)
                | Self::NotPresent(_)
                | Self::EmptyCertificateChain
                | Self::IncompleteTimeStampData(_)
                | Self::TimeStampAlreadyResolved(_)
                | Self::MisplacedProperty { .. }
                | Self::FormRequirement { .. }
                | Self::MissingProvider(_)
        )
    }

    /// Whether this error wraps a failure of an external collaborator.
    pub fn is_external(&self) -> bool {
        matches!(
            self,
            Self::DigestInputConstructionFailed(_)
                | Self::CertificateValidation(_)
                | Self::TimeStampTokenGeneration(_)
                | Self::TimeStampTokenVerification(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_external_errors_keep_their_cause() {
        let err = Error::DigestInputConstructionFailed("bad node-set".into());
        assert!(err.is_external());
        assert!(!err.is_structural());
        assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("bad node-set"));
    }

    #[test]
    fn test_structural_errors_are_classified() {
        let err = Error::MultiplicityExceeded {
            kind: PropertyKind::DataObjectFormat,
            multiplicity: TargetMultiplicity::One,
        };
        assert!(err.is_structural());
        assert_eq!(
            err.to_string(),
            "target multiplicity ONE of DataObjectFormat exceeded"
        );

        let err = Error::AppliesToAllDataObjects(PropertyKind::AllDataObjectsTimeStamp);
        assert!(err.is_structural());
        assert_eq!(
            err.to_string(),
            "AllDataObjectsTimeStamp applies to all data objects and cannot be attached to one"
        );
    }
}
