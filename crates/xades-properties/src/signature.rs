#![forbid(unsafe_code)]

//! Signature-level properties.

use crate::bag::Property;
use crate::timestamp::{PendingTimeStamp, TimeStampProperty};
use xades_core::{digest, Error, PropertyKind, Timestamp};
use xades_validation::{CertRef, CrlRef, ValidationData, X509Certificate, X509Crl};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningTime {
    pub time: Timestamp,
}

impl SigningTime {
    pub fn new(time: Timestamp) -> Self {
        Self { time }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureProductionPlace {
    pub city: Option<String>,
    pub state_or_province: Option<String>,
    pub postal_code: Option<String>,
    pub country_name: Option<String>,
}

/// Roles claimed by the signer, and attribute certificates certifying roles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignerRole {
    claimed: Vec<String>,
    certified: Vec<Vec<u8>>,
}

impl SignerRole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_claimed_role(mut self, role: impl Into<String>) -> Self {
        self.claimed.push(role.into());
        self
    }

    /// Add a DER-encoded attribute certificate.
    pub fn with_certified_role(mut self, attribute_cert: Vec<u8>) -> Self {
        self.certified.push(attribute_cert);
        self
    }

    pub fn claimed_roles(&self) -> &[String] {
        &self.claimed
    }

    pub fn certified_roles(&self) -> &[Vec<u8>] {
        &self.certified
    }
}

/// References to the signing certificate and, optionally, its chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningCertificate {
    pub cert_refs: Vec<CertRef>,
}

impl SigningCertificate {
    /// Reference every certificate in `certs`, leaf first.
    pub fn from_certificates(certs: &[X509Certificate], digest_uri: &str) -> Result<Self, Error> {
        if certs.is_empty() {
            return Err(Error::EmptyCertificateChain);
        }
        let cert_refs = certs
            .iter()
            .map(|c| CertRef::from_certificate(c, digest_uri))
            .collect::<Result<_, _>>()?;
        Ok(Self { cert_refs })
    }

    /// Whether `cert` is the referenced signing certificate (first entry).
    pub fn references(&self, cert: &X509Certificate) -> Result<bool, Error> {
        match self.cert_refs.first() {
            Some(r) => r.matches(cert),
            None => Ok(false),
        }
    }
}

/// `SignaturePolicyIdentifier`: an explicit policy, or an implied one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignaturePolicy {
    Implied,
    Identifier {
        /// URI or `urn:oid:` identifier of the policy.
        identifier: String,
        description: Option<String>,
        digest_uri: String,
        digest_value: Vec<u8>,
        /// `SPURI` qualifiers: where the policy document can be fetched.
        locations: Vec<String>,
    },
}

impl SignaturePolicy {
    /// Identify a policy by digesting its document.
    pub fn identifier(
        identifier: impl Into<String>,
        document: &[u8],
        digest_uri: &str,
    ) -> Result<Self, Error> {
        Ok(Self::Identifier {
            identifier: identifier.into(),
            description: None,
            digest_uri: digest_uri.to_owned(),
            digest_value: digest::digest(digest_uri, document)?,
            locations: Vec::new(),
        })
    }

    pub fn with_location(mut self, uri: impl Into<String>) -> Self {
        if let Self::Identifier { locations, .. } = &mut self {
            locations.push(uri.into());
        }
        self
    }

    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        if let Self::Identifier { description, .. } = &mut self {
            *description = Some(text.into());
        }
        self
    }
}

/// A property this engine does not model: its qualified element name and
/// its serialized XML, kept opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherProperty {
    pub element_name: String,
    pub xml: String,
}

impl OtherProperty {
    pub fn new(element_name: impl Into<String>, xml: impl Into<String>) -> Self {
        Self {
            element_name: element_name.into(),
            xml: xml.into(),
        }
    }
}

/// A serialized `ds:Signature` countersigning this one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterSignature {
    pub signature_xml: String,
}

/// References to the certificates of the signer's path, the signing
/// certificate excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteCertificateRefs {
    pub cert_refs: Vec<CertRef>,
}

impl CompleteCertificateRefs {
    pub fn from_validation_data(vd: &ValidationData, digest_uri: &str) -> Result<Self, Error> {
        let cert_refs = vd.certs()[1..]
            .iter()
            .map(|c| CertRef::from_certificate(c, digest_uri))
            .collect::<Result<_, _>>()?;
        Ok(Self { cert_refs })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteRevocationRefs {
    pub crl_refs: Vec<CrlRef>,
}

impl CompleteRevocationRefs {
    pub fn from_validation_data(vd: &ValidationData, digest_uri: &str) -> Result<Self, Error> {
        let crl_refs = vd
            .crls()
            .iter()
            .map(|c| CrlRef::from_crl(c, digest_uri))
            .collect::<Result<_, _>>()?;
        Ok(Self { crl_refs })
    }
}

/// Encapsulated certificates: `CertificateValues` and
/// `AttrAuthoritiesCertValues`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateValues {
    pub certs: Vec<X509Certificate>,
}

/// Encapsulated CRLs: `RevocationValues` and `AttributeRevocationValues`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevocationValues {
    pub crls: Vec<X509Crl>,
}

/// XAdES 1.4.1 `TimeStampValidationData`: the validation material of the
/// TSAs that issued earlier time-stamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeStampValidationData {
    pub certs: Vec<X509Certificate>,
    pub crls: Vec<X509Crl>,
}

impl TimeStampValidationData {
    pub fn from_validation_data(vd: &ValidationData) -> Self {
        Self {
            certs: vd.certs().to_vec(),
            crls: vd.crls().to_vec(),
        }
    }
}

/// `SignedSignatureProperties` members.
#[derive(Debug, Clone)]
pub enum SignedSignatureProperty {
    SigningTime(SigningTime),
    SignatureProductionPlace(SignatureProductionPlace),
    SignerRole(SignerRole),
    SigningCertificate(SigningCertificate),
    SignaturePolicy(SignaturePolicy),
    Other(OtherProperty),
}

impl Property for SignedSignatureProperty {
    fn kind(&self) -> PropertyKind {
        match self {
            Self::SigningTime(_) => PropertyKind::SigningTime,
            Self::SignatureProductionPlace(_) => PropertyKind::SignatureProductionPlace,
            Self::SignerRole(_) => PropertyKind::SignerRole,
            Self::SigningCertificate(_) => PropertyKind::SigningCertificate,
            Self::SignaturePolicy(_) => PropertyKind::SignaturePolicy,
            Self::Other(_) => PropertyKind::OtherSignedSignature,
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Other(p) => &p.element_name,
            _ => self.kind().name(),
        }
    }
}

/// `UnsignedSignatureProperties` members.
#[derive(Debug)]
pub enum UnsignedSignatureProperty {
    CounterSignature(CounterSignature),
    SignatureTimeStamp(TimeStampProperty),
    CompleteCertificateRefs(CompleteCertificateRefs),
    CompleteRevocationRefs(CompleteRevocationRefs),
    AttrAuthoritiesCertValues(CertificateValues),
    AttributeRevocationValues(RevocationValues),
    SigAndRefsTimeStamp(TimeStampProperty),
    CertificateValues(CertificateValues),
    RevocationValues(RevocationValues),
    ArchiveTimeStamp(TimeStampProperty),
    TimeStampValidationData(TimeStampValidationData),
    Other(OtherProperty),
}

impl UnsignedSignatureProperty {
    pub fn signature_time_stamp(pending: PendingTimeStamp) -> Self {
        Self::SignatureTimeStamp(TimeStampProperty::new(
            PropertyKind::SignatureTimeStamp,
            pending,
        ))
    }

    pub fn sig_and_refs_time_stamp(pending: PendingTimeStamp) -> Self {
        Self::SigAndRefsTimeStamp(TimeStampProperty::new(
            PropertyKind::SigAndRefsTimeStamp,
            pending,
        ))
    }

    pub fn archive_time_stamp(pending: PendingTimeStamp) -> Self {
        Self::ArchiveTimeStamp(TimeStampProperty::new(
            PropertyKind::ArchiveTimeStamp,
            pending,
        ))
    }

    /// The time-stamp carried by time-stamp kinds.
    pub fn time_stamp(&self) -> Option<&TimeStampProperty> {
        match self {
            Self::SignatureTimeStamp(ts)
            | Self::SigAndRefsTimeStamp(ts)
            | Self::ArchiveTimeStamp(ts) => Some(ts),
            _ => None,
        }
    }
}

impl Property for UnsignedSignatureProperty {
    fn kind(&self) -> PropertyKind {
        match self {
            Self::CounterSignature(_) => PropertyKind::CounterSignature,
            Self::SignatureTimeStamp(_) => PropertyKind::SignatureTimeStamp,
            Self::CompleteCertificateRefs(_) => PropertyKind::CompleteCertificateRefs,
            Self::CompleteRevocationRefs(_) => PropertyKind::CompleteRevocationRefs,
            Self::AttrAuthoritiesCertValues(_) => PropertyKind::AttrAuthoritiesCertValues,
            Self::AttributeRevocationValues(_) => PropertyKind::AttributeRevocationValues,
            Self::SigAndRefsTimeStamp(_) => PropertyKind::SigAndRefsTimeStamp,
            Self::CertificateValues(_) => PropertyKind::CertificateValues,
            Self::RevocationValues(_) => PropertyKind::RevocationValues,
            Self::ArchiveTimeStamp(_) => PropertyKind::ArchiveTimeStamp,
            Self::TimeStampValidationData(_) => PropertyKind::TimeStampValidationData,
            Self::Other(_) => PropertyKind::OtherUnsignedSignature,
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Other(p) => &p.element_name,
            _ => self.kind().name(),
        }
    }
}
