#![forbid(unsafe_code)]

//! Property kinds: the closed set of XAdES qualifying properties.
//!
//! A [`PropertyKind`] is the key of every property container. Whether a
//! kind is signed, whether it applies to the signature or to data objects,
//! how a container accepts it and how many data objects it may target are
//! all derived from the kind, never stored per instance.

use std::fmt;

/// The four containers a qualifying property can live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyGroup {
    SignedSignature,
    UnsignedSignature,
    SignedDataObject,
    UnsignedDataObject,
}

impl PropertyGroup {
    pub fn is_signed(&self) -> bool {
        matches!(self, Self::SignedSignature | Self::SignedDataObject)
    }

    pub fn is_signature_level(&self) -> bool {
        matches!(self, Self::SignedSignature | Self::UnsignedSignature)
    }

    /// Local name of the XAdES element that holds properties of this group.
    pub fn container_name(&self) -> &'static str {
        match self {
            Self::SignedSignature => "SignedSignatureProperties",
            Self::UnsignedSignature => "UnsignedSignatureProperties",
            Self::SignedDataObject => "SignedDataObjectProperties",
            Self::UnsignedDataObject => "UnsignedDataObjectProperties",
        }
    }
}

/// How a container accepts a property of a given kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionPolicy {
    /// At most one property of the kind per container.
    Put,
    /// Any number of distinct instances of the kind.
    Add,
}

/// How many data objects a data-object property instance may target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetMultiplicity {
    /// Applies implicitly to every data object; never attached explicitly.
    All,
    /// Exactly one data object.
    One,
    /// One or more distinct data objects.
    N,
}

impl TargetMultiplicity {
    /// Maximum number of explicit targets, `None` when unbounded.
    pub fn cap(&self) -> Option<usize> {
        match self {
            Self::All => Some(0),
            Self::One => Some(1),
            Self::N => None,
        }
    }
}

impl fmt::Display for TargetMultiplicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "ALL",
            Self::One => "ONE",
            Self::N => "N",
        })
    }
}

/// Discriminator of every qualifying property type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyKind {
    // Signed signature properties
    SigningTime,
    SignatureProductionPlace,
    SignerRole,
    SigningCertificate,
    SignaturePolicy,
    OtherSignedSignature,
    // Unsigned signature properties
    CounterSignature,
    SignatureTimeStamp,
    CompleteCertificateRefs,
    CompleteRevocationRefs,
    AttrAuthoritiesCertValues,
    AttributeRevocationValues,
    SigAndRefsTimeStamp,
    CertificateValues,
    RevocationValues,
    ArchiveTimeStamp,
    TimeStampValidationData,
    OtherUnsignedSignature,
    // Signed data object properties
    DataObjectFormat,
    CommitmentType,
    AllDataObjectsCommitmentType,
    IndividualDataObjectsTimeStamp,
    AllDataObjectsTimeStamp,
    OtherSignedDataObject,
    // Unsigned data object properties
    OtherUnsignedDataObject,
}

impl PropertyKind {
    /// Every kind, in declaration order.
    pub const VALUES: [PropertyKind; 25] = [
        Self::SigningTime,
        Self::SignatureProductionPlace,
        Self::SignerRole,
        Self::SigningCertificate,
        Self::SignaturePolicy,
        Self::OtherSignedSignature,
        Self::CounterSignature,
        Self::SignatureTimeStamp,
        Self::CompleteCertificateRefs,
        Self::CompleteRevocationRefs,
        Self::AttrAuthoritiesCertValues,
        Self::AttributeRevocationValues,
        Self::SigAndRefsTimeStamp,
        Self::CertificateValues,
        Self::RevocationValues,
        Self::ArchiveTimeStamp,
        Self::TimeStampValidationData,
        Self::OtherUnsignedSignature,
        Self::DataObjectFormat,
        Self::CommitmentType,
        Self::AllDataObjectsCommitmentType,
        Self::IndividualDataObjectsTimeStamp,
        Self::AllDataObjectsTimeStamp,
        Self::OtherSignedDataObject,
        Self::OtherUnsignedDataObject,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::SigningTime => "SigningTime",
            Self::SignatureProductionPlace => "SignatureProductionPlace",
            Self::SignerRole => "SignerRole",
            Self::SigningCertificate => "SigningCertificate",
            Self::SignaturePolicy => "SignaturePolicy",
            Self::OtherSignedSignature => "OtherSignedSignatureProperty",
            Self::CounterSignature => "CounterSignature",
            Self::SignatureTimeStamp => "SignatureTimeStamp",
            Self::CompleteCertificateRefs => "CompleteCertificateRefs",
            Self::CompleteRevocationRefs => "CompleteRevocationRefs",
            Self::AttrAuthoritiesCertValues => "AttrAuthoritiesCertValues",
            Self::AttributeRevocationValues => "AttributeRevocationValues",
            Self::SigAndRefsTimeStamp => "SigAndRefsTimeStamp",
            Self::CertificateValues => "CertificateValues",
            Self::RevocationValues => "RevocationValues",
            Self::ArchiveTimeStamp => "ArchiveTimeStamp",
            Self::TimeStampValidationData => "TimeStampValidationData",
            Self::OtherUnsignedSignature => "OtherUnsignedSignatureProperty",
            Self::DataObjectFormat => "DataObjectFormat",
            Self::CommitmentType => "CommitmentType",
            Self::AllDataObjectsCommitmentType => "AllDataObjectsCommitmentType",
            Self::IndividualDataObjectsTimeStamp => "IndividualDataObjectsTimeStamp",
            Self::AllDataObjectsTimeStamp => "AllDataObjectsTimeStamp",
            Self::OtherSignedDataObject => "OtherSignedDataObjectProperty",
            Self::OtherUnsignedDataObject => "OtherUnsignedDataObjectProperty",
        }
    }

    /// Local name of the XAdES element for this kind.
    ///
    /// Both commitment-type kinds share `CommitmentTypeIndication`; they
    /// differ by `ObjectReference` vs `AllSignedDataObjects` content.
    /// Returns `None` for the "other" kinds, whose element name is chosen
    /// by each instance.
    pub fn element_name(&self) -> Option<&'static str> {
        match self {
            Self::SignaturePolicy => Some("SignaturePolicyIdentifier"),
            Self::CommitmentType | Self::AllDataObjectsCommitmentType => {
                Some("CommitmentTypeIndication")
            }
            Self::IndividualDataObjectsTimeStamp => Some("IndividualDataObjectsTimeStamp"),
            Self::OtherSignedSignature
            | Self::OtherUnsignedSignature
            | Self::OtherSignedDataObject
            | Self::OtherUnsignedDataObject => None,
            other => Some(other.name()),
        }
    }

    /// Resolve a XAdES element local name to the kind it denotes.
    ///
    /// `CommitmentTypeIndication` resolves to [`PropertyKind::CommitmentType`].
    pub fn from_element_name(local_name: &str) -> Option<PropertyKind> {
        Self::VALUES
            .iter()
            .copied()
            .find(|k| k.element_name() == Some(local_name))
    }

    /// The catch-all kind for unrecognised elements in a group.
    pub fn other_in(group: PropertyGroup) -> PropertyKind {
        match group {
            PropertyGroup::SignedSignature => Self::OtherSignedSignature,
            PropertyGroup::UnsignedSignature => Self::OtherUnsignedSignature,
            PropertyGroup::SignedDataObject => Self::OtherSignedDataObject,
            PropertyGroup::UnsignedDataObject => Self::OtherUnsignedDataObject,
        }
    }

    pub fn group(&self) -> PropertyGroup {
        match self {
            Self::SigningTime
            | Self::SignatureProductionPlace
            | Self::SignerRole
            | Self::SigningCertificate
            | Self::SignaturePolicy
            | Self::OtherSignedSignature => PropertyGroup::SignedSignature,
            Self::CounterSignature
            | Self::SignatureTimeStamp
            | Self::CompleteCertificateRefs
            | Self::CompleteRevocationRefs
            | Self::AttrAuthoritiesCertValues
            | Self::AttributeRevocationValues
            | Self::SigAndRefsTimeStamp
            | Self::CertificateValues
            | Self::RevocationValues
            | Self::ArchiveTimeStamp
            | Self::TimeStampValidationData
            | Self::OtherUnsignedSignature => PropertyGroup::UnsignedSignature,
            Self::DataObjectFormat
            | Self::CommitmentType
            | Self::AllDataObjectsCommitmentType
            | Self::IndividualDataObjectsTimeStamp
            | Self::AllDataObjectsTimeStamp
            | Self::OtherSignedDataObject => PropertyGroup::SignedDataObject,
            Self::OtherUnsignedDataObject => PropertyGroup::UnsignedDataObject,
        }
    }

    pub fn is_signed(&self) -> bool {
        self.group().is_signed()
    }

    pub fn is_signature_level(&self) -> bool {
        self.group().is_signature_level()
    }

    pub fn is_other(&self) -> bool {
        matches!(
            self,
            Self::OtherSignedSignature
                | Self::OtherUnsignedSignature
                | Self::OtherSignedDataObject
                | Self::OtherUnsignedDataObject
        )
    }

    pub fn is_time_stamp(&self) -> bool {
        matches!(
            self,
            Self::SignatureTimeStamp
                | Self::SigAndRefsTimeStamp
                | Self::ArchiveTimeStamp
                | Self::IndividualDataObjectsTimeStamp
                | Self::AllDataObjectsTimeStamp
        )
    }

    /// How a property container accepts this kind.
    pub fn insertion_policy(&self) -> InsertionPolicy {
        match self {
            Self::SigningTime
            | Self::SignatureProductionPlace
            | Self::SignerRole
            | Self::SigningCertificate
            | Self::SignaturePolicy
            | Self::CompleteCertificateRefs
            | Self::CompleteRevocationRefs
            | Self::AttrAuthoritiesCertValues
            | Self::AttributeRevocationValues
            | Self::CertificateValues
            | Self::RevocationValues
            | Self::DataObjectFormat => InsertionPolicy::Put,
            _ => InsertionPolicy::Add,
        }
    }

    /// Default target multiplicity; `None` for signature-level kinds.
    ///
    /// "Other" data-object kinds default to [`TargetMultiplicity::N`] and
    /// may pick a different multiplicity per instance.
    pub fn target_multiplicity(&self) -> Option<TargetMultiplicity> {
        match self {
            Self::DataObjectFormat => Some(TargetMultiplicity::One),
            Self::CommitmentType
            | Self::IndividualDataObjectsTimeStamp
            | Self::OtherSignedDataObject
            | Self::OtherUnsignedDataObject => Some(TargetMultiplicity::N),
            Self::AllDataObjectsCommitmentType | Self::AllDataObjectsTimeStamp => {
                Some(TargetMultiplicity::All)
            }
            _ => None,
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
