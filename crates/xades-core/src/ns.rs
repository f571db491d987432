#![forbid(unsafe_code)]

//! XML namespace constants and element names used across the workspace.

/// XML Digital Signature namespace
pub const DSIG: &str = "http://www.w3.org/2000/09/xmldsig#";

/// XAdES 1.3.2 namespace
pub const XADES: &str = "http://uri.etsi.org/01903/v1.3.2#";

/// XAdES 1.4.1 namespace (TimeStampValidationData, ArchiveTimeStamp v1.4.1)
pub const XADES141: &str = "http://uri.etsi.org/01903/v1.4.1#";

/// `Type` of the `ds:Reference` that covers `SignedProperties`.
pub const SIGNED_PROPERTIES_TYPE: &str = "http://uri.etsi.org/01903#SignedProperties";

// ── Element names ────────────────────────────────────────────────────

pub mod node {
    // DSig elements
    pub const SIGNATURE: &str = "Signature";
    pub const SIGNED_INFO: &str = "SignedInfo";
    pub const SIGNATURE_VALUE: &str = "SignatureValue";
    pub const KEY_INFO: &str = "KeyInfo";
    pub const OBJECT: &str = "Object";
    pub const REFERENCE: &str = "Reference";
    pub const CANONICALIZATION_METHOD: &str = "CanonicalizationMethod";

    // XAdES containers
    pub const QUALIFYING_PROPERTIES: &str = "QualifyingProperties";
    pub const SIGNED_PROPERTIES: &str = "SignedProperties";
    pub const UNSIGNED_PROPERTIES: &str = "UnsignedProperties";
    pub const SIGNED_SIGNATURE_PROPERTIES: &str = "SignedSignatureProperties";
    pub const UNSIGNED_SIGNATURE_PROPERTIES: &str = "UnsignedSignatureProperties";
    pub const SIGNED_DATA_OBJECT_PROPERTIES: &str = "SignedDataObjectProperties";
    pub const UNSIGNED_DATA_OBJECT_PROPERTIES: &str = "UnsignedDataObjectProperties";
    pub const UNSIGNED_DATA_OBJECT_PROPERTY: &str = "UnsignedDataObjectProperty";

    // XAdES property children
    pub const OBJECT_REFERENCE: &str = "ObjectReference";
    pub const ALL_SIGNED_DATA_OBJECTS: &str = "AllSignedDataObjects";
    pub const INCLUDE: &str = "Include";
    pub const ENCAPSULATED_TIME_STAMP: &str = "EncapsulatedTimeStamp";
    pub const ATTRIBUTE_CERTIFICATE_REFS: &str = "AttributeCertificateRefs";
    pub const ATTRIBUTE_REVOCATION_REFS: &str = "AttributeRevocationRefs";
}

// ── Attribute names ──────────────────────────────────────────────────

pub mod attr {
    pub const ID: &str = "Id";
    pub const URI: &str = "URI";
    pub const TYPE: &str = "Type";
    pub const TARGET: &str = "Target";
    pub const ALGORITHM: &str = "Algorithm";
    pub const OBJECT_REFERENCE: &str = "ObjectReference";
}
