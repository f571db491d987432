#![forbid(unsafe_code)]

//! XAdES qualifying-property model.
//!
//! Properties are declared on [`DataObjectDescription`]s and a
//! [`SignaturePropertiesCollector`] before the base XML signature exists.
//! Every declaration is checked immediately: container discipline
//! (put/add), target multiplicity, duplicate transforms. A rejected
//! declaration leaves the container exactly as it was.
//!
//! The describe-phase objects share property instances through `Rc` and are
//! therefore confined to the thread running the operation.

pub mod bag;
pub mod collector;
pub mod data_object;
pub mod description;
pub mod form;
pub mod qualifying;
pub mod signature;
pub mod structure;
pub mod timestamp;

pub use bag::{PropertiesList, PropertiesSet, Property, PropertyInstance};
pub use collector::{SignaturePropertiesCollector, SignaturePropertiesProvider};
pub use data_object::{
    AllDataObjectsCommitmentType, AttachState, CommitmentType, DataObjectFormat, DataObjectId,
    DataObjectPayload, DataObjectProperty, OtherDataObjectProperty, SignedDataObjectProperty,
    TargetSet, UnsignedDataObjectProperty,
};
pub use description::{DataObjectDescription, SignedDataObjects};
pub use qualifying::{QualifyingProperties, QualifyingProperty, SignedProperties, UnsignedProperties};
pub use signature::{
    CertificateValues, CompleteCertificateRefs, CompleteRevocationRefs, CounterSignature,
    OtherProperty, RevocationValues, SignaturePolicy, SignatureProductionPlace, SignedSignatureProperty,
    SignerRole, SigningCertificate, SigningTime, TimeStampValidationData, UnsignedSignatureProperty,
};
pub use structure::{LayoutEntry, PropertyLayout};
pub use timestamp::{PendingTimeStamp, ResolvedTimeStamp, TimeStampProperty};
