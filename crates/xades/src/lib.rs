#![forbid(unsafe_code)]

//! XAdES qualifying properties for XML signatures.
//!
//! Re-exports the workspace crates under one roof.

pub use xades_core as core;
pub use xades_properties as properties;
pub use xades_timestamp as timestamp;
pub use xades_validation as validation;
pub use xades_xml as xml;

pub use xades_core::{Error, PropertyKind, Result, SignatureForm};
pub use xades_properties::{QualifyingProperties, SignedDataObjects, SignaturePropertiesCollector};
pub use xades_validation::XadesProfile;
