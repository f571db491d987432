#![forbid(unsafe_code)]

//! Time-stamp digest inputs.
//!
//! A time-stamp covers the ordered concatenation of the octets of its
//! sources, XML node-set sources being canonicalized first. The XML
//! signature engine that dereferences and canonicalizes is a collaborator
//! behind [`XmlSignatureEngine`].

pub mod digest_input;
pub mod engine;
pub mod inputs;
pub mod stamper;

pub use digest_input::TimeStampDigestInput;
pub use engine::{ReferenceData, XmlSignatureEngine};
pub use inputs::{ArchiveSources, SigAndRefsSources};
pub use stamper::TimeStamper;
