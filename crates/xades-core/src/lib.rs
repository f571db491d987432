#![forbid(unsafe_code)]

//! Core types for the XAdES qualifying-properties engine.
//!
//! Everything else in the workspace builds on the error taxonomy, the
//! algorithm identifiers and the property-kind discriminator defined here.

pub mod algorithm;
pub mod digest;
pub mod error;
pub mod form;
pub mod kind;
pub mod ns;

pub use algorithm::Algorithm;
pub use error::{BoxError, Error, Result};
pub use form::SignatureForm;
pub use kind::{InsertionPolicy, PropertyGroup, PropertyKind, TargetMultiplicity};

/// Point in time used for signing times and time-stamp generation times.
///
/// This is the same `der::DateTime` the X.509 validity checks work with, so
/// certificate and time-stamp times compare without conversion.
pub type Timestamp = der::DateTime;
