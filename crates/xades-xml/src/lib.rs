#![forbid(unsafe_code)]

//! XML side of the XAdES engine.
//!
//! Wraps a signed document over `roxmltree` and reduces the
//! `QualifyingProperties` of each `ds:Signature` to a
//! [`PropertyLayout`](xades_properties::PropertyLayout) that the structure
//! checker can judge.

pub mod document;
pub mod scan;

pub use document::SignedDocument;
pub use scan::{scan, scan_signature, ScannedSignature};

/// `roxmltree` options used for every parse.
///
/// DTDs are accepted: `roxmltree` only substitutes the predefined entities
/// and never fetches external ones.
pub fn parsing_options() -> roxmltree::ParsingOptions {
    roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    }
}
