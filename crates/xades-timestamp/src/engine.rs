#![forbid(unsafe_code)]

//! Capabilities borrowed from the XML signature engine.

use xades_core::{Algorithm, BoxError};

/// Content of a `ds:Reference` after its transform chain ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceData<N> {
    Octets(Vec<u8>),
    NodeSet(Vec<N>),
}

/// The two operations time-stamp inputs need from an XML signature engine.
///
/// Errors are the engine's own; callers wrap them as
/// [`Error::DigestInputConstructionFailed`](xades_core::Error::DigestInputConstructionFailed).
pub trait XmlSignatureEngine {
    /// Handle to an element or other node of the signed document.
    type Node;
    /// Handle to a `ds:Reference` of the signature.
    type Reference;

    /// Dereference `reference` and apply its transforms.
    fn reference_content(
        &self,
        reference: &Self::Reference,
    ) -> Result<ReferenceData<Self::Node>, BoxError>;

    /// Canonicalize `nodes` (each with its subtree) with `c14n`.
    fn canonicalize(&self, nodes: &[Self::Node], c14n: &Algorithm) -> Result<Vec<u8>, BoxError>;
}
