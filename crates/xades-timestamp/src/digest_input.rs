#![forbid(unsafe_code)]

//! The byte string a time-stamp token is computed over.

use crate::engine::{ReferenceData, XmlSignatureEngine};
use std::fmt;
use std::sync::Arc;
use xades_core::{Algorithm, Error};

/// Accumulates the digest input of one time-stamp.
///
/// Sources are appended in call order with nothing in between. A failed
/// append leaves the buffer as it was; the instance should then be
/// dropped, since the input it describes can no longer be completed.
pub struct TimeStampDigestInput<'e, E: XmlSignatureEngine> {
    engine: &'e E,
    c14n: Arc<Algorithm>,
    buffer: Vec<u8>,
}

impl<'e, E: XmlSignatureEngine> TimeStampDigestInput<'e, E> {
    /// `c14n` is applied to every node-set source of this input.
    pub fn new(engine: &'e E, c14n: Arc<Algorithm>) -> Self {
        Self {
            engine,
            c14n,
            buffer: Vec::new(),
        }
    }

    pub fn c14n(&self) -> &Arc<Algorithm> {
        &self.c14n
    }

    /// Append the transformed content of `reference`, canonicalized if it
    /// is a node-set.
    pub fn add_reference(&mut self, reference: &E::Reference) -> Result<&mut Self, Error> {
        let content = self
            .engine
            .reference_content(reference)
            .map_err(Error::DigestInputConstructionFailed)?;
        let octets = match content {
            ReferenceData::Octets(octets) => octets,
            ReferenceData::NodeSet(nodes) => self
                .engine
                .canonicalize(&nodes, &self.c14n)
                .map_err(Error::DigestInputConstructionFailed)?,
        };
        self.append(octets, "reference");
        Ok(self)
    }

    /// Append the canonical form of `node`.
    pub fn add_node(&mut self, node: &E::Node) -> Result<&mut Self, Error> {
        let octets = self
            .engine
            .canonicalize(std::slice::from_ref(node), &self.c14n)
            .map_err(Error::DigestInputConstructionFailed)?;
        self.append(octets, "node");
        Ok(self)
    }

    /// The input accumulated so far.
    pub fn get_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    fn append(&mut self, octets: Vec<u8>, source: &'static str) {
        self.buffer.extend_from_slice(&octets);
        tracing::trace!(
            source,
            appended = octets.len(),
            total = self.buffer.len(),
            "time-stamp input extended"
        );
    }
}

impl<E: XmlSignatureEngine> fmt::Debug for TimeStampDigestInput<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimeStampDigestInput")
            .field("c14n", &self.c14n.uri())
            .field("len", &self.buffer.len())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use xades_core::{algorithm, BoxError};

    /// Engine over a fixed table: references map to octets or node lists,
    /// nodes canonicalize to their text prefixed by the algorithm tag.
    #[derive(Default)]
    pub(crate) struct TableEngine {
        pub references: HashMap<&'static str, ReferenceData<&'static str>>,
        pub c14n_tag: bool,
    }

    impl XmlSignatureEngine for TableEngine {
        type Node = &'static str;
        type Reference = &'static str;

        fn reference_content(
            &self,
            reference: &&'static str,
        ) -> Result<ReferenceData<&'static str>, BoxError> {
            self.references
                .get(reference)
                .cloned()
                .ok_or_else(|| format!("cannot dereference {reference}").into())
        }

        fn canonicalize(&self, nodes: &[&'static str], c14n: &Algorithm) -> Result<Vec<u8>, BoxError> {
            let mut out = Vec::new();
            for node in nodes {
                if node.starts_with('!') {
                    return Err(format!("malformed node {node}").into());
                }
                if self.c14n_tag && c14n.uri() == algorithm::EXC_C14N {
                    out.extend_from_slice(b"x:");
                }
                out.extend_from_slice(node.as_bytes());
            }
            Ok(out)
        }
    }

    fn c14n() -> Arc<Algorithm> {
        Arc::new(Algorithm::new(algorithm::C14N))
    }

    #[test]
    fn test_octets_then_node_concatenate_in_order() {
        let mut engine = TableEngine::default();
        engine
            .references
            .insert("#raw", ReferenceData::Octets(b"A".to_vec()));
        let mut input = TimeStampDigestInput::new(&engine, c14n());
        input.add_reference(&"#raw").unwrap().add_node(&"B").unwrap();
        assert_eq!(input.get_bytes(), b"AB");
        assert_eq!(input.get_bytes(), b"AB");
    }

    #[test]
    fn test_node_set_reference_uses_configured_c14n() {
        let mut engine = TableEngine {
            c14n_tag: true,
            ..TableEngine::default()
        };
        engine
            .references
            .insert("#xml", ReferenceData::NodeSet(vec!["<a/>", "<b/>"]));
        let exc = Arc::new(Algorithm::new(algorithm::EXC_C14N));
        let mut input = TimeStampDigestInput::new(&engine, exc);
        input.add_reference(&"#xml").unwrap();
        assert_eq!(input.get_bytes(), b"x:<a/>x:<b/>");
    }

    #[test]
    fn test_failure_keeps_the_buffer_and_the_cause() {
        let mut engine = TableEngine::default();
        engine
            .references
            .insert("#bad", ReferenceData::NodeSet(vec!["<ok/>", "!broken"]));
        let mut input = TimeStampDigestInput::new(&engine, c14n());
        input.add_node(&"<first/>").unwrap();

        let err = input.add_reference(&"#bad").unwrap_err();
        assert!(err.is_external());
        assert!(err.to_string().contains("malformed node !broken"));
        assert!(matches!(
            input.add_reference(&"#missing"),
            Err(Error::DigestInputConstructionFailed(_))
        ));
        assert_eq!(input.get_bytes(), b"<first/>");
    }
}
