#![forbid(unsafe_code)]

//! Digest-input composition for each XAdES time-stamp property, in the
//! source order ETSI TS 101 903 fixes for it.
//!
//! Locating the sources in the document is up to the caller; these helpers
//! only guarantee the order in which they are fed to the input.

use crate::digest_input::TimeStampDigestInput;
use crate::engine::XmlSignatureEngine;
use std::sync::Arc;
use xades_core::{Algorithm, Error};

/// `SignatureTimeStamp`: the `ds:SignatureValue` element alone.
pub fn signature_time_stamp<'e, E: XmlSignatureEngine>(
    engine: &'e E,
    c14n: Arc<Algorithm>,
    signature_value: &E::Node,
) -> Result<TimeStampDigestInput<'e, E>, Error> {
    let mut input = TimeStampDigestInput::new(engine, c14n);
    input.add_node(signature_value)?;
    Ok(input)
}

/// `AllDataObjectsTimeStamp`: every `ds:Reference` in `SignedInfo` order,
/// the one to `SignedProperties` excluded.
pub fn all_data_objects_time_stamp<'e, 'r, E: XmlSignatureEngine>(
    engine: &'e E,
    c14n: Arc<Algorithm>,
    references: impl IntoIterator<Item = &'r E::Reference>,
) -> Result<TimeStampDigestInput<'e, E>, Error>
where
    E::Reference: 'r,
{
    let mut input = TimeStampDigestInput::new(engine, c14n);
    for reference in references {
        input.add_reference(reference)?;
    }
    Ok(input)
}

/// `IndividualDataObjectsTimeStamp`: the references named by its `Include`
/// elements, in `Include` order.
pub fn individual_data_objects_time_stamp<'e, 'r, E: XmlSignatureEngine>(
    engine: &'e E,
    c14n: Arc<Algorithm>,
    included: impl IntoIterator<Item = &'r E::Reference>,
) -> Result<TimeStampDigestInput<'e, E>, Error>
where
    E::Reference: 'r,
{
    all_data_objects_time_stamp(engine, c14n, included)
}

/// Sources of a `SigAndRefsTimeStamp`.
pub struct SigAndRefsSources<'a, N> {
    pub signature_value: &'a N,
    /// Every `SignatureTimeStamp`, in document order.
    pub signature_time_stamps: Vec<&'a N>,
    pub complete_certificate_refs: &'a N,
    pub complete_revocation_refs: &'a N,
    pub attribute_certificate_refs: Option<&'a N>,
    pub attribute_revocation_refs: Option<&'a N>,
}

pub fn sig_and_refs_time_stamp<'e, E: XmlSignatureEngine>(
    engine: &'e E,
    c14n: Arc<Algorithm>,
    sources: &SigAndRefsSources<'_, E::Node>,
) -> Result<TimeStampDigestInput<'e, E>, Error> {
    let mut input = TimeStampDigestInput::new(engine, c14n);
    input.add_node(sources.signature_value)?;
    for ts in &sources.signature_time_stamps {
        input.add_node(ts)?;
    }
    input
        .add_node(sources.complete_certificate_refs)?
        .add_node(sources.complete_revocation_refs)?;
    if let Some(node) = sources.attribute_certificate_refs {
        input.add_node(node)?;
    }
    if let Some(node) = sources.attribute_revocation_refs {
        input.add_node(node)?;
    }
    Ok(input)
}

/// Sources of an `ArchiveTimeStamp`.
pub struct ArchiveSources<'a, N, R> {
    /// Every `ds:Reference`, in `SignedInfo` order.
    pub references: Vec<&'a R>,
    pub signed_info: &'a N,
    pub signature_value: &'a N,
    pub key_info: Option<&'a N>,
    /// Unsigned signature properties preceding this time-stamp, in
    /// document order.
    pub unsigned_signature_properties: Vec<&'a N>,
    /// `ds:Object` elements other than the one holding
    /// `QualifyingProperties`.
    pub objects: Vec<&'a N>,
}

pub fn archive_time_stamp<'e, E: XmlSignatureEngine>(
    engine: &'e E,
    c14n: Arc<Algorithm>,
    sources: &ArchiveSources<'_, E::Node, E::Reference>,
) -> Result<TimeStampDigestInput<'e, E>, Error> {
    let mut input = TimeStampDigestInput::new(engine, c14n);
    for reference in &sources.references {
        input.add_reference(reference)?;
    }
    input
        .add_node(sources.signed_info)?
        .add_node(sources.signature_value)?;
    if let Some(key_info) = sources.key_info {
        input.add_node(key_info)?;
    }
    for node in sources
        .unsigned_signature_properties
        .iter()
        .chain(&sources.objects)
    {
        input.add_node(node)?;
    }
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest_input::tests::TableEngine;
    use crate::engine::ReferenceData;
    use xades_core::algorithm;

    fn c14n() -> Arc<Algorithm> {
        Arc::new(Algorithm::new(algorithm::C14N))
    }

    fn engine() -> TableEngine {
        let mut engine = TableEngine::default();
        engine
            .references
            .insert("#r1", ReferenceData::Octets(b"[r1]".to_vec()));
        engine
            .references
            .insert("#r2", ReferenceData::NodeSet(vec!["[r2]"]));
        engine
    }

    #[test]
    fn test_signature_time_stamp_covers_signature_value() {
        let engine = engine();
        let input = signature_time_stamp(&engine, c14n(), &"<SignatureValue/>").unwrap();
        assert_eq!(input.get_bytes(), b"<SignatureValue/>");
    }

    #[test]
    fn test_data_object_time_stamps_follow_reference_order() {
        let engine = engine();
        let refs = ["#r2", "#r1"];
        let input = all_data_objects_time_stamp(&engine, c14n(), refs.iter()).unwrap();
        assert_eq!(input.get_bytes(), b"[r2][r1]");
        let input = individual_data_objects_time_stamp(&engine, c14n(), [&"#r1"]).unwrap();
        assert_eq!(input.get_bytes(), b"[r1]");
    }

    #[test]
    fn test_sig_and_refs_order() {
        let engine = engine();
        let sources = SigAndRefsSources {
            signature_value: &"SV;",
            signature_time_stamps: vec![&"TS1;", &"TS2;"],
            complete_certificate_refs: &"CCR;",
            complete_revocation_refs: &"CRR;",
            attribute_certificate_refs: None,
            attribute_revocation_refs: Some(&"ARR;"),
        };
        let input = sig_and_refs_time_stamp(&engine, c14n(), &sources).unwrap();
        assert_eq!(input.get_bytes(), b"SV;TS1;TS2;CCR;CRR;ARR;");
    }

    #[test]
    fn test_archive_order() {
        let engine = engine();
        let sources = ArchiveSources {
            references: vec![&"#r1", &"#r2"],
            signed_info: &"SI;",
            signature_value: &"SV;",
            key_info: Some(&"KI;"),
            unsigned_signature_properties: vec![&"STS;", &"CV;"],
            objects: vec![&"OBJ;"],
        };
        let input = archive_time_stamp(&engine, c14n(), &sources).unwrap();
        assert_eq!(input.get_bytes(), b"[r1][r2]SI;SV;KI;STS;CV;OBJ;");
    }

    #[test]
    fn test_unresolvable_reference_fails_the_whole_input() {
        let engine = engine();
        assert!(matches!(
            all_data_objects_time_stamp(&engine, c14n(), [&"#r1", &"#gone"]),
            Err(Error::DigestInputConstructionFailed(_))
        ));
    }
}
