#![forbid(unsafe_code)]

//! Reduce the qualifying properties of each signature to a layout.
//!
//! Nothing here judges the structure; [`ScannedSignature::check`] hands
//! the layout to [`xades_properties::structure::check`]. The scan only
//! fails on documents it cannot read a layout from at all.

use crate::document::{
    build_id_map, child_element, child_elements, find_elements, is_xades, SignedDocument,
};
use roxmltree::Node;
use std::collections::HashSet;
use xades_core::ns::{self, attr, node};
use xades_core::{Error, PropertyGroup, PropertyKind, SignatureForm};
use xades_properties::{form, structure, LayoutEntry, PropertyLayout};

/// Layout of one `ds:Signature`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedSignature {
    /// `Id` of the `ds:Signature` element.
    pub id: Option<String>,
    /// Whether a `QualifyingProperties` element was found at all.
    pub qualified: bool,
    pub layout: PropertyLayout,
}

impl ScannedSignature {
    /// Replay the layout through the describe-phase rules.
    pub fn check(&self) -> Result<(), Error> {
        structure::check(&self.layout)
    }

    pub fn form(&self) -> Option<SignatureForm> {
        form::detect(self.layout.kinds())
    }
}

/// Scan every `ds:Signature` of `document`, in document order.
pub fn scan(document: &SignedDocument) -> Result<Vec<ScannedSignature>, Error> {
    let doc = document.parse_doc()?;
    // Ambiguous Ids would let a property point at a reference it does not
    // cover.
    build_id_map(&doc)?;
    find_elements(&doc, ns::DSIG, node::SIGNATURE)
        .into_iter()
        .map(scan_signature)
        .collect()
}

/// Scan one `ds:Signature` element.
pub fn scan_signature(signature: Node<'_, '_>) -> Result<ScannedSignature, Error> {
    let id = signature.attribute(attr::ID).map(str::to_owned);
    let signed_info = child_element(signature, ns::DSIG, node::SIGNED_INFO)
        .ok_or_else(|| Error::MissingElement("ds:SignedInfo".into()))?;

    let mut references = Vec::new();
    let mut seen = HashSet::new();
    for reference in child_elements(signed_info, ns::DSIG, node::REFERENCE) {
        if reference.attribute(attr::TYPE) == Some(ns::SIGNED_PROPERTIES_TYPE) {
            continue;
        }
        if let Some(ref_id) = reference.attribute(attr::ID) {
            if !seen.insert(ref_id) {
                return Err(Error::DuplicateDataObject(ref_id.to_owned()));
            }
            references.push(ref_id.to_owned());
        }
    }
    let mut layout = PropertyLayout::new(references);

    let Some(qualifying) = child_elements(signature, ns::DSIG, node::OBJECT)
        .find_map(|object| {
            object
                .children()
                .find(|n| is_xades(*n) && n.tag_name().name() == node::QUALIFYING_PROPERTIES)
        })
    else {
        tracing::debug!(signature = ?id, "no QualifyingProperties");
        return Ok(ScannedSignature {
            id,
            qualified: false,
            layout,
        });
    };

    if let (Some(target), Some(sig_id)) = (qualifying.attribute(attr::TARGET), id.as_deref()) {
        if target.strip_prefix('#') != Some(sig_id) {
            return Err(Error::UnresolvedTarget(format!(
                "QualifyingProperties -> {target}"
            )));
        }
    }

    for section in qualifying.children().filter(|n| is_xades(*n)) {
        let groups: &[(&str, PropertyGroup)] = match section.tag_name().name() {
            node::SIGNED_PROPERTIES => &[
                (node::SIGNED_SIGNATURE_PROPERTIES, PropertyGroup::SignedSignature),
                (node::SIGNED_DATA_OBJECT_PROPERTIES, PropertyGroup::SignedDataObject),
            ],
            node::UNSIGNED_PROPERTIES => &[
                (node::UNSIGNED_SIGNATURE_PROPERTIES, PropertyGroup::UnsignedSignature),
                (node::UNSIGNED_DATA_OBJECT_PROPERTIES, PropertyGroup::UnsignedDataObject),
            ],
            other => {
                tracing::debug!(element = other, "skipping unknown QualifyingProperties child");
                continue;
            }
        };
        for container in section.children().filter(|n| n.is_element()) {
            let name = container.tag_name().name();
            let Some((_, group)) = groups.iter().find(|(n, _)| *n == name && is_xades(container))
            else {
                tracing::debug!(element = name, "skipping unknown property container");
                continue;
            };
            for property in container.children().filter(|n| n.is_element()) {
                layout.push(scan_property(property, *group)?);
            }
        }
    }

    tracing::debug!(
        signature = ?id,
        references = layout.references.len(),
        properties = layout.entries.len(),
        "qualifying properties scanned"
    );
    Ok(ScannedSignature {
        id,
        qualified: true,
        layout,
    })
}

/// Classify one property element found in the `container` group.
fn scan_property(property: Node<'_, '_>, container: PropertyGroup) -> Result<LayoutEntry, Error> {
    let local = property.tag_name().name();
    let kind = if is_xades(property) {
        PropertyKind::from_element_name(local).unwrap_or(PropertyKind::other_in(container))
    } else {
        PropertyKind::other_in(container)
    };

    let entry = match kind {
        PropertyKind::CommitmentType => {
            let all = xades_children(property, node::ALL_SIGNED_DATA_OBJECTS).next();
            if all.is_some() {
                LayoutEntry::new(PropertyKind::AllDataObjectsCommitmentType, container)
            } else {
                xades_children(property, node::OBJECT_REFERENCE).fold(
                    LayoutEntry::new(kind, container),
                    |entry, reference| entry.with_target(reference.text().unwrap_or("").trim()),
                )
            }
        }
        PropertyKind::DataObjectFormat => {
            let target = property.attribute(attr::OBJECT_REFERENCE).ok_or_else(|| {
                Error::MissingAttribute(format!("{local}/@{}", attr::OBJECT_REFERENCE))
            })?;
            LayoutEntry::new(kind, container).with_target(target)
        }
        PropertyKind::IndividualDataObjectsTimeStamp => {
            let mut entry = LayoutEntry::new(kind, container);
            for include in xades_children(property, node::INCLUDE) {
                let uri = include.attribute(attr::URI).ok_or_else(|| {
                    Error::MissingAttribute(format!("{}/@{}", node::INCLUDE, attr::URI))
                })?;
                entry = entry.with_target(uri);
            }
            entry
        }
        _ => LayoutEntry::new(kind, container),
    };
    tracing::trace!(element = local, kind = %entry.kind, targets = entry.targets.len(), "property");
    Ok(entry)
}

fn xades_children<'a, 'i>(
    parent: Node<'a, 'i>,
    local_name: &'static str,
) -> impl Iterator<Item = Node<'a, 'i>> {
    parent
        .children()
        .filter(move |n| is_xades(*n) && n.tag_name().name() == local_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use xades_core::TargetMultiplicity;

    fn signature(signed_info: &str, qualifying: &str) -> String {
        format!(
            r##"<?xml version="1.0"?>
<doc>
<ds:Signature Id="sig" xmlns:ds="http://www.w3.org/2000/09/xmldsig#"
              xmlns:xades="http://uri.etsi.org/01903/v1.3.2#"
              xmlns:xades141="http://uri.etsi.org/01903/v1.4.1#">
  <ds:SignedInfo>
    <ds:CanonicalizationMethod Algorithm="http://www.w3.org/TR/2001/REC-xml-c14n-20010315"/>
    {signed_info}
    <ds:Reference Type="http://uri.etsi.org/01903#SignedProperties" URI="#sp"/>
  </ds:SignedInfo>
  <ds:SignatureValue>AAAA</ds:SignatureValue>
  <ds:Object>
    <xades:QualifyingProperties Target="#sig">{qualifying}</xades:QualifyingProperties>
  </ds:Object>
</ds:Signature>
</doc>"##
        )
    }

    const TWO_REFS: &str = r##"<ds:Reference Id="r1" URI="#a"/><ds:Reference Id="r2" URI="#b"/>"##;

    fn scan_one(xml: String) -> Result<ScannedSignature, Error> {
        let document = SignedDocument::parse(xml)?;
        let mut signatures = scan(&document)?;
        assert_eq!(signatures.len(), 1);
        Ok(signatures.remove(0))
    }

    #[test]
    fn test_scan_xades_t_signature() {
        let xml = signature(
            TWO_REFS,
            r##"<xades:SignedProperties Id="sp">
  <xades:SignedSignatureProperties>
    <xades:SigningTime>2024-07-14T09:30:00Z</xades:SigningTime>
    <xades:SigningCertificate/>
  </xades:SignedSignatureProperties>
  <xades:SignedDataObjectProperties>
    <xades:DataObjectFormat ObjectReference="#r1"><xades:MimeType>text/xml</xades:MimeType></xades:DataObjectFormat>
    <xades:CommitmentTypeIndication>
      <xades:CommitmentTypeId><xades:Identifier>http://uri.etsi.org/01903/v1.2.2#ProofOfOrigin</xades:Identifier></xades:CommitmentTypeId>
      <xades:ObjectReference>#r1</xades:ObjectReference>
      <xades:ObjectReference> #r2 </xades:ObjectReference>
    </xades:CommitmentTypeIndication>
    <xades:CommitmentTypeIndication>
      <xades:CommitmentTypeId><xades:Identifier>urn:approval</xades:Identifier></xades:CommitmentTypeId>
      <xades:AllSignedDataObjects/>
    </xades:CommitmentTypeIndication>
    <xades:IndividualDataObjectsTimeStamp>
      <xades:Include URI="#r2"/>
      <xades:EncapsulatedTimeStamp>AAAA</xades:EncapsulatedTimeStamp>
    </xades:IndividualDataObjectsTimeStamp>
  </xades:SignedDataObjectProperties>
</xades:SignedProperties>
<xades:UnsignedProperties>
  <xades:UnsignedSignatureProperties>
    <xades:SignatureTimeStamp><xades:EncapsulatedTimeStamp>AAAA</xades:EncapsulatedTimeStamp></xades:SignatureTimeStamp>
    <xades141:TimeStampValidationData/>
    <acme:Note xmlns:acme="urn:acme">unsigned note</acme:Note>
  </xades:UnsignedSignatureProperties>
</xades:UnsignedProperties>"##,
        );
        let scanned = scan_one(xml).unwrap();
        assert_eq!(scanned.id.as_deref(), Some("sig"));
        assert!(scanned.qualified);
        assert_eq!(scanned.layout.references, vec!["r1", "r2"]);
        assert_eq!(
            scanned.layout.kinds().collect::<Vec<_>>(),
            vec![
                PropertyKind::SigningTime,
                PropertyKind::SigningCertificate,
                PropertyKind::DataObjectFormat,
                PropertyKind::CommitmentType,
                PropertyKind::AllDataObjectsCommitmentType,
                PropertyKind::IndividualDataObjectsTimeStamp,
                PropertyKind::SignatureTimeStamp,
                PropertyKind::TimeStampValidationData,
                PropertyKind::OtherUnsignedSignature,
            ]
        );
        assert_eq!(scanned.layout.entries[3].targets, vec!["r1", "r2"]);
        assert_eq!(scanned.layout.entries[5].targets, vec!["r2"]);
        scanned.check().unwrap();
        assert_eq!(scanned.form(), Some(SignatureForm::T));
    }

    #[test]
    fn test_structure_violations_surface_through_check() {
        let xml = signature(
            TWO_REFS,
            r##"<xades:SignedProperties>
  <xades:SignedSignatureProperties><xades:SigningCertificate/></xades:SignedSignatureProperties>
  <xades:SignedDataObjectProperties>
    <xades:DataObjectFormat ObjectReference="#r1"/>
    <xades:DataObjectFormat ObjectReference="#r1"/>
  </xades:SignedDataObjectProperties>
</xades:SignedProperties>"##,
        );
        let scanned = scan_one(xml).unwrap();
        assert!(matches!(
            scanned.check(),
            Err(Error::DuplicatePropertyKind(PropertyKind::DataObjectFormat))
        ));

        let xml = signature(
            TWO_REFS,
            r##"<xades:UnsignedProperties>
  <xades:UnsignedSignatureProperties><xades:SigningTime/></xades:UnsignedSignatureProperties>
</xades:UnsignedProperties>"##,
        );
        assert!(matches!(
            scan_one(xml).unwrap().check(),
            Err(Error::MisplacedProperty {
                kind: PropertyKind::SigningTime,
                ..
            })
        ));

        let xml = signature(
            TWO_REFS,
            r##"<xades:SignedProperties><xades:SignedDataObjectProperties>
  <xades:CommitmentTypeIndication><xades:ObjectReference>#r9</xades:ObjectReference></xades:CommitmentTypeIndication>
</xades:SignedDataObjectProperties></xades:SignedProperties>"##,
        );
        assert!(matches!(
            scan_one(xml).unwrap().check(),
            Err(Error::UnresolvedTarget(_))
        ));
    }

    #[test]
    fn test_unsigned_data_object_properties_are_other() {
        let xml = signature(
            TWO_REFS,
            r##"<xades:UnsignedProperties><xades:UnsignedDataObjectProperties>
  <xades:UnsignedDataObjectProperty>free form</xades:UnsignedDataObjectProperty>
</xades:UnsignedDataObjectProperties></xades:UnsignedProperties>"##,
        );
        let scanned = scan_one(xml).unwrap();
        let entry = &scanned.layout.entries[0];
        assert_eq!(entry.kind, PropertyKind::OtherUnsignedDataObject);
        assert_eq!(entry.container, PropertyGroup::UnsignedDataObject);
        assert_eq!(
            entry.kind.target_multiplicity(),
            Some(TargetMultiplicity::N)
        );
        scanned.check().unwrap();
        assert_eq!(scanned.form(), None);
    }

    #[test]
    fn test_unreadable_layouts() {
        let dup = signature(
            r##"<ds:Reference Id="r1" URI="#a"/><ds:Reference Id="r1" URI="#b"/>"##,
            "",
        );
        // Duplicate reference Ids are also duplicate document Ids.
        assert!(matches!(scan_one(dup), Err(Error::XmlParse(_))));

        let untargeted = signature(
            TWO_REFS,
            r##"<xades:SignedProperties><xades:SignedDataObjectProperties>
  <xades:DataObjectFormat/>
</xades:SignedDataObjectProperties></xades:SignedProperties>"##,
        );
        assert!(matches!(scan_one(untargeted), Err(Error::MissingAttribute(_))));

        let stray = signature(TWO_REFS, "").replace(r##"Target="#sig""##, r##"Target="#other""##);
        assert!(matches!(scan_one(stray), Err(Error::UnresolvedTarget(_))));
    }

    #[test]
    fn test_signature_without_qualifying_properties() {
        let xml = r##"<ds:Signature xmlns:ds="http://www.w3.org/2000/09/xmldsig#">
  <ds:SignedInfo><ds:Reference URI=""/></ds:SignedInfo>
</ds:Signature>"##;
        let scanned = scan_one(xml.into()).unwrap();
        assert!(!scanned.qualified);
        assert!(scanned.layout.references.is_empty());
        assert!(scanned.layout.entries.is_empty());

        let bare = r##"<ds:Signature xmlns:ds="http://www.w3.org/2000/09/xmldsig#"/>"##;
        assert!(matches!(scan_one(bare.into()), Err(Error::MissingElement(_))));
    }
}
