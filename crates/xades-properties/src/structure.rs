#![forbid(unsafe_code)]

//! Structure check for qualifying properties found in a document.
//!
//! The XML layer reduces `QualifyingProperties` to a [`PropertyLayout`]:
//! which property elements sit in which container and which references
//! they point at. [`check`] replays that layout through the containers and
//! target sets used when signing, so an incoming signature is held to the
//! rules a produced one obeys.

use crate::bag::{PropertiesSet, Property};
use crate::data_object::{DataObjectId, TargetSet};
use std::collections::HashMap;
use std::rc::Rc;
use xades_core::{Error, PropertyGroup, PropertyKind, TargetMultiplicity};

/// A property element and where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutEntry {
    pub kind: PropertyKind,
    /// Container the element sits in.
    pub container: PropertyGroup,
    /// Reference Ids the property points at, without the leading `#`.
    pub targets: Vec<String>,
}

impl LayoutEntry {
    pub fn new(kind: PropertyKind, container: PropertyGroup) -> Self {
        Self {
            kind,
            container,
            targets: Vec::new(),
        }
    }

    pub fn with_target(mut self, reference: impl Into<String>) -> Self {
        let reference = reference.into();
        let reference = match reference.strip_prefix('#') {
            Some(stripped) => stripped.to_owned(),
            None => reference,
        };
        self.targets.push(reference);
        self
    }
}

/// The qualifying-property structure of one signature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyLayout {
    /// `Id`s of the signature's `ds:Reference` elements.
    pub references: Vec<String>,
    pub entries: Vec<LayoutEntry>,
}

impl PropertyLayout {
    pub fn new(references: Vec<String>) -> Self {
        Self {
            references,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: LayoutEntry) {
        self.entries.push(entry);
    }

    pub fn kinds(&self) -> impl Iterator<Item = PropertyKind> + '_ {
        self.entries.iter().map(|e| e.kind)
    }
}

#[derive(Debug)]
struct Found(PropertyKind);

impl Property for Found {
    fn kind(&self) -> PropertyKind {
        self.0
    }
}

/// Check `layout`, failing on the first violation in document order.
pub fn check(layout: &PropertyLayout) -> Result<(), Error> {
    let ids: HashMap<&str, DataObjectId> = layout
        .references
        .iter()
        .map(|r| (r.as_str(), DataObjectId::next()))
        .collect();
    let mut signed_signature = PropertiesSet::new();
    let mut unsigned_signature = PropertiesSet::new();
    let mut per_object: HashMap<DataObjectId, PropertiesSet<Rc<Found>>> = HashMap::new();

    for entry in &layout.entries {
        let kind = entry.kind;
        if kind.group() != entry.container {
            return Err(Error::MisplacedProperty {
                kind,
                container: entry.container.container_name(),
            });
        }
        match entry.container {
            PropertyGroup::SignedSignature => signed_signature.put_or_add(Rc::new(Found(kind)))?,
            PropertyGroup::UnsignedSignature => {
                unsigned_signature.put_or_add(Rc::new(Found(kind)))?
            }
            PropertyGroup::SignedDataObject | PropertyGroup::UnsignedDataObject => {
                check_data_object_entry(entry, &ids, &mut per_object)?
            }
        }
    }
    tracing::debug!(
        entries = layout.entries.len(),
        references = layout.references.len(),
        "qualifying-property structure accepted"
    );
    Ok(())
}

fn check_data_object_entry(
    entry: &LayoutEntry,
    ids: &HashMap<&str, DataObjectId>,
    per_object: &mut HashMap<DataObjectId, PropertiesSet<Rc<Found>>>,
) -> Result<(), Error> {
    let kind = entry.kind;
    // The multiplicity of an unmodelled property is not written down, so
    // only its targets are checked.
    let multiplicity = kind.target_multiplicity().unwrap_or(TargetMultiplicity::N);
    let targets = TargetSet::new(kind, multiplicity);
    let found = Rc::new(Found(kind));
    for reference in &entry.targets {
        let id = *ids
            .get(reference.as_str())
            .ok_or_else(|| Error::UnresolvedTarget(format!("{kind} -> #{reference}")))?;
        targets.attach(id)?;
        per_object.entry(id).or_default().put_or_add(found.clone())?;
    }
    if entry.targets.is_empty() && multiplicity != TargetMultiplicity::All && !kind.is_other() {
        return Err(Error::MissingTarget(kind));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use PropertyGroup::*;

    fn layout(entries: Vec<LayoutEntry>) -> PropertyLayout {
        PropertyLayout {
            references: vec!["r1".into(), "r2".into()],
            entries,
        }
    }

    #[test]
    fn test_well_formed_layout() {
        let l = layout(vec![
            LayoutEntry::new(PropertyKind::SigningTime, SignedSignature),
            LayoutEntry::new(PropertyKind::SigningCertificate, SignedSignature),
            LayoutEntry::new(PropertyKind::DataObjectFormat, SignedDataObject).with_target("#r1"),
            LayoutEntry::new(PropertyKind::DataObjectFormat, SignedDataObject).with_target("#r2"),
            LayoutEntry::new(PropertyKind::CommitmentType, SignedDataObject)
                .with_target("#r1")
                .with_target("#r2"),
            LayoutEntry::new(PropertyKind::AllDataObjectsTimeStamp, SignedDataObject),
            LayoutEntry::new(PropertyKind::SignatureTimeStamp, UnsignedSignature),
            LayoutEntry::new(PropertyKind::SignatureTimeStamp, UnsignedSignature),
        ]);
        check(&l).unwrap();
    }

    #[test]
    fn test_second_format_for_one_reference() {
        let l = layout(vec![
            LayoutEntry::new(PropertyKind::DataObjectFormat, SignedDataObject).with_target("r1"),
            LayoutEntry::new(PropertyKind::DataObjectFormat, SignedDataObject).with_target("r1"),
        ]);
        assert!(matches!(
            check(&l),
            Err(Error::DuplicatePropertyKind(PropertyKind::DataObjectFormat))
        ));
    }

    #[test]
    fn test_format_pointing_at_two_references() {
        let l = layout(vec![LayoutEntry::new(PropertyKind::DataObjectFormat, SignedDataObject)
            .with_target("r1")
            .with_target("r2")]);
        assert!(matches!(
            check(&l),
            Err(Error::MultiplicityExceeded {
                multiplicity: TargetMultiplicity::One,
                ..
            })
        ));
    }

    #[test]
    fn test_target_errors() {
        let unresolved = layout(vec![LayoutEntry::new(
            PropertyKind::IndividualDataObjectsTimeStamp,
            SignedDataObject,
        )
        .with_target("#nowhere")]);
        assert!(matches!(check(&unresolved), Err(Error::UnresolvedTarget(_))));

        let repeated = layout(vec![LayoutEntry::new(PropertyKind::CommitmentType, SignedDataObject)
            .with_target("r1")
            .with_target("r1")]);
        assert!(matches!(
            check(&repeated),
            Err(Error::AlreadyAttachedToTarget(PropertyKind::CommitmentType))
        ));

        let untargeted = layout(vec![LayoutEntry::new(
            PropertyKind::IndividualDataObjectsTimeStamp,
            SignedDataObject,
        )]);
        assert!(matches!(
            check(&untargeted),
            Err(Error::MissingTarget(PropertyKind::IndividualDataObjectsTimeStamp))
        ));

        let targeted_all = layout(vec![LayoutEntry::new(
            PropertyKind::AllDataObjectsCommitmentType,
            SignedDataObject,
        )
        .with_target("r1")]);
        assert!(matches!(
            check(&targeted_all),
            Err(Error::AppliesToAllDataObjects(_))
        ));
    }

    #[test]
    fn test_container_rules() {
        let misplaced = layout(vec![LayoutEntry::new(PropertyKind::SigningTime, UnsignedSignature)]);
        assert!(matches!(
            check(&misplaced),
            Err(Error::MisplacedProperty {
                kind: PropertyKind::SigningTime,
                container: "UnsignedSignatureProperties"
            })
        ));

        let twice = layout(vec![
            LayoutEntry::new(PropertyKind::CertificateValues, UnsignedSignature),
            LayoutEntry::new(PropertyKind::CertificateValues, UnsignedSignature),
        ]);
        assert!(matches!(
            check(&twice),
            Err(Error::DuplicatePropertyKind(PropertyKind::CertificateValues))
        ));

        let other = layout(vec![LayoutEntry::new(
            PropertyKind::OtherUnsignedDataObject,
            UnsignedDataObject,
        )]);
        check(&other).unwrap();
    }
}
