#![forbid(unsafe_code)]

//! Signed data objects and the properties declared on them.

use crate::bag::{PropertiesList, PropertiesSet, PropertyInstance};
use crate::data_object::{
    AllDataObjectsCommitmentType, CommitmentType, DataObjectFormat, DataObjectId,
    DataObjectProperty, OtherDataObjectProperty, SignedDataObjectProperty, TargetSet,
    UnsignedDataObjectProperty,
};
use crate::timestamp::TimeStampProperty;
use std::rc::Rc;
use std::sync::Arc;
use xades_core::{Algorithm, Error, PropertyKind, TargetMultiplicity};

const ALL_SIGNED_DATA_OBJECTS: &str = "all signed data objects";

trait Targeted {
    fn targets(&self) -> &TargetSet;
}

impl Targeted for SignedDataObjectProperty {
    fn targets(&self) -> &TargetSet {
        self.target_set()
    }
}

impl Targeted for UnsignedDataObjectProperty {
    fn targets(&self) -> &TargetSet {
        self.target_set()
    }
}

/// Insert into `bag`, then attach to `target`; undo the insert if the
/// property refuses the target.
fn insert_and_attach<T: PropertyInstance + Targeted>(
    bag: &mut PropertiesSet<T>,
    prop: T,
    target: DataObjectId,
) -> Result<(), Error> {
    bag.put_or_add(prop.clone())?;
    if let Err(err) = prop.targets().attach(target) {
        bag.remove(&prop)?;
        tracing::warn!(kind = %prop.kind(), error = %err, "data-object property rejected");
        return Err(err);
    }
    Ok(())
}

/// One signed reference: where the data is, how it is transformed, and the
/// data-object properties that apply to it.
#[derive(Debug)]
pub struct DataObjectDescription {
    id: DataObjectId,
    reference_id: String,
    uri: String,
    reference_type: Option<String>,
    transforms: Vec<Arc<Algorithm>>,
    signed: PropertiesSet<SignedDataObjectProperty>,
    unsigned: PropertiesSet<UnsignedDataObjectProperty>,
}

impl DataObjectDescription {
    /// Describe the data at `uri`, signed under a generated reference Id.
    pub fn new(uri: impl Into<String>) -> Self {
        let id = DataObjectId::next();
        Self::build(id, format!("xades-ref-{}", id.sequence()), uri.into())
    }

    /// Describe the data at `uri`, signed under the given reference Id.
    pub fn with_id(reference_id: impl Into<String>, uri: impl Into<String>) -> Self {
        Self::build(DataObjectId::next(), reference_id.into(), uri.into())
    }

    fn build(id: DataObjectId, reference_id: String, uri: String) -> Self {
        Self {
            id,
            reference_id,
            uri,
            reference_type: None,
            transforms: Vec::new(),
            signed: PropertiesSet::new(),
            unsigned: PropertiesSet::new(),
        }
    }

    pub fn id(&self) -> DataObjectId {
        self.id
    }

    /// `Id` of the `ds:Reference`, used by `ObjectReference="#..."`.
    pub fn reference_id(&self) -> &str {
        &self.reference_id
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn reference_type(&self) -> Option<&str> {
        self.reference_type.as_deref()
    }

    /// Set the `Type` attribute of the reference.
    pub fn with_type(&mut self, reference_type: impl Into<String>) -> &mut Self {
        self.reference_type = Some(reference_type.into());
        self
    }

    /// Append a transform. Each transform instance may appear once; an
    /// equal algorithm held in a different `Arc` is a different transform.
    pub fn with_transform(&mut self, transform: Arc<Algorithm>) -> Result<&mut Self, Error> {
        if self.transforms.iter().any(|t| Arc::ptr_eq(t, &transform)) {
            return Err(Error::DuplicateTransform(transform.uri().to_owned()));
        }
        self.transforms.push(transform);
        Ok(self)
    }

    pub fn transforms(&self) -> &[Arc<Algorithm>] {
        &self.transforms
    }

    pub fn with_data_object_format(
        &mut self,
        prop: &Rc<DataObjectProperty<DataObjectFormat>>,
    ) -> Result<&mut Self, Error> {
        let prop = SignedDataObjectProperty::DataObjectFormat(prop.clone());
        insert_and_attach(&mut self.signed, prop, self.id)?;
        Ok(self)
    }

    pub fn with_commitment_type(
        &mut self,
        prop: &Rc<DataObjectProperty<CommitmentType>>,
    ) -> Result<&mut Self, Error> {
        let prop = SignedDataObjectProperty::CommitmentType(prop.clone());
        insert_and_attach(&mut self.signed, prop, self.id)?;
        Ok(self)
    }

    /// Attach an `IndividualDataObjectsTimeStamp`. The same instance may be
    /// attached to several descriptions to time-stamp them together.
    pub fn with_data_object_timestamp(
        &mut self,
        prop: &Rc<DataObjectProperty<TimeStampProperty>>,
    ) -> Result<&mut Self, Error> {
        let prop = SignedDataObjectProperty::time_stamp(prop.clone());
        insert_and_attach(&mut self.signed, prop, self.id)?;
        Ok(self)
    }

    /// Attach an unmodelled property, signed or unsigned as it was created.
    pub fn with_other_property(
        &mut self,
        prop: &Rc<DataObjectProperty<OtherDataObjectProperty>>,
    ) -> Result<&mut Self, Error> {
        if prop.kind() == PropertyKind::OtherSignedDataObject {
            let prop = SignedDataObjectProperty::Other(prop.clone());
            insert_and_attach(&mut self.signed, prop, self.id)?;
        } else {
            let prop = UnsignedDataObjectProperty::Other(prop.clone());
            insert_and_attach(&mut self.unsigned, prop, self.id)?;
        }
        Ok(self)
    }

    pub fn signed_properties(&self) -> &PropertiesSet<SignedDataObjectProperty> {
        &self.signed
    }

    pub fn unsigned_properties(&self) -> &PropertiesSet<UnsignedDataObjectProperty> {
        &self.unsigned
    }
}

/// The data objects a signature covers, in reference order, plus the
/// properties that apply to all of them.
#[derive(Debug, Default)]
pub struct SignedDataObjects {
    objects: Vec<DataObjectDescription>,
    all_signed: PropertiesSet<SignedDataObjectProperty>,
    all_unsigned: PropertiesSet<UnsignedDataObjectProperty>,
}

impl SignedDataObjects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_signed_data_object(
        &mut self,
        object: DataObjectDescription,
    ) -> Result<&mut Self, Error> {
        if self.by_reference_id(object.reference_id()).is_some() {
            return Err(Error::DuplicateDataObject(object.reference_id));
        }
        tracing::debug!(
            reference_id = %object.reference_id,
            uri = %object.uri,
            "signed data object added"
        );
        self.objects.push(object);
        Ok(self)
    }

    pub fn with_commitment_type_for_all(
        &mut self,
        prop: &Rc<DataObjectProperty<AllDataObjectsCommitmentType>>,
    ) -> Result<&mut Self, Error> {
        self.all_signed
            .put_or_add(SignedDataObjectProperty::AllDataObjectsCommitmentType(
                prop.clone(),
            ))?;
        Ok(self)
    }

    /// Record an `AllDataObjectsTimeStamp`.
    pub fn with_data_objects_time_stamp(
        &mut self,
        prop: &Rc<DataObjectProperty<TimeStampProperty>>,
    ) -> Result<&mut Self, Error> {
        if prop.kind() != PropertyKind::AllDataObjectsTimeStamp {
            return Err(Error::MisplacedProperty {
                kind: prop.kind(),
                container: ALL_SIGNED_DATA_OBJECTS,
            });
        }
        self.all_signed
            .put_or_add(SignedDataObjectProperty::time_stamp(prop.clone()))?;
        Ok(self)
    }

    /// Record an unmodelled property created with `ALL` multiplicity.
    pub fn with_other_property_for_all(
        &mut self,
        prop: &Rc<DataObjectProperty<OtherDataObjectProperty>>,
    ) -> Result<&mut Self, Error> {
        if prop.multiplicity() != TargetMultiplicity::All {
            return Err(Error::MisplacedProperty {
                kind: prop.kind(),
                container: ALL_SIGNED_DATA_OBJECTS,
            });
        }
        if prop.kind() == PropertyKind::OtherSignedDataObject {
            self.all_signed
                .put_or_add(SignedDataObjectProperty::Other(prop.clone()))?;
        } else {
            self.all_unsigned
                .put_or_add(UnsignedDataObjectProperty::Other(prop.clone()))?;
        }
        Ok(self)
    }

    pub fn data_objects(&self) -> &[DataObjectDescription] {
        &self.objects
    }

    pub fn get(&self, id: DataObjectId) -> Option<&DataObjectDescription> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Mutable access, for properties shared by descriptions already added.
    pub fn get_mut(&mut self, id: DataObjectId) -> Option<&mut DataObjectDescription> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn by_reference_id(&self, reference_id: &str) -> Option<&DataObjectDescription> {
        self.objects.iter().find(|o| o.reference_id == reference_id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn all_data_objects_properties(&self) -> &PropertiesSet<SignedDataObjectProperty> {
        &self.all_signed
    }

    /// Every signed data-object property, each instance once: per data
    /// object in reference order, then the `ALL` properties.
    pub fn signed_properties(&self) -> PropertiesList<SignedDataObjectProperty> {
        self.objects
            .iter()
            .flat_map(|o| o.signed.iter().cloned())
            .chain(self.all_signed.iter().cloned())
            .collect()
    }

    pub fn unsigned_properties(&self) -> PropertiesList<UnsignedDataObjectProperty> {
        self.objects
            .iter()
            .flat_map(|o| o.unsigned.iter().cloned())
            .chain(self.all_unsigned.iter().cloned())
            .collect()
    }

    /// Descriptions targeted by `targets`, in target order.
    pub fn resolve_targets(&self, targets: &TargetSet) -> Result<Vec<&DataObjectDescription>, Error> {
        targets
            .targets()
            .into_iter()
            .map(|id| {
                self.get(id).ok_or_else(|| {
                    Error::UnresolvedTarget(format!(
                        "{} targets data object {id} which is not signed",
                        targets.kind()
                    ))
                })
            })
            .collect()
    }

    /// Check that every attached property targets data objects of this
    /// signature only.
    pub fn check_targets(&self) -> Result<(), Error> {
        for prop in self.signed_properties().iter() {
            self.resolve_targets(prop.target_set())?;
        }
        for prop in self.unsigned_properties().iter() {
            self.resolve_targets(prop.target_set())?;
        }
        Ok(())
    }
}
