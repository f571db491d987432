#![forbid(unsafe_code)]

//! Data-object-level properties and their target bookkeeping.
//!
//! Each instance is created through [`DataObjectProperty`] and handed around
//! as an `Rc`, because one instance (an `IndividualDataObjectsTimeStamp`
//! say) may cover several data objects. The instance records which data
//! objects it targets and refuses targets its multiplicity does not allow.

use crate::bag::{Property, PropertyInstance};
use crate::timestamp::{PendingTimeStamp, TimeStampProperty};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use xades_core::{Error, PropertyKind, TargetMultiplicity};

static NEXT_DATA_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a [`DataObjectDescription`](crate::DataObjectDescription).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DataObjectId(u64);

impl DataObjectId {
    pub(crate) fn next() -> Self {
        Self(NEXT_DATA_OBJECT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Process-wide allocation number.
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for DataObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a property instance stands with respect to its targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachState {
    Unattached,
    PartiallyAttached,
    /// No more targets accepted. Only `ONE` ever gets here.
    FullyAttached,
}

/// Targets of one data-object property instance.
#[derive(Debug)]
pub struct TargetSet {
    kind: PropertyKind,
    multiplicity: TargetMultiplicity,
    targets: RefCell<Vec<DataObjectId>>,
}

impl TargetSet {
    pub(crate) fn new(kind: PropertyKind, multiplicity: TargetMultiplicity) -> Self {
        Self {
            kind,
            multiplicity,
            targets: RefCell::new(Vec::new()),
        }
    }

    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    pub fn multiplicity(&self) -> TargetMultiplicity {
        self.multiplicity
    }

    /// Targets in attach order.
    pub fn targets(&self) -> Vec<DataObjectId> {
        self.targets.borrow().clone()
    }

    pub fn is_attached_to(&self, target: DataObjectId) -> bool {
        self.targets.borrow().contains(&target)
    }

    pub fn state(&self) -> AttachState {
        let n = self.targets.borrow().len();
        if n == 0 {
            AttachState::Unattached
        } else if self.multiplicity.cap() == Some(n) {
            AttachState::FullyAttached
        } else {
            AttachState::PartiallyAttached
        }
    }

    /// Record `target`. On failure the target set is unchanged.
    ///
    /// `ALL` properties never accept an explicit target.
    pub fn attach(&self, target: DataObjectId) -> Result<(), Error> {
        if self.multiplicity == TargetMultiplicity::All {
            return Err(Error::AppliesToAllDataObjects(self.kind));
        }
        let mut targets = self.targets.borrow_mut();
        if targets.contains(&target) {
            return Err(Error::AlreadyAttachedToTarget(self.kind));
        }
        if self.multiplicity.cap() == Some(targets.len()) {
            return Err(Error::MultiplicityExceeded {
                kind: self.kind,
                multiplicity: self.multiplicity,
            });
        }
        targets.push(target);
        Ok(())
    }
}

/// Payload types that can live in a [`DataObjectProperty`].
pub trait DataObjectPayload {
    fn kind(&self) -> PropertyKind;

    fn multiplicity(&self) -> TargetMultiplicity {
        self.kind()
            .target_multiplicity()
            .unwrap_or(TargetMultiplicity::N)
    }
}

/// A data-object property instance: payload plus target set.
#[derive(Debug)]
pub struct DataObjectProperty<P> {
    payload: P,
    targets: TargetSet,
}

impl<P: DataObjectPayload> DataObjectProperty<P> {
    pub fn new(payload: P) -> Rc<Self> {
        let targets = TargetSet::new(payload.kind(), payload.multiplicity());
        Rc::new(Self { payload, targets })
    }
}

impl DataObjectProperty<TimeStampProperty> {
    pub fn individual_time_stamp(pending: PendingTimeStamp) -> Rc<Self> {
        Self::new(TimeStampProperty::new(
            PropertyKind::IndividualDataObjectsTimeStamp,
            pending,
        ))
    }

    pub fn all_data_objects_time_stamp(pending: PendingTimeStamp) -> Rc<Self> {
        Self::new(TimeStampProperty::new(
            PropertyKind::AllDataObjectsTimeStamp,
            pending,
        ))
    }
}

impl<P> DataObjectProperty<P> {
    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn target_set(&self) -> &TargetSet {
        &self.targets
    }

    pub fn kind(&self) -> PropertyKind {
        self.targets.kind
    }

    pub fn multiplicity(&self) -> TargetMultiplicity {
        self.targets.multiplicity
    }

    pub fn targets(&self) -> Vec<DataObjectId> {
        self.targets.targets()
    }

    pub fn state(&self) -> AttachState {
        self.targets.state()
    }

    pub fn attach(&self, target: DataObjectId) -> Result<(), Error> {
        self.targets.attach(target)
    }
}

impl DataObjectPayload for TimeStampProperty {
    fn kind(&self) -> PropertyKind {
        TimeStampProperty::kind(self)
    }
}

/// `DataObjectFormat`: how to present one signed data object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataObjectFormat {
    pub mime_type: Option<String>,
    pub encoding: Option<String>,
    pub description: Option<String>,
    pub object_identifier: Option<String>,
}

impl DataObjectFormat {
    pub fn new(mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: Some(mime_type.into()),
            ..Self::default()
        }
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl DataObjectPayload for DataObjectFormat {
    fn kind(&self) -> PropertyKind {
        PropertyKind::DataObjectFormat
    }
}

/// A commitment the signer makes over some of the data objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitmentType {
    pub uri: String,
    pub description: Option<String>,
    /// Serialized `CommitmentTypeQualifier` contents.
    pub qualifiers: Vec<String>,
}

impl CommitmentType {
    pub const PROOF_OF_ORIGIN: &'static str = "http://uri.etsi.org/01903/v1.2.2#ProofOfOrigin";
    pub const PROOF_OF_RECEIPT: &'static str = "http://uri.etsi.org/01903/v1.2.2#ProofOfReceipt";
    pub const PROOF_OF_DELIVERY: &'static str = "http://uri.etsi.org/01903/v1.2.2#ProofOfDelivery";
    pub const PROOF_OF_SENDER: &'static str = "http://uri.etsi.org/01903/v1.2.2#ProofOfSender";
    pub const PROOF_OF_APPROVAL: &'static str = "http://uri.etsi.org/01903/v1.2.2#ProofOfApproval";
    pub const PROOF_OF_CREATION: &'static str = "http://uri.etsi.org/01903/v1.2.2#ProofOfCreation";

    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            description: None,
            qualifiers: Vec::new(),
        }
    }

    pub fn proof_of_origin() -> Self {
        Self::new(Self::PROOF_OF_ORIGIN)
    }

    pub fn proof_of_approval() -> Self {
        Self::new(Self::PROOF_OF_APPROVAL)
    }

    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifiers.push(qualifier.into());
        self
    }
}

impl DataObjectPayload for CommitmentType {
    fn kind(&self) -> PropertyKind {
        PropertyKind::CommitmentType
    }
}

/// A commitment covering every signed data object (`AllSignedDataObjects`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllDataObjectsCommitmentType(pub CommitmentType);

impl DataObjectPayload for AllDataObjectsCommitmentType {
    fn kind(&self) -> PropertyKind {
        PropertyKind::AllDataObjectsCommitmentType
    }
}

/// A data-object property this engine does not model. Unlike the known
/// kinds, it chooses its own target multiplicity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherDataObjectProperty {
    pub element_name: String,
    pub xml: String,
    signed: bool,
    multiplicity: TargetMultiplicity,
}

impl OtherDataObjectProperty {
    pub fn signed(element_name: impl Into<String>, xml: impl Into<String>) -> Self {
        Self {
            element_name: element_name.into(),
            xml: xml.into(),
            signed: true,
            multiplicity: TargetMultiplicity::N,
        }
    }

    pub fn unsigned(element_name: impl Into<String>, xml: impl Into<String>) -> Self {
        Self {
            signed: false,
            ..Self::signed(element_name, xml)
        }
    }

    pub fn with_multiplicity(mut self, multiplicity: TargetMultiplicity) -> Self {
        self.multiplicity = multiplicity;
        self
    }
}

impl DataObjectPayload for OtherDataObjectProperty {
    fn kind(&self) -> PropertyKind {
        if self.signed {
            PropertyKind::OtherSignedDataObject
        } else {
            PropertyKind::OtherUnsignedDataObject
        }
    }

    fn multiplicity(&self) -> TargetMultiplicity {
        self.multiplicity
    }
}

/// `SignedDataObjectProperties` members.
#[derive(Debug, Clone)]
pub enum SignedDataObjectProperty {
    DataObjectFormat(Rc<DataObjectProperty<DataObjectFormat>>),
    CommitmentType(Rc<DataObjectProperty<CommitmentType>>),
    AllDataObjectsCommitmentType(Rc<DataObjectProperty<AllDataObjectsCommitmentType>>),
    IndividualDataObjectsTimeStamp(Rc<DataObjectProperty<TimeStampProperty>>),
    AllDataObjectsTimeStamp(Rc<DataObjectProperty<TimeStampProperty>>),
    Other(Rc<DataObjectProperty<OtherDataObjectProperty>>),
}

impl SignedDataObjectProperty {
    /// Wrap a time-stamp handle under the variant its kind names.
    pub fn time_stamp(ts: Rc<DataObjectProperty<TimeStampProperty>>) -> Self {
        if ts.kind() == PropertyKind::AllDataObjectsTimeStamp {
            Self::AllDataObjectsTimeStamp(ts)
        } else {
            Self::IndividualDataObjectsTimeStamp(ts)
        }
    }

    pub fn target_set(&self) -> &TargetSet {
        match self {
            Self::DataObjectFormat(p) => p.target_set(),
            Self::CommitmentType(p) => p.target_set(),
            Self::AllDataObjectsCommitmentType(p) => p.target_set(),
            Self::IndividualDataObjectsTimeStamp(p) | Self::AllDataObjectsTimeStamp(p) => {
                p.target_set()
            }
            Self::Other(p) => p.target_set(),
        }
    }

    pub fn time_stamp_property(&self) -> Option<&TimeStampProperty> {
        match self {
            Self::IndividualDataObjectsTimeStamp(p) | Self::AllDataObjectsTimeStamp(p) => {
                Some(p.payload())
            }
            _ => None,
        }
    }
}

impl Property for SignedDataObjectProperty {
    fn kind(&self) -> PropertyKind {
        self.target_set().kind()
    }

    fn name(&self) -> &str {
        match self {
            Self::Other(p) => &p.payload().element_name,
            _ => self.kind().name(),
        }
    }
}

impl PropertyInstance for SignedDataObjectProperty {
    fn same_instance(&self, other: &Self) -> bool {
        std::ptr::eq(self.target_set(), other.target_set())
    }
}

/// `UnsignedDataObjectProperties` members.
#[derive(Debug, Clone)]
pub enum UnsignedDataObjectProperty {
    Other(Rc<DataObjectProperty<OtherDataObjectProperty>>),
}

impl UnsignedDataObjectProperty {
    pub fn target_set(&self) -> &TargetSet {
        match self {
            Self::Other(p) => p.target_set(),
        }
    }
}

impl Property for UnsignedDataObjectProperty {
    fn kind(&self) -> PropertyKind {
        self.target_set().kind()
    }

    fn name(&self) -> &str {
        match self {
            Self::Other(p) => &p.payload().element_name,
        }
    }
}

impl PropertyInstance for UnsignedDataObjectProperty {
    fn same_instance(&self, other: &Self) -> bool {
        std::ptr::eq(self.target_set(), other.target_set())
    }
}
