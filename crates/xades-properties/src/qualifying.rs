#![forbid(unsafe_code)]

//! The `QualifyingProperties` of one signature.

use crate::bag::{PropertiesList, PropertiesSet, Property, PropertyInstance};
use crate::collector::SignaturePropertiesCollector;
use crate::data_object::{SignedDataObjectProperty, UnsignedDataObjectProperty};
use crate::description::SignedDataObjects;
use crate::form;
use crate::signature::{
    SignaturePolicy, SignedSignatureProperty, SigningCertificate, UnsignedSignatureProperty,
};
use crate::timestamp::TimeStampProperty;
use std::rc::Rc;
use xades_core::{Error, PropertyKind, SignatureForm};

/// Any qualifying property, tagged with the container it belongs to.
#[derive(Debug, Clone)]
pub enum QualifyingProperty {
    SignedSignature(Rc<SignedSignatureProperty>),
    UnsignedSignature(Rc<UnsignedSignatureProperty>),
    SignedDataObject(SignedDataObjectProperty),
    UnsignedDataObject(UnsignedDataObjectProperty),
}

impl QualifyingProperty {
    /// The time-stamp carried by time-stamp kinds.
    pub fn time_stamp(&self) -> Option<&TimeStampProperty> {
        match self {
            Self::UnsignedSignature(p) => p.time_stamp(),
            Self::SignedDataObject(p) => p.time_stamp_property(),
            _ => None,
        }
    }
}

impl Property for QualifyingProperty {
    fn kind(&self) -> PropertyKind {
        match self {
            Self::SignedSignature(p) => p.kind(),
            Self::UnsignedSignature(p) => p.kind(),
            Self::SignedDataObject(p) => p.kind(),
            Self::UnsignedDataObject(p) => p.kind(),
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::SignedSignature(p) => p.name(),
            Self::UnsignedSignature(p) => p.name(),
            Self::SignedDataObject(p) => p.name(),
            Self::UnsignedDataObject(p) => p.name(),
        }
    }
}

impl PropertyInstance for QualifyingProperty {
    fn same_instance(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::SignedSignature(a), Self::SignedSignature(b)) => a.same_instance(b),
            (Self::UnsignedSignature(a), Self::UnsignedSignature(b)) => a.same_instance(b),
            (Self::SignedDataObject(a), Self::SignedDataObject(b)) => a.same_instance(b),
            (Self::UnsignedDataObject(a), Self::UnsignedDataObject(b)) => a.same_instance(b),
            _ => false,
        }
    }
}

/// `SignedProperties`: covered by the signature value.
#[derive(Debug, Clone, Default)]
pub struct SignedProperties {
    signature: PropertiesSet<Rc<SignedSignatureProperty>>,
    data_objects: PropertiesList<SignedDataObjectProperty>,
}

impl SignedProperties {
    pub fn signature_properties(&self) -> &PropertiesSet<Rc<SignedSignatureProperty>> {
        &self.signature
    }

    pub fn data_object_properties(&self) -> &PropertiesList<SignedDataObjectProperty> {
        &self.data_objects
    }
}

/// `UnsignedProperties`: appended after signing, typically by later forms.
#[derive(Debug, Clone, Default)]
pub struct UnsignedProperties {
    signature: PropertiesSet<Rc<UnsignedSignatureProperty>>,
    data_objects: PropertiesList<UnsignedDataObjectProperty>,
}

impl UnsignedProperties {
    pub fn signature_properties(&self) -> &PropertiesSet<Rc<UnsignedSignatureProperty>> {
        &self.signature
    }

    pub fn data_object_properties(&self) -> &PropertiesList<UnsignedDataObjectProperty> {
        &self.data_objects
    }
}

/// All qualifying properties of a signature.
#[derive(Debug, Clone, Default)]
pub struct QualifyingProperties {
    signed: SignedProperties,
    unsigned: UnsignedProperties,
}

impl QualifyingProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the properties of a signature being produced.
    ///
    /// `SigningCertificate` and the policy come first, then whatever the
    /// collector gathered. Data-object properties are taken from `objects`;
    /// an instance attached to several data objects appears once.
    pub fn assemble(
        collector: SignaturePropertiesCollector,
        objects: &SignedDataObjects,
        signing_certificate: SigningCertificate,
        policy: Option<SignaturePolicy>,
    ) -> Result<Self, Error> {
        objects.check_targets()?;
        let (collected_signed, collected_unsigned) = collector.into_parts();

        let mut qp = Self::new();
        qp.add_signed_signature_property(Rc::new(SignedSignatureProperty::SigningCertificate(
            signing_certificate,
        )))?;
        if let Some(policy) = policy {
            qp.add_signed_signature_property(Rc::new(SignedSignatureProperty::SignaturePolicy(
                policy,
            )))?;
        }
        for p in collected_signed.iter() {
            qp.add_signed_signature_property(p.clone())?;
        }
        qp.unsigned.signature = collected_unsigned;
        qp.signed.data_objects = objects.signed_properties();
        qp.unsigned.data_objects = objects.unsigned_properties();

        tracing::debug!(
            properties = qp.properties().len(),
            form = ?qp.form(),
            "qualifying properties assembled"
        );
        Ok(qp)
    }

    pub fn signed(&self) -> &SignedProperties {
        &self.signed
    }

    pub fn unsigned(&self) -> &UnsignedProperties {
        &self.unsigned
    }

    pub fn add_signed_signature_property(
        &mut self,
        p: Rc<SignedSignatureProperty>,
    ) -> Result<(), Error> {
        self.signed.signature.put_or_add(p)
    }

    /// Append an unsigned signature property, as later forms do.
    pub fn add_unsigned_signature_property(
        &mut self,
        p: Rc<UnsignedSignatureProperty>,
    ) -> Result<(), Error> {
        tracing::debug!(kind = %p.kind(), "adding unsigned signature property");
        self.unsigned.signature.put_or_add(p)
    }

    pub fn add_signed_data_object_property(
        &mut self,
        p: SignedDataObjectProperty,
    ) -> Result<(), Error> {
        self.signed.data_objects.push(p)
    }

    pub fn add_unsigned_data_object_property(
        &mut self,
        p: UnsignedDataObjectProperty,
    ) -> Result<(), Error> {
        self.unsigned.data_objects.push(p)
    }

    /// Every property in document order: signed before unsigned,
    /// signature-level before data-object-level.
    pub fn properties(&self) -> Vec<QualifyingProperty> {
        let signed_sig = self
            .signed
            .signature
            .iter()
            .cloned()
            .map(QualifyingProperty::SignedSignature);
        let signed_do = self
            .signed
            .data_objects
            .iter()
            .cloned()
            .map(QualifyingProperty::SignedDataObject);
        let unsigned_sig = self
            .unsigned
            .signature
            .iter()
            .cloned()
            .map(QualifyingProperty::UnsignedSignature);
        let unsigned_do = self
            .unsigned
            .data_objects
            .iter()
            .cloned()
            .map(QualifyingProperty::UnsignedDataObject);
        signed_sig
            .chain(signed_do)
            .chain(unsigned_sig)
            .chain(unsigned_do)
            .collect()
    }

    pub fn kinds(&self) -> Vec<PropertyKind> {
        self.properties().iter().map(|p| p.kind()).collect()
    }

    pub fn contains_kind(&self, kind: PropertyKind) -> bool {
        self.signed.signature.contains_kind(kind)
            || self.signed.data_objects.contains_kind(kind)
            || self.unsigned.signature.contains_kind(kind)
            || self.unsigned.data_objects.contains_kind(kind)
    }

    pub fn signing_certificate(&self) -> Option<&SigningCertificate> {
        self.signed.signature.iter().find_map(|p| match p.as_ref() {
            SignedSignatureProperty::SigningCertificate(sc) => Some(sc),
            _ => None,
        })
    }

    /// Time-stamp properties whose token has not been obtained yet.
    pub fn pending_time_stamps(&self) -> Vec<QualifyingProperty> {
        self.properties()
            .into_iter()
            .filter(|p| p.time_stamp().is_some_and(|ts| !ts.is_resolved()))
            .collect()
    }

    /// The most complete form these properties satisfy.
    pub fn form(&self) -> Option<SignatureForm> {
        form::detect(self.kinds())
    }

    pub fn check_form(&self, form: SignatureForm) -> Result<(), Error> {
        form::check(form, self.kinds())
    }
}
