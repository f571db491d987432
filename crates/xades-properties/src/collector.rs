#![forbid(unsafe_code)]

//! Signature-level properties supplied by the application.

use crate::bag::PropertiesSet;
use crate::signature::{
    CounterSignature, OtherProperty, SignatureProductionPlace, SignedSignatureProperty, SignerRole,
    SigningTime, UnsignedSignatureProperty,
};
use crate::timestamp::PendingTimeStamp;
use std::rc::Rc;
use xades_core::Error;

/// Gathers the signature-level properties an application wants on a
/// signature, under the same put/add discipline as the final containers.
///
/// `SigningCertificate`, `SignaturePolicyIdentifier` and the validation
/// data of the later forms are supplied by the producer, not here.
#[derive(Debug, Default)]
pub struct SignaturePropertiesCollector {
    signed: PropertiesSet<Rc<SignedSignatureProperty>>,
    unsigned: PropertiesSet<Rc<UnsignedSignatureProperty>>,
}

impl SignaturePropertiesCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `provider` against a fresh collector.
    pub fn collect(provider: &dyn SignaturePropertiesProvider) -> Result<Self, Error> {
        let mut collector = Self::new();
        provider.provide(&mut collector)?;
        tracing::debug!(
            signed = collector.signed.len(),
            unsigned = collector.unsigned.len(),
            "signature properties collected"
        );
        Ok(collector)
    }

    pub fn set_signing_time(&mut self, p: SigningTime) -> Result<(), Error> {
        self.signed
            .put(Rc::new(SignedSignatureProperty::SigningTime(p)))
    }

    pub fn set_signature_production_place(
        &mut self,
        p: SignatureProductionPlace,
    ) -> Result<(), Error> {
        self.signed
            .put(Rc::new(SignedSignatureProperty::SignatureProductionPlace(p)))
    }

    pub fn set_signer_role(&mut self, p: SignerRole) -> Result<(), Error> {
        self.signed
            .put(Rc::new(SignedSignatureProperty::SignerRole(p)))
    }

    pub fn add_other_signed_property(&mut self, p: OtherProperty) -> Result<(), Error> {
        self.signed
            .add(Rc::new(SignedSignatureProperty::Other(p)))
    }

    pub fn add_counter_signature(&mut self, p: CounterSignature) -> Result<(), Error> {
        self.unsigned
            .add(Rc::new(UnsignedSignatureProperty::CounterSignature(p)))
    }

    pub fn add_signature_time_stamp(&mut self, pending: PendingTimeStamp) -> Result<(), Error> {
        self.unsigned
            .add(Rc::new(UnsignedSignatureProperty::signature_time_stamp(pending)))
    }

    pub fn add_other_unsigned_property(&mut self, p: OtherProperty) -> Result<(), Error> {
        self.unsigned
            .add(Rc::new(UnsignedSignatureProperty::Other(p)))
    }

    pub fn signed_properties(&self) -> &PropertiesSet<Rc<SignedSignatureProperty>> {
        &self.signed
    }

    pub fn unsigned_properties(&self) -> &PropertiesSet<Rc<UnsignedSignatureProperty>> {
        &self.unsigned
    }

    pub fn into_parts(
        self,
    ) -> (
        PropertiesSet<Rc<SignedSignatureProperty>>,
        PropertiesSet<Rc<UnsignedSignatureProperty>>,
    ) {
        (self.signed, self.unsigned)
    }
}

/// Source of application-level signature properties.
pub trait SignaturePropertiesProvider {
    fn provide(&self, collector: &mut SignaturePropertiesCollector) -> Result<(), Error>;
}

impl<F> SignaturePropertiesProvider for F
where
    F: Fn(&mut SignaturePropertiesCollector) -> Result<(), Error>,
{
    fn provide(&self, collector: &mut SignaturePropertiesCollector) -> Result<(), Error> {
        self(collector)
    }
}
