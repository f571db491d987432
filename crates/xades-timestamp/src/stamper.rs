#![forbid(unsafe_code)]

//! Time-stamp production and verification over the profile's providers.

use crate::digest_input::TimeStampDigestInput;
use crate::engine::XmlSignatureEngine;
use xades_core::{Error, Timestamp};
use xades_properties::{PendingTimeStamp, TimeStampProperty};
use xades_validation::{TimeStampVerificationData, XadesProfile};

/// Obtains or checks the token of a time-stamp property and resolves it.
#[derive(Debug, Clone, Copy)]
pub struct TimeStamper<'p> {
    profile: &'p XadesProfile,
}

impl<'p> TimeStamper<'p> {
    pub fn new(profile: &'p XadesProfile) -> Self {
        Self { profile }
    }

    /// A new time-stamp declaration using the profile's canonicalization.
    pub fn pending(&self) -> PendingTimeStamp {
        PendingTimeStamp::new(self.profile.algorithms().canonicalization_for_time_stamps())
    }

    /// Request a token over `input` and resolve `property` with it.
    ///
    /// The fresh token is verified like any other before it is accepted.
    pub fn stamp<E: XmlSignatureEngine>(
        &self,
        property: &TimeStampProperty,
        input: &TimeStampDigestInput<'_, E>,
    ) -> Result<Timestamp, Error> {
        if property.is_resolved() {
            return Err(Error::TimeStampAlreadyResolved(property.kind()));
        }
        let tsa = self.profile.time_stamp_tokens()?;
        let digest_uri = self.profile.algorithms().digest_for_time_stamps();
        let token = tsa.get_token(input.get_bytes(), digest_uri)?;
        tracing::info!(
            kind = %property.kind(),
            generation_time = ?token.generation_time,
            "time-stamp token obtained"
        );
        self.resolve(property, token.encoded_token, input.get_bytes())
    }

    /// Check `encoded_token`, found in a signature, against the recomputed
    /// `input` and resolve `property` with it.
    pub fn verify<E: XmlSignatureEngine>(
        &self,
        property: &TimeStampProperty,
        encoded_token: Vec<u8>,
        input: &TimeStampDigestInput<'_, E>,
    ) -> Result<Timestamp, Error> {
        if property.is_resolved() {
            return Err(Error::TimeStampAlreadyResolved(property.kind()));
        }
        self.resolve(property, encoded_token, input.get_bytes())
    }

    fn resolve(
        &self,
        property: &TimeStampProperty,
        encoded_token: Vec<u8>,
        digest_input: &[u8],
    ) -> Result<Timestamp, Error> {
        let verifier = self.profile.time_stamp_verification()?;
        let time = verifier.verify_token(&encoded_token, digest_input)?;
        let validation_data = verifier.token_validation_data(&encoded_token, &time)?;
        property.resolve(
            encoded_token,
            TimeStampVerificationData::new(validation_data, time),
        )?;
        tracing::debug!(kind = %property.kind(), time = ?time, "time-stamp verified");
        Ok(time)
    }
}
