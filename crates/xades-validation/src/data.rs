#![forbid(unsafe_code)]

//! Certificate-chain and revocation data, and the results handed back by
//! time-stamp providers.

use crate::cert::{X509Certificate, X509Crl};
use xades_core::{Error, Timestamp};

/// A validated certification path plus the CRLs used to validate it.
///
/// `certs` runs from the leaf to the trust anchor and is never empty.
/// CRLs form a set: duplicates are dropped, first occurrence wins.
/// No chain linkage is checked here; that is the path validator's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationData {
    certs: Vec<X509Certificate>,
    crls: Vec<X509Crl>,
}

impl ValidationData {
    pub fn new(
        certs: Vec<X509Certificate>,
        crls: impl IntoIterator<Item = X509Crl>,
    ) -> Result<Self, Error> {
        if certs.is_empty() {
            return Err(Error::EmptyCertificateChain);
        }
        let mut unique: Vec<X509Crl> = Vec::new();
        for crl in crls {
            if !unique.contains(&crl) {
                unique.push(crl);
            }
        }
        Ok(Self {
            certs,
            crls: unique,
        })
    }

    /// Validation data without revocation information.
    pub fn from_certs(certs: Vec<X509Certificate>) -> Result<Self, Error> {
        Self::new(certs, Vec::new())
    }

    pub fn certs(&self) -> &[X509Certificate] {
        &self.certs
    }

    pub fn crls(&self) -> &[X509Crl] {
        &self.crls
    }

    pub fn leaf(&self) -> &X509Certificate {
        &self.certs[0]
    }

    pub fn trust_anchor(&self) -> &X509Certificate {
        &self.certs[self.certs.len() - 1]
    }
}

/// Outcome of verifying a time-stamp token: when it was issued and the
/// validated path of the issuing TSA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeStampVerificationData {
    validation_data: ValidationData,
    timestamp_time: Timestamp,
}

impl TimeStampVerificationData {
    pub fn new(validation_data: ValidationData, timestamp_time: Timestamp) -> Self {
        Self {
            validation_data,
            timestamp_time,
        }
    }

    /// Build from values that may not have been obtained; both are mandatory.
    pub fn from_parts(
        validation_data: Option<ValidationData>,
        timestamp_time: Option<Timestamp>,
    ) -> Result<Self, Error> {
        let validation_data =
            validation_data.ok_or(Error::IncompleteTimeStampData("validation data"))?;
        let timestamp_time = timestamp_time.ok_or(Error::IncompleteTimeStampData("time"))?;
        Ok(Self::new(validation_data, timestamp_time))
    }

    pub fn validation_data(&self) -> &ValidationData {
        &self.validation_data
    }

    pub fn timestamp_time(&self) -> Timestamp {
        self.timestamp_time
    }

    pub fn into_parts(self) -> (ValidationData, Timestamp) {
        (self.validation_data, self.timestamp_time)
    }
}

/// A freshly issued time-stamp token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeStampTokenResult {
    pub encoded_token: Vec<u8>,
    pub generation_time: Timestamp,
}

impl TimeStampTokenResult {
    pub fn new(encoded_token: Vec<u8>, generation_time: Timestamp) -> Self {
        Self {
            encoded_token,
            generation_time,
        }
    }
}
