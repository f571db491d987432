#![forbid(unsafe_code)]

//! DER-encoded certificates and CRLs, and the digest-based references to
//! them that `SigningCertificate`, `CompleteCertificateRefs` and
//! `CompleteRevocationRefs` carry.
//!
//! Certificates travel as DER bytes and are only parsed when a field is
//! needed, the same way the key loader hands chains around.

use der::Decode;
use xades_core::{digest, Error, Timestamp};

/// A DER-encoded X.509 certificate. Equality is byte equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct X509Certificate {
    der: Vec<u8>,
}

impl X509Certificate {
    pub fn from_der(der: Vec<u8>) -> Self {
        Self { der }
    }

    /// Decode a base64 `EncapsulatedX509Certificate` / `X509Certificate` text.
    pub fn from_base64(text: &str) -> Result<Self, Error> {
        Ok(Self::from_der(decode_base64(text)?))
    }

    pub fn der(&self) -> &[u8] {
        &self.der
    }

    pub fn parse(&self) -> Result<x509_cert::Certificate, Error> {
        x509_cert::Certificate::from_der(&self.der)
            .map_err(|e| Error::Certificate(format!("failed to parse certificate: {e}")))
    }

    /// Issuer distinguished name in RFC 4514 form.
    pub fn issuer_name(&self) -> Result<String, Error> {
        Ok(self.parse()?.tbs_certificate.issuer.to_string())
    }

    /// Subject distinguished name in RFC 4514 form.
    pub fn subject_name(&self) -> Result<String, Error> {
        Ok(self.parse()?.tbs_certificate.subject.to_string())
    }

    /// Serial number as a decimal string, as `X509SerialNumber` expects.
    pub fn serial_number(&self) -> Result<String, Error> {
        let cert = self.parse()?;
        Ok(decimal_from_be_bytes(
            cert.tbs_certificate.serial_number.as_bytes(),
        ))
    }

    /// Dotted OID of the subject public key algorithm.
    pub fn public_key_algorithm_oid(&self) -> Result<String, Error> {
        Ok(self
            .parse()?
            .tbs_certificate
            .subject_public_key_info
            .algorithm
            .oid
            .to_string())
    }
}

/// A DER-encoded X.509 certificate revocation list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct X509Crl {
    der: Vec<u8>,
}

impl X509Crl {
    pub fn from_der(der: Vec<u8>) -> Self {
        Self { der }
    }

    pub fn from_base64(text: &str) -> Result<Self, Error> {
        Ok(Self::from_der(decode_base64(text)?))
    }

    pub fn der(&self) -> &[u8] {
        &self.der
    }

    pub fn parse(&self) -> Result<x509_cert::crl::CertificateList, Error> {
        x509_cert::crl::CertificateList::from_der(&self.der)
            .map_err(|e| Error::Certificate(format!("failed to parse CRL: {e}")))
    }
}

/// Reference to a certificate: digest of its DER plus issuer and serial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertRef {
    pub digest_uri: String,
    pub digest_value: Vec<u8>,
    pub issuer_name: String,
    pub serial_number: String,
}

impl CertRef {
    pub fn from_certificate(cert: &X509Certificate, digest_uri: &str) -> Result<Self, Error> {
        let parsed = cert.parse()?;
        Ok(Self {
            digest_uri: digest_uri.to_owned(),
            digest_value: digest::digest(digest_uri, cert.der())?,
            issuer_name: parsed.tbs_certificate.issuer.to_string(),
            serial_number: decimal_from_be_bytes(parsed.tbs_certificate.serial_number.as_bytes()),
        })
    }

    /// Does `cert` hash to this reference's digest value?
    ///
    /// Issuer and serial are informative; the digest is what binds.
    pub fn matches(&self, cert: &X509Certificate) -> Result<bool, Error> {
        Ok(digest::digest(&self.digest_uri, cert.der())? == self.digest_value)
    }
}

/// Reference to a CRL: digest of its DER plus issuer and issue time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrlRef {
    pub digest_uri: String,
    pub digest_value: Vec<u8>,
    pub issuer_name: String,
    pub issue_time: Timestamp,
}

impl CrlRef {
    pub fn from_crl(crl: &X509Crl, digest_uri: &str) -> Result<Self, Error> {
        let parsed = crl.parse()?;
        Ok(Self {
            digest_uri: digest_uri.to_owned(),
            digest_value: digest::digest(digest_uri, crl.der())?,
            issuer_name: parsed.tbs_cert_list.issuer.to_string(),
            issue_time: parsed.tbs_cert_list.this_update.to_date_time(),
        })
    }

    pub fn matches(&self, crl: &X509Crl) -> Result<bool, Error> {
        Ok(digest::digest(&self.digest_uri, crl.der())? == self.digest_value)
    }
}

fn decode_base64(text: &str) -> Result<Vec<u8>, Error> {
    use base64::Engine;
    let engine = base64::engine::general_purpose::STANDARD;
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    engine
        .decode(&cleaned)
        .map_err(|e| Error::Base64(format!("decode error: {e}")))
}

/// Render an unsigned big-endian integer in base 10.
fn decimal_from_be_bytes(bytes: &[u8]) -> String {
    // Little-endian base-10 digits.
    let mut digits: Vec<u8> = vec![0];
    for &byte in bytes {
        let mut carry = u32::from(byte);
        for d in digits.iter_mut() {
            let v = u32::from(*d) * 256 + carry;
            *d = (v % 10) as u8;
            carry = v / 10;
        }
        while carry > 0 {
            digits.push((carry % 10) as u8);
            carry /= 10;
        }
    }
    digits.iter().rev().map(|d| char::from(b'0' + d)).collect()
}
