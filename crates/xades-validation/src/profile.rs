#![forbid(unsafe_code)]

//! Signing/verification profile: the providers and target form of an
//! operation, assembled explicitly by the caller.

use crate::algorithms::DefaultAlgorithmsProvider;
use crate::provider::{
    AlgorithmsProvider, CertificateValidationProvider, TimeStampTokenProvider,
    TimeStampVerificationProvider,
};
use std::sync::Arc;
use xades_core::{algorithm, Error, SignatureForm};

/// Providers and target form for XAdES operations.
///
/// A profile may be shared by concurrent operations; everything in it is
/// immutable and the providers are `Send + Sync`.
#[derive(Clone)]
pub struct XadesProfile {
    form: SignatureForm,
    algorithms: Arc<dyn AlgorithmsProvider>,
    certificate_validation: Option<Arc<dyn CertificateValidationProvider>>,
    time_stamp_tokens: Option<Arc<dyn TimeStampTokenProvider>>,
    time_stamp_verification: Option<Arc<dyn TimeStampVerificationProvider>>,
}

impl XadesProfile {
    pub fn builder(form: SignatureForm) -> XadesProfileBuilder {
        XadesProfileBuilder {
            form,
            algorithms: None,
            certificate_validation: None,
            time_stamp_tokens: None,
            time_stamp_verification: None,
        }
    }

    pub fn form(&self) -> SignatureForm {
        self.form
    }

    pub fn algorithms(&self) -> &dyn AlgorithmsProvider {
        self.algorithms.as_ref()
    }

    pub fn certificate_validation(&self) -> Result<&dyn CertificateValidationProvider, Error> {
        self.certificate_validation
            .as_deref()
            .ok_or(Error::MissingProvider("certificate validation"))
    }

    pub fn time_stamp_tokens(&self) -> Result<&dyn TimeStampTokenProvider, Error> {
        self.time_stamp_tokens
            .as_deref()
            .ok_or(Error::MissingProvider("time-stamp token"))
    }

    pub fn time_stamp_verification(&self) -> Result<&dyn TimeStampVerificationProvider, Error> {
        self.time_stamp_verification
            .as_deref()
            .ok_or(Error::MissingProvider("time-stamp verification"))
    }
}

impl std::fmt::Debug for XadesProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XadesProfile")
            .field("form", &self.form)
            .field("certificate_validation", &self.certificate_validation.is_some())
            .field("time_stamp_tokens", &self.time_stamp_tokens.is_some())
            .field("time_stamp_verification", &self.time_stamp_verification.is_some())
            .finish()
    }
}

/// Builder for [`XadesProfile`].
pub struct XadesProfileBuilder {
    form: SignatureForm,
    algorithms: Option<Arc<dyn AlgorithmsProvider>>,
    certificate_validation: Option<Arc<dyn CertificateValidationProvider>>,
    time_stamp_tokens: Option<Arc<dyn TimeStampTokenProvider>>,
    time_stamp_verification: Option<Arc<dyn TimeStampVerificationProvider>>,
}

impl XadesProfileBuilder {
    /// Replace the [`DefaultAlgorithmsProvider`].
    pub fn with_algorithms(mut self, provider: Arc<dyn AlgorithmsProvider>) -> Self {
        self.algorithms = Some(provider);
        self
    }

    pub fn with_certificate_validation(
        mut self,
        provider: Arc<dyn CertificateValidationProvider>,
    ) -> Self {
        self.certificate_validation = Some(provider);
        self
    }

    pub fn with_time_stamp_tokens(mut self, provider: Arc<dyn TimeStampTokenProvider>) -> Self {
        self.time_stamp_tokens = Some(provider);
        self
    }

    pub fn with_time_stamp_verification(
        mut self,
        provider: Arc<dyn TimeStampVerificationProvider>,
    ) -> Self {
        self.time_stamp_verification = Some(provider);
        self
    }

    /// Finish the profile, checking that the target form can be produced.
    ///
    /// Forms from T upwards need time-stamp token and verification
    /// providers; forms from C upwards also need certificate validation.
    /// Every canonicalization the algorithms provider selects must be one
    /// of the W3C canonicalization algorithms.
    pub fn build(self) -> Result<XadesProfile, Error> {
        if self.form.needs_time_stamps() {
            if self.time_stamp_tokens.is_none() {
                return Err(Error::MissingProvider("time-stamp token"));
            }
            if self.time_stamp_verification.is_none() {
                return Err(Error::MissingProvider("time-stamp verification"));
            }
        }
        if self.form.needs_validation_data() && self.certificate_validation.is_none() {
            return Err(Error::MissingProvider("certificate validation"));
        }
        let algorithms = self
            .algorithms
            .unwrap_or_else(|| Arc::new(DefaultAlgorithmsProvider));
        for (purpose, c14n) in [
            ("signature", algorithms.canonicalization_for_signature()),
            ("time-stamp", algorithms.canonicalization_for_time_stamps()),
            ("reference", algorithms.canonicalization_for_references()),
        ] {
            if !algorithm::is_canonicalization(c14n.uri()) {
                return Err(Error::UnsupportedAlgorithm(format!(
                    "{purpose} canonicalization: {}",
                    c14n.uri()
                )));
            }
        }
        let profile = XadesProfile {
            form: self.form,
            algorithms,
            certificate_validation: self.certificate_validation,
            time_stamp_tokens: self.time_stamp_tokens,
            time_stamp_verification: self.time_stamp_verification,
        };
        tracing::debug!(?profile, "XAdES profile built");
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cert::X509Certificate;
    use crate::data::{TimeStampTokenResult, ValidationData};
    use crate::algorithms::KeyAlgorithm;
    use xades_core::{Algorithm, Timestamp};

    struct FixedTsa;

    struct TrustingVerifier;

    impl TimeStampVerificationProvider for TrustingVerifier {
        fn verify_token(&self, _token: &[u8], _digest_input: &[u8]) -> Result<Timestamp, Error> {
            Ok(Timestamp::new(2024, 1, 1, 0, 0, 0).unwrap())
        }

        fn token_validation_data(
            &self,
            _token: &[u8],
            _time: &Timestamp,
        ) -> Result<ValidationData, Error> {
            ValidationData::from_certs(vec![X509Certificate::from_der(vec![0x30, 0x00])])
        }
    }

    impl TimeStampTokenProvider for FixedTsa {
        fn get_token(
            &self,
            _digest_input: &[u8],
            _digest_alg_uri: &str,
        ) -> Result<TimeStampTokenResult, Error> {
            Ok(TimeStampTokenResult::new(
                b"token".to_vec(),
                Timestamp::new(2024, 1, 1, 0, 0, 0).unwrap(),
            ))
        }
    }

    #[test]
    fn test_bes_needs_no_providers() {
        let profile = XadesProfile::builder(SignatureForm::Bes).build().unwrap();
        assert_eq!(profile.algorithms().digest_for_time_stamps(), algorithm::SHA256);
        assert!(matches!(
            profile.time_stamp_tokens(),
            Err(Error::MissingProvider("time-stamp token"))
        ));
    }

    #[test]
    fn test_t_form_requires_tsa_and_verifier() {
        assert!(matches!(
            XadesProfile::builder(SignatureForm::T).build(),
            Err(Error::MissingProvider("time-stamp token"))
        ));
        assert!(matches!(
            XadesProfile::builder(SignatureForm::T)
                .with_time_stamp_tokens(Arc::new(FixedTsa))
                .build(),
            Err(Error::MissingProvider("time-stamp verification"))
        ));
        let profile = XadesProfile::builder(SignatureForm::T)
            .with_time_stamp_tokens(Arc::new(FixedTsa))
            .with_time_stamp_verification(Arc::new(TrustingVerifier))
            .build()
            .unwrap();
        assert!(profile.time_stamp_tokens().is_ok());
        assert!(matches!(
            profile.certificate_validation(),
            Err(Error::MissingProvider("certificate validation"))
        ));
    }

    #[test]
    fn test_c_form_requires_certificate_validation() {
        assert!(matches!(
            XadesProfile::builder(SignatureForm::C)
                .with_time_stamp_tokens(Arc::new(FixedTsa))
                .with_time_stamp_verification(Arc::new(TrustingVerifier))
                .build(),
            Err(Error::MissingProvider("certificate validation"))
        ));
    }

    /// Default choices, except an XPath filter where time-stamps expect a
    /// canonicalization.
    struct XPathForTimeStamps;

    impl AlgorithmsProvider for XPathForTimeStamps {
        fn signature_algorithm(&self, key: KeyAlgorithm) -> Result<Arc<Algorithm>, Error> {
            DefaultAlgorithmsProvider.signature_algorithm(key)
        }

        fn canonicalization_for_signature(&self) -> Arc<Algorithm> {
            DefaultAlgorithmsProvider.canonicalization_for_signature()
        }

        fn canonicalization_for_time_stamps(&self) -> Arc<Algorithm> {
            Arc::new(Algorithm::new("http://www.w3.org/TR/1999/REC-xpath-19991116"))
        }

        fn canonicalization_for_references(&self) -> Arc<Algorithm> {
            Arc::new(Algorithm::new(algorithm::EXC_C14N))
        }

        fn digest_for_data_object_references(&self) -> &str {
            algorithm::SHA256
        }

        fn digest_for_reference_properties(&self) -> &str {
            algorithm::SHA256
        }

        fn digest_for_time_stamps(&self) -> &str {
            algorithm::SHA256
        }
    }

    #[test]
    fn test_rejects_non_canonicalization_choice() {
        let err = XadesProfile::builder(SignatureForm::Bes)
            .with_algorithms(Arc::new(XPathForTimeStamps))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedAlgorithm(_)));
        assert!(err.to_string().contains("time-stamp canonicalization"));
    }
}
