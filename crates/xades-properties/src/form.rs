#![forbid(unsafe_code)]

//! Signature-form detection and checking over a set of property kinds.

use std::collections::HashSet;
use xades_core::{Error, PropertyKind, SignatureForm};

/// The most complete form whose mandatory properties are all present.
///
/// Forms are tried from A down to BES. A signature satisfying both EPES
/// and T is reported as T.
pub fn detect(kinds: impl IntoIterator<Item = PropertyKind>) -> Option<SignatureForm> {
    let present: HashSet<PropertyKind> = kinds.into_iter().collect();
    SignatureForm::VALUES
        .iter()
        .rev()
        .copied()
        .find(|form| form.required_kinds().iter().all(|k| present.contains(k)))
}

/// Fail on the first property `form` requires that is absent, walking the
/// form's lineage from BES upwards.
pub fn check(
    form: SignatureForm,
    kinds: impl IntoIterator<Item = PropertyKind>,
) -> Result<(), Error> {
    let present: HashSet<PropertyKind> = kinds.into_iter().collect();
    match form.required_kinds().into_iter().find(|k| !present.contains(k)) {
        Some(missing) => Err(Error::FormRequirement {
            form: form.name(),
            missing,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PropertyKind::*;

    #[test]
    fn test_detect_picks_the_most_complete_form() {
        assert_eq!(detect([SigningTime]), None);
        assert_eq!(detect([SigningCertificate, SigningTime]), Some(SignatureForm::Bes));
        assert_eq!(
            detect([SigningCertificate, SignaturePolicy]),
            Some(SignatureForm::Epes)
        );
        assert_eq!(
            detect([SigningCertificate, SignaturePolicy, SignatureTimeStamp]),
            Some(SignatureForm::T)
        );
        assert_eq!(
            detect([
                SigningCertificate,
                SignatureTimeStamp,
                CompleteCertificateRefs,
                CompleteRevocationRefs,
                SigAndRefsTimeStamp,
                CertificateValues,
                RevocationValues,
            ]),
            Some(SignatureForm::Xl)
        );
    }

    #[test]
    fn test_check_reports_first_gap() {
        let err = check(SignatureForm::C, [SigningCertificate, CompleteRevocationRefs]).unwrap_err();
        assert!(matches!(
            err,
            Error::FormRequirement {
                form: "C",
                missing: SignatureTimeStamp
            }
        ));
        check(SignatureForm::Bes, [SigningCertificate]).unwrap();
        assert!(check(SignatureForm::Epes, [SigningCertificate]).is_err());
    }
}
