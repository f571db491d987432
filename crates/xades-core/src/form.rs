#![forbid(unsafe_code)]

//! XAdES signature forms and the properties each one makes mandatory.

use crate::kind::PropertyKind;
use std::fmt;

/// Signature forms, ordered from the least to the most complete.
///
/// EPES is a sibling of BES rather than a prerequisite of T: a T form may
/// be built on either of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SignatureForm {
    Bes,
    Epes,
    T,
    C,
    X,
    Xl,
    A,
}

impl SignatureForm {
    pub const VALUES: [SignatureForm; 7] = [
        Self::Bes,
        Self::Epes,
        Self::T,
        Self::C,
        Self::X,
        Self::Xl,
        Self::A,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Bes => "BES",
            Self::Epes => "EPES",
            Self::T => "T",
            Self::C => "C",
            Self::X => "X",
            Self::Xl => "XL",
            Self::A => "A",
        }
    }

    pub fn from_name(name: &str) -> Option<SignatureForm> {
        Self::VALUES
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(name))
    }

    /// Properties this form adds on top of the form it extends.
    pub fn own_requirements(&self) -> &'static [PropertyKind] {
        match self {
            Self::Bes => &[PropertyKind::SigningCertificate],
            Self::Epes => &[PropertyKind::SignaturePolicy],
            Self::T => &[PropertyKind::SignatureTimeStamp],
            Self::C => &[
                PropertyKind::CompleteCertificateRefs,
                PropertyKind::CompleteRevocationRefs,
            ],
            Self::X => &[PropertyKind::SigAndRefsTimeStamp],
            Self::Xl => &[PropertyKind::CertificateValues, PropertyKind::RevocationValues],
            Self::A => &[PropertyKind::ArchiveTimeStamp],
        }
    }

    /// The forms this one is layered on, itself included, from BES upwards.
    pub fn lineage(&self) -> &'static [SignatureForm] {
        use SignatureForm::*;
        match self {
            Bes => &[Bes],
            Epes => &[Bes, Epes],
            T => &[Bes, T],
            C => &[Bes, T, C],
            X => &[Bes, T, C, X],
            Xl => &[Bes, T, C, X, Xl],
            A => &[Bes, T, C, X, Xl, A],
        }
    }

    /// Every property a signature of this form must carry.
    pub fn required_kinds(&self) -> Vec<PropertyKind> {
        self.lineage()
            .iter()
            .flat_map(|f| f.own_requirements().iter().copied())
            .collect()
    }

    /// Whether producing this form needs a time-stamp authority.
    pub fn needs_time_stamps(&self) -> bool {
        *self >= Self::T
    }

    /// Whether producing this form needs certificate path validation.
    pub fn needs_validation_data(&self) -> bool {
        *self >= Self::C
    }
}

impl fmt::Display for SignatureForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirements_accumulate() {
        assert_eq!(
            SignatureForm::X.required_kinds(),
            vec![
                PropertyKind::SigningCertificate,
                PropertyKind::SignatureTimeStamp,
                PropertyKind::CompleteCertificateRefs,
                PropertyKind::CompleteRevocationRefs,
                PropertyKind::SigAndRefsTimeStamp,
            ]
        );
        assert!(!SignatureForm::T
            .required_kinds()
            .contains(&PropertyKind::SignaturePolicy));
    }

    #[test]
    fn test_names_parse_case_insensitively() {
        assert_eq!(SignatureForm::from_name("xl"), Some(SignatureForm::Xl));
        assert_eq!(SignatureForm::from_name("EPES"), Some(SignatureForm::Epes));
        assert_eq!(SignatureForm::from_name("Q"), None);
    }
}
