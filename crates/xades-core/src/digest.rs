#![forbid(unsafe_code)]

//! Digests addressed by their XML-DSig URI.
//!
//! Used for the digests inside certificate and CRL references and for the
//! signature policy document digest.

use crate::{algorithm, Error};
use digest::Digest;

/// Hash `data` with the algorithm named by `uri`.
pub fn digest(uri: &str, data: &[u8]) -> Result<Vec<u8>, Error> {
    let value = match uri {
        algorithm::SHA1 => sha1::Sha1::digest(data).to_vec(),
        algorithm::SHA224 => sha2::Sha224::digest(data).to_vec(),
        algorithm::SHA256 => sha2::Sha256::digest(data).to_vec(),
        algorithm::SHA384 => sha2::Sha384::digest(data).to_vec(),
        algorithm::SHA512 => sha2::Sha512::digest(data).to_vec(),
        algorithm::SHA3_256 => sha3::Sha3_256::digest(data).to_vec(),
        algorithm::SHA3_384 => sha3::Sha3_384::digest(data).to_vec(),
        algorithm::SHA3_512 => sha3::Sha3_512::digest(data).to_vec(),
        _ => {
            return Err(Error::UnsupportedAlgorithm(format!(
                "digest algorithm: {uri}"
            )))
        }
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    #[test]
    fn test_sha256() {
        assert_eq!(
            hex(&digest(algorithm::SHA256, b"hello").unwrap()),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_output_length_follows_uri() {
        assert_eq!(digest(algorithm::SHA1, b"hello").unwrap().len(), 20);
        assert_eq!(digest(algorithm::SHA384, b"hello").unwrap().len(), 48);
        assert_eq!(digest(algorithm::SHA3_512, b"hello").unwrap().len(), 64);
        assert_ne!(
            digest(algorithm::SHA256, b"hello").unwrap(),
            digest(algorithm::SHA3_256, b"hello").unwrap()
        );
    }

    #[test]
    fn test_unknown_uri() {
        assert!(matches!(
            digest("urn:example:md4", b"x"),
            Err(Error::UnsupportedAlgorithm(_))
        ));
    }
}
