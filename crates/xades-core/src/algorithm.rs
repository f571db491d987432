#![forbid(unsafe_code)]

//! Algorithm URI constants and the [`Algorithm`] value.
//!
//! URIs are passed through verbatim to the XML-signature engine; this
//! crate only ever compares them.

// ── Canonicalization ─────────────────────────────────────────────────

pub const C14N: &str = "http://www.w3.org/TR/2001/REC-xml-c14n-20010315";
pub const C14N_WITH_COMMENTS: &str =
    "http://www.w3.org/TR/2001/REC-xml-c14n-20010315#WithComments";
pub const C14N11: &str = "http://www.w3.org/2006/12/xml-c14n11";
pub const C14N11_WITH_COMMENTS: &str = "http://www.w3.org/2006/12/xml-c14n11#WithComments";
pub const EXC_C14N: &str = "http://www.w3.org/2001/10/xml-exc-c14n#";
pub const EXC_C14N_WITH_COMMENTS: &str = "http://www.w3.org/2001/10/xml-exc-c14n#WithComments";

// ── Digest algorithms ────────────────────────────────────────────────

pub const SHA1: &str = "http://www.w3.org/2000/09/xmldsig#sha1";
pub const SHA224: &str = "http://www.w3.org/2001/04/xmldsig-more#sha224";
pub const SHA256: &str = "http://www.w3.org/2001/04/xmlenc#sha256";
pub const SHA384: &str = "http://www.w3.org/2001/04/xmldsig-more#sha384";
pub const SHA512: &str = "http://www.w3.org/2001/04/xmlenc#sha512";
pub const SHA3_256: &str = "http://www.w3.org/2007/05/xmldsig-more#sha3-256";
pub const SHA3_384: &str = "http://www.w3.org/2007/05/xmldsig-more#sha3-384";
pub const SHA3_512: &str = "http://www.w3.org/2007/05/xmldsig-more#sha3-512";

// ── Signature algorithms ─────────────────────────────────────────────

pub const RSA_SHA256: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha256";
pub const ECDSA_SHA256: &str = "http://www.w3.org/2001/04/xmldsig-more#ecdsa-sha256";
pub const DSA_SHA256: &str = "http://www.w3.org/2009/xmldsig11#dsa-sha256";

// ── Transform algorithms ─────────────────────────────────────────────

pub const ENVELOPED_SIGNATURE: &str = "http://www.w3.org/2000/09/xmldsig#enveloped-signature";

/// Is `uri` one of the six W3C canonicalization algorithms?
///
/// Profiles refuse algorithm providers that hand out anything else where a
/// canonicalization is expected.
pub fn is_canonicalization(uri: &str) -> bool {
    matches!(
        uri,
        C14N | C14N_WITH_COMMENTS | C14N11 | C14N11_WITH_COMMENTS | EXC_C14N
            | EXC_C14N_WITH_COMMENTS
    )
}

/// An algorithm reference: URI plus optional ordered parameter nodes.
///
/// Parameters are opaque serialized XML nodes (e.g. an `XPath` element or
/// an `InclusiveNamespaces` element) handed to the XML engine untouched.
/// Values are immutable once built. Containers that need instance identity
/// hold them behind `Arc` and compare with `Arc::ptr_eq`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Algorithm {
    uri: String,
    params: Vec<String>,
}

impl Algorithm {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            params: Vec::new(),
        }
    }

    pub fn with_params(uri: impl Into<String>, params: Vec<String>) -> Self {
        Self {
            uri: uri.into(),
            params,
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Parameter nodes in document order; empty when the algorithm takes none.
    pub fn params(&self) -> &[String] {
        &self.params
    }
}
