#![forbid(unsafe_code)]

//! Signed XML document wrapper over roxmltree.

use std::collections::HashMap;
use xades_core::{ns, Error};

/// An owned signed document.
///
/// The text is checked once on construction; [`SignedDocument::parse_doc`]
/// hands out a `roxmltree::Document` borrowing from it.
#[derive(Debug, Clone)]
pub struct SignedDocument {
    text: String,
}

impl SignedDocument {
    pub fn parse(text: String) -> Result<Self, Error> {
        roxmltree::Document::parse_with_options(&text, crate::parsing_options())
            .map_err(|e| Error::XmlParse(e.to_string()))?;
        Ok(Self { text })
    }

    pub fn parse_bytes(data: &[u8]) -> Result<Self, Error> {
        let text = std::str::from_utf8(data)
            .map_err(|e| Error::XmlParse(format!("invalid UTF-8: {e}")))?
            .to_owned();
        Self::parse(text)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Parse the stored text again. Call once per pass and hand the
    /// document down.
    pub fn parse_doc(&self) -> Result<roxmltree::Document<'_>, Error> {
        roxmltree::Document::parse_with_options(&self.text, crate::parsing_options())
            .map_err(|e| Error::XmlParse(e.to_string()))
    }
}

/// Map every `Id`/`ID`/`id` value in `doc` to its element.
///
/// A value carried by two elements makes references to it ambiguous and
/// is rejected.
pub fn build_id_map<'a>(
    doc: &'a roxmltree::Document<'a>,
) -> Result<HashMap<&'a str, roxmltree::NodeId>, Error> {
    let mut map = HashMap::new();
    for node in doc.descendants().filter(|n| n.is_element()) {
        for attr in ["Id", "ID", "id"] {
            if let Some(value) = node.attribute(attr) {
                if map.insert(value, node.id()).is_some() {
                    return Err(Error::XmlParse(format!("duplicate Id value: {value}")));
                }
            }
        }
    }
    Ok(map)
}

/// Whether `node` is the element `{ns}local_name`.
pub fn is_element(node: roxmltree::Node<'_, '_>, ns: &str, local_name: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == local_name
        && node.tag_name().namespace().unwrap_or("") == ns
}

/// Whether `node` is an element of either XAdES namespace.
pub fn is_xades(node: roxmltree::Node<'_, '_>) -> bool {
    node.is_element()
        && matches!(
            node.tag_name().namespace(),
            Some(ns::XADES) | Some(ns::XADES141)
        )
}

/// First child element `{ns}local_name` of `parent`.
pub fn child_element<'a, 'i>(
    parent: roxmltree::Node<'a, 'i>,
    ns: &str,
    local_name: &str,
) -> Option<roxmltree::Node<'a, 'i>> {
    parent.children().find(|n| is_element(*n, ns, local_name))
}

/// Child elements `{ns}local_name` of `parent`, in document order.
pub fn child_elements<'a, 'i>(
    parent: roxmltree::Node<'a, 'i>,
    ns: &'a str,
    local_name: &'a str,
) -> impl Iterator<Item = roxmltree::Node<'a, 'i>> + 'a {
    parent
        .children()
        .filter(move |n| is_element(*n, ns, local_name))
}

/// Every descendant element `{ns}local_name` of `doc`.
pub fn find_elements<'a>(
    doc: &'a roxmltree::Document<'a>,
    ns: &str,
    local_name: &str,
) -> Vec<roxmltree::Node<'a, 'a>> {
    doc.descendants()
        .filter(|n| is_element(*n, ns, local_name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"<root xmlns:ds="http://www.w3.org/2000/09/xmldsig#">
  <ds:Signature Id="sig-1"><ds:Object Id="obj"/></ds:Signature>
  <Signature/>
</root>"#;

    #[test]
    fn test_parse_rejects_malformed_text() {
        assert!(matches!(
            SignedDocument::parse("<a><b></a>".into()),
            Err(Error::XmlParse(_))
        ));
        assert!(matches!(
            SignedDocument::parse_bytes(&[0x3c, 0xff, 0x3e]),
            Err(Error::XmlParse(_))
        ));
    }

    #[test]
    fn test_find_elements_matches_namespace() {
        let signed = SignedDocument::parse(DOC.into()).unwrap();
        let doc = signed.parse_doc().unwrap();
        let sigs = find_elements(&doc, ns::DSIG, "Signature");
        assert_eq!(sigs.len(), 1);
        assert_eq!(sigs[0].attribute("Id"), Some("sig-1"));
        assert!(child_element(sigs[0], ns::DSIG, "Object").is_some());
        assert_eq!(child_elements(sigs[0], ns::DSIG, "KeyInfo").count(), 0);
    }

    #[test]
    fn test_id_map() {
        let signed = SignedDocument::parse(DOC.into()).unwrap();
        let doc = signed.parse_doc().unwrap();
        let ids = build_id_map(&doc).unwrap();
        assert_eq!(ids.len(), 2);
        let obj = doc.get_node(ids["obj"]).unwrap();
        assert!(is_element(obj, ns::DSIG, "Object"));

        let dup = SignedDocument::parse(r#"<r><a Id="x"/><b id="x"/></r>"#.into()).unwrap();
        let doc = dup.parse_doc().unwrap();
        assert!(matches!(build_id_map(&doc), Err(Error::XmlParse(_))));
    }
}
