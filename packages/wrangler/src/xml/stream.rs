//! Attribute decoding for `quick-xml` start events.
//!
//! Attribute values are kept raw (escaped) while echoing; they are only
//! decoded when inspected, and decoding is strict UTF-8.

use quick_xml::escape::unescape;
use quick_xml::events::BytesStart;

use crate::error::{Result, WranglerError};

/// Decode a raw attribute value: strict UTF-8, then XML unescaping.
pub fn decode_attribute(raw: &[u8], context: &str) -> Result<String> {
    let text = std::str::from_utf8(raw).map_err(|_| WranglerError::encoding(context))?;
    let unescaped = unescape(text)
        .map_err(|e| WranglerError::malformed(context, format!("bad escape: {e}")))?;
    Ok(unescaped.into_owned())
}

/// Get the decoded value of attribute `name`, if present.
///
/// # Examples
/// ```
/// use quick_xml::events::BytesStart;
/// use mapdata_wrangler::xml::attribute_value;
///
/// let tag = BytesStart::from_content(r#"tag k="addr:street" v="Wiejska &amp; 1""#, 3);
/// let value = attribute_value(&tag, b"v", "tag").unwrap();
/// assert_eq!(value.as_deref(), Some("Wiejska & 1"));
/// ```
pub fn attribute_value(e: &BytesStart<'_>, name: &[u8], context: &str) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| WranglerError::malformed(context, err.to_string()))?;
        if attr.key.as_ref() == name {
            return decode_attribute(&attr.value, context).map(Some);
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_attribute_unescapes() {
        let value = decode_attribute(b"Ireny Kosmowskiej &#45; Grodzie\xc5\x84ska", "tag").unwrap();
        assert_eq!(value, "Ireny Kosmowskiej - Grodzieńska");
    }

    #[test]
    fn test_decode_attribute_rejects_invalid_utf8() {
        let err = decode_attribute(b"Soko\xb3owska", "way 1").unwrap_err();
        assert!(matches!(err, WranglerError::Encoding { .. }));
    }

    #[test]
    fn test_decode_attribute_rejects_unknown_entity() {
        let err = decode_attribute(b"a &bogus; b", "way 1").unwrap_err();
        assert!(matches!(err, WranglerError::MalformedRecord { .. }));
    }

    #[test]
    fn test_attribute_value_missing() {
        let tag = BytesStart::from_content(r#"tag k="name""#, 3);
        assert_eq!(attribute_value(&tag, b"v", "tag").unwrap(), None);
    }
}
