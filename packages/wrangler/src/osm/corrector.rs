//! Street-name corrector.
//!
//! Echoes every XML event from input to output. A `<tag k="addr:street">`
//! inside a `node` or `way` whose value is a key of the correction table is
//! re-emitted with only the bytes of its `v` value replaced; everything
//! else, quoting and whitespace included, is written back as read, so a
//! document without stale names comes out byte-identical.

use std::io::{BufRead, Write};
use std::ops::Range;
use std::path::Path;

use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};

use super::{next_event, street_value, FeatureTracker};
use crate::corrections::CorrectionTable;
use crate::error::{Result, WranglerError};
use crate::files::{open_input, write_atomically};
use crate::types::{FeatureKind, FeatureRef};

/// One replaced street name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedCorrection {
    pub feature: FeatureRef,
    pub from: String,
    pub to: String,
}

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Summary of a correction pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorrectionReport {
    /// Elements read (start and empty events).
    pub elements: u64,

    /// `node` and `way` elements read.
    pub features: u64,

    /// `addr:street` tags inspected.
    pub street_tags: u64,

    pub corrections: Vec<AppliedCorrection>,
}

/// Stream `input` to `output`, correcting stale street names.
///
/// # Arguments
/// * `input` - XML source
/// * `output` - Destination for the full corrected document
/// * `table` - Stale-to-corrected street names
///
/// # Returns
/// A report listing every applied correction
pub fn correct_streets<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
    table: &CorrectionTable,
) -> Result<CorrectionReport> {
    // The reader skips a leading BOM without reporting it
    if input.fill_buf()?.starts_with(UTF8_BOM) {
        output.write_all(UTF8_BOM)?;
    }

    let mut reader = Reader::from_reader(input);
    let mut writer = Writer::new(output);
    let mut tracker = FeatureTracker::default();
    let mut report = CorrectionReport::default();
    let mut buf = Vec::new();

    loop {
        let event = next_event(&mut reader, &mut buf)?;

        let patched = match &event {
            Event::Eof => break,
            Event::Start(e) => {
                report.elements += 1;
                if tracker.enter(e)?.is_some() {
                    report.features += 1;
                }
                patch_street(e, &tracker, table, &mut report)?
                    .map(|content| tag_bytes(&content, false))
            }
            Event::Empty(e) => {
                report.elements += 1;
                if FeatureKind::from_tag(e.name().as_ref()).is_some() {
                    report.features += 1;
                }
                patch_street(e, &tracker, table, &mut report)?
                    .map(|content| tag_bytes(&content, true))
            }
            Event::End(e) => {
                tracker.leave(e.name().as_ref());
                None
            }
            _ => None,
        };

        match patched {
            Some(raw) => writer.get_mut().write_all(&raw)?,
            None => writer.write_event(event)?,
        }
        buf.clear();
    }

    writer.into_inner().flush()?;

    tracing::debug!(
        elements = report.elements,
        features = report.features,
        street_tags = report.street_tags,
        corrections = report.corrections.len(),
        "correction pass finished"
    );
    Ok(report)
}

/// Raw content of `e` with its `v` value replaced, if `e` is a stale
/// street tag of an open feature.
fn patch_street(
    e: &BytesStart<'_>,
    tracker: &FeatureTracker,
    table: &CorrectionTable,
    report: &mut CorrectionReport,
) -> Result<Option<Vec<u8>>> {
    let Some(feature) = tracker.current() else {
        return Ok(None);
    };
    let Some(street) = street_value(e, feature)? else {
        return Ok(None);
    };
    report.street_tags += 1;

    let Some(fixed) = table.lookup(&street) else {
        return Ok(None);
    };

    let content: &[u8] = e;
    let range = value_range(content, e.name().as_ref().len(), b"v").ok_or_else(|| {
        WranglerError::malformed(format!("tag of {feature}"), "unreadable v attribute")
    })?;

    let mut patched = Vec::with_capacity(content.len() + fixed.len());
    patched.extend_from_slice(&content[..range.start]);
    patched.extend_from_slice(escape(fixed).as_bytes());
    patched.extend_from_slice(&content[range.end..]);

    tracing::info!(feature = %feature, "{street} ==> {fixed}");
    report.corrections.push(AppliedCorrection {
        feature: feature.clone(),
        from: street,
        to: fixed.to_string(),
    });

    Ok(Some(patched))
}

/// Byte range of the raw value of attribute `key` in start-tag content
/// (`name attr="value" ...`, without the angle brackets).
fn value_range(content: &[u8], name_len: usize, key: &[u8]) -> Option<Range<usize>> {
    let is_space = |i: usize| content.get(i).is_some_and(u8::is_ascii_whitespace);
    let mut i = name_len;

    loop {
        while is_space(i) {
            i += 1;
        }
        if i >= content.len() {
            return None;
        }

        let key_start = i;
        while content.get(i).is_some_and(|&b| b != b'=' && !b.is_ascii_whitespace()) {
            i += 1;
        }
        let key_end = i;

        while is_space(i) {
            i += 1;
        }
        if content.get(i) != Some(&b'=') {
            return None;
        }
        i += 1;
        while is_space(i) {
            i += 1;
        }

        let quote = *content.get(i)?;
        if quote != b'"' && quote != b'\'' {
            return None;
        }
        let start = i + 1;
        let end = start + content.get(start..)?.iter().position(|&b| b == quote)?;

        if content.get(key_start..key_end) == Some(key) {
            return Some(start..end);
        }
        i = end + 1;
    }
}

/// Serialize start-tag content as `<...>` or `<.../>`.
fn tag_bytes(content: &[u8], empty: bool) -> Vec<u8> {
    let mut raw = Vec::with_capacity(content.len() + 3);
    raw.push(b'<');
    raw.extend_from_slice(content);
    raw.extend_from_slice(if empty { b"/>" } else { b">" });
    raw
}

/// Correct a file, writing the full document to `output`.
///
/// `output` may equal `input`: the result is staged in a temp file and only
/// renamed over the target once the whole input has been read.
pub fn correct_streets_file(
    input: &Path,
    output: &Path,
    table: &CorrectionTable,
) -> Result<CorrectionReport> {
    let source = open_input(input)?;

    let report = write_atomically(output, |out| correct_streets(source, out, table))?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        corrections = report.corrections.len(),
        "street names corrected"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn correct(xml: &str) -> (String, CorrectionReport) {
        let mut out = Vec::new();
        let report = correct_streets(xml.as_bytes(), &mut out, &CorrectionTable::default()).unwrap();
        (String::from_utf8(out).unwrap(), report)
    }

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6" generator="osmconvert">
  <node id="1" lat="52.2" lon="21.0">
    <tag k="addr:street" v="Zadumana 1A"/>
    <tag k="addr:housenumber" v="1A" />
  </node>
  <way id="2">
    <nd ref="1"/>
    <tag k="addr:street" v="Zadumana 5"/>
  </way>
</osm>
"#;

    #[test]
    fn test_corrects_stale_name_only() {
        let (out, report) = correct(SAMPLE);

        assert_eq!(out, SAMPLE.replace(r#"v="Zadumana 1A""#, r#"v="Zadumana""#));
        assert_eq!(report.street_tags, 2);
        assert_eq!(report.features, 2);
        assert_eq!(
            report.corrections,
            vec![AppliedCorrection {
                feature: FeatureRef {
                    kind: FeatureKind::Node,
                    id: Some("1".to_string()),
                },
                from: "Zadumana 1A".to_string(),
                to: "Zadumana".to_string(),
            }]
        );
    }

    #[test]
    fn test_no_match_is_byte_identical() {
        let xml = r#"<?xml version="1.0"?>
<!-- extract -->
<osm>
  <node id="9"><tag k="name" v="Caf&#233; &amp; Bar"/></node>
  <way id="3"><tag k="addr:street" v="Wiejska"/></way>
  <note><![CDATA[raw <text>]]></note>
</osm>"#;
        let (out, report) = correct(xml);

        assert_eq!(out, xml);
        assert!(report.corrections.is_empty());
    }

    #[test]
    fn test_street_tags_outside_features_are_ignored() {
        let xml = r#"<osm><relation id="4"><tag k="addr:street" v="Wiejska 1"/></relation></osm>"#;
        let (out, report) = correct(xml);

        assert_eq!(out, xml);
        assert_eq!(report.street_tags, 0);
    }

    #[test]
    fn test_escaped_values_match_and_are_escaped_on_output() {
        let xml = r#"<osm><way id="5"><tag k="addr:street" v="Ireny Kosmowskiej - Grodzieńska 21/29"/><tag k="note" v='say "hi"'/></way></osm>"#;
        let (out, _) = correct(xml);

        assert!(out.contains(r#"v="Ireny Kosmowskiej - Grodzieńska""#));
        assert!(out.contains(r#"v='say "hi"'"#));
    }

    #[test]
    fn test_bom_is_kept() {
        let xml: &[u8] = b"\xEF\xBB\xBF<?xml version=\"1.0\"?>\n<osm><node id=\"1\"/></osm>";
        let mut out = Vec::new();
        correct_streets(xml, &mut out, &CorrectionTable::default()).unwrap();

        assert_eq!(out, xml);
    }

    #[test]
    fn test_bom_is_kept_when_correcting() {
        let xml = "\u{FEFF}<osm><way id=\"1\"><tag k=\"addr:street\" v=\"Wiejska 1\"/></way></osm>";
        let (out, report) = correct(xml);

        assert_eq!(out, xml.replace("Wiejska 1", "Wiejska"));
        assert_eq!(report.corrections.len(), 1);
    }

    #[test]
    fn test_only_value_bytes_change() {
        let xml = "<osm>\n<node id='7'>\n  <tag k='addr:street' v='Zadumana 1A' />\n  <tag  v = \"Wiejska 1\"\tk=\"addr:street\"></tag>\n</node>\n</osm>";
        let (out, report) = correct(xml);

        assert_eq!(
            out,
            "<osm>\n<node id='7'>\n  <tag k='addr:street' v='Zadumana' />\n  <tag  v = \"Wiejska\"\tk=\"addr:street\"></tag>\n</node>\n</osm>"
        );
        assert_eq!(report.corrections.len(), 2);
    }

    #[test]
    fn test_value_range() {
        let content = b"tag k='addr:street' v=\"Zadumana 1A\" ";
        let range = value_range(content, 3, b"v").unwrap();
        assert_eq!(&content[range], b"Zadumana 1A");

        assert_eq!(value_range(b"tag kv='x'", 3, b"v"), None);
        assert_eq!(value_range(b"tag k='x'", 3, b"v"), None);
    }

    #[test]
    fn test_idempotent() {
        let (once, _) = correct(SAMPLE);
        let (twice, report) = correct(&once);

        assert_eq!(twice, once);
        assert!(report.corrections.is_empty());
    }

    #[test]
    fn test_invalid_utf8_in_street_value() {
        let xml: &[u8] = b"<osm><way id=\"6\"><tag k=\"addr:street\" v=\"Soko\xb3owska\"/></way></osm>";
        let mut out = Vec::new();
        let err = correct_streets(xml, &mut out, &CorrectionTable::default()).unwrap_err();

        assert!(matches!(err, WranglerError::Encoding { .. }));
        assert!(err.to_string().contains("way 6"));
    }
}
