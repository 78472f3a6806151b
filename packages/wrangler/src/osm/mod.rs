//! Streaming passes over OSM XML.
//!
//! Both passes read the document event by event with `quick-xml`, so memory
//! stays bounded regardless of file size. Only `<tag>` elements nested in a
//! `<node>` or `<way>` are inspected.

mod corrector;
mod verify;

pub use corrector::{correct_streets, correct_streets_file, AppliedCorrection, CorrectionReport};
pub use verify::{verify_streets, verify_streets_file, StaleStreet, VerificationReport};

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::config::STREET_TAG_KEY;
use crate::error::{Result, WranglerError};
use crate::types::{FeatureKind, FeatureRef};
use crate::xml::attribute_value;

/// Read the next event, attaching the byte offset to syntax errors.
fn next_event<'b, R: BufRead>(reader: &mut Reader<R>, buf: &'b mut Vec<u8>) -> Result<Event<'b>> {
    reader
        .read_event_into(buf)
        .map_err(|source| WranglerError::XmlStreamAt {
            position: reader.buffer_position() as u64,
            source,
        })
}

/// Tracks which `node`/`way` elements are currently open.
#[derive(Debug, Default)]
struct FeatureTracker {
    open: Vec<FeatureRef>,
}

impl FeatureTracker {
    /// Record a start event. Returns the kind if it opened a feature.
    fn enter(&mut self, e: &BytesStart<'_>) -> Result<Option<FeatureKind>> {
        let Some(kind) = FeatureKind::from_tag(e.name().as_ref()) else {
            return Ok(None);
        };
        let id = attribute_value(e, b"id", kind.as_str())?;
        self.open.push(FeatureRef { kind, id });
        Ok(Some(kind))
    }

    /// Record an end event.
    fn leave(&mut self, name: &[u8]) {
        if FeatureKind::from_tag(name).is_some() {
            self.open.pop();
        }
    }

    /// Innermost open feature.
    fn current(&self) -> Option<&FeatureRef> {
        self.open.last()
    }
}

/// Decoded `v` of a `<tag k="addr:street">` element.
///
/// Returns `None` for other elements and other tag keys.
fn street_value(e: &BytesStart<'_>, feature: &FeatureRef) -> Result<Option<String>> {
    if e.name().as_ref() != b"tag" {
        return Ok(None);
    }

    let context = format!("tag of {feature}");
    if attribute_value(e, b"k", &context)?.as_deref() != Some(STREET_TAG_KEY) {
        return Ok(None);
    }

    attribute_value(e, b"v", &context)?
        .map(Some)
        .ok_or_else(|| {
            WranglerError::malformed(
                context,
                format!("{STREET_TAG_KEY} tag without a v attribute"),
            )
        })
}
