//! Post-correction check: find street names that are still stale.

use std::io::BufRead;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use super::{next_event, street_value, FeatureTracker};
use crate::corrections::CorrectionTable;
use crate::error::Result;
use crate::files::open_input;
use crate::types::FeatureRef;

/// A street name that is still a key of the correction table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleStreet {
    pub feature: FeatureRef,
    pub value: String,
}

/// Result of a verification pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationReport {
    /// `addr:street` tags inspected.
    pub street_tags: u64,

    /// Stale names in document order.
    pub stale: Vec<StaleStreet>,
}

impl VerificationReport {
    /// Whether no stale names remain.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.stale.is_empty()
    }
}

/// Scan `input` for street names the table would still correct.
pub fn verify_streets<R: BufRead>(input: R, table: &CorrectionTable) -> Result<VerificationReport> {
    let mut reader = Reader::from_reader(input);
    let mut tracker = FeatureTracker::default();
    let mut report = VerificationReport::default();
    let mut buf = Vec::new();

    loop {
        match next_event(&mut reader, &mut buf)? {
            Event::Eof => break,
            Event::Start(e) => {
                tracker.enter(&e)?;
                inspect(&e, &tracker, table, &mut report)?;
            }
            Event::Empty(e) => inspect(&e, &tracker, table, &mut report)?,
            Event::End(e) => tracker.leave(e.name().as_ref()),
            _ => {}
        }
        buf.clear();
    }

    Ok(report)
}

fn inspect(
    e: &quick_xml::events::BytesStart<'_>,
    tracker: &FeatureTracker,
    table: &CorrectionTable,
    report: &mut VerificationReport,
) -> Result<()> {
    let Some(feature) = tracker.current() else {
        return Ok(());
    };
    let Some(street) = street_value(e, feature)? else {
        return Ok(());
    };
    report.street_tags += 1;

    if table.is_stale(&street) {
        tracing::warn!(feature = %feature, street = %street, "stale street name");
        report.stale.push(StaleStreet {
            feature: feature.clone(),
            value: street,
        });
    }
    Ok(())
}

/// Verify a file.
pub fn verify_streets_file(input: &Path, table: &CorrectionTable) -> Result<VerificationReport> {
    verify_streets(open_input(input)?, table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::osm::correct_streets;
    use crate::types::FeatureKind;

    const STALE: &str = r#"<osm>
  <node id="1"><tag k="addr:street" v="Wiejska 1"/></node>
  <way id="2"><tag k="addr:street" v="Wiejska"/><tag k="name" v="Postępu 14"/></way>
  <way id="3"><tag k="addr:street" v="Postępu 14"/></way>
</osm>"#;

    #[test]
    fn test_reports_stale_names_in_order() {
        let report = verify_streets(STALE.as_bytes(), &CorrectionTable::default()).unwrap();

        assert_eq!(report.street_tags, 3);
        let found: Vec<(FeatureKind, &str)> = report
            .stale
            .iter()
            .map(|s| (s.feature.kind, s.value.as_str()))
            .collect();
        assert_eq!(
            found,
            vec![(FeatureKind::Node, "Wiejska 1"), (FeatureKind::Way, "Postępu 14")]
        );
        assert!(!report.is_clean());
    }

    #[test]
    fn test_corrected_output_is_clean() {
        let mut corrected = Vec::new();
        correct_streets(STALE.as_bytes(), &mut corrected, &CorrectionTable::default()).unwrap();

        let report = verify_streets(corrected.as_slice(), &CorrectionTable::default()).unwrap();
        assert!(report.is_clean());
        assert_eq!(report.street_tags, 3);
    }
}
