//! Postcode checks and the postcode substitution.
//!
//! Warsaw postcodes all start with `0` and follow the `NN-NNN` format.

use std::collections::BTreeSet;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::for_each_tag_row;
use crate::error::{Result, WranglerError};
use crate::files::{open_input, write_atomically};

/// Polish postcode format: two digits, dash, three digits.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static POSTCODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2}-[0-9]{3}$").expect("valid regex"));

/// Postcodes that do not look like Warsaw postcodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostcodeReport {
    /// Distinct postcodes not starting with `0`.
    pub deviant_prefix: BTreeSet<String>,

    /// Distinct postcodes not in `NN-NNN` format.
    pub malformed: BTreeSet<String>,
}

impl PostcodeReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.deviant_prefix.is_empty() && self.malformed.is_empty()
    }
}

/// Collect postcodes outside the Warsaw range or format.
pub fn check_postcodes<R: Read>(input: R) -> Result<PostcodeReport> {
    let mut report = PostcodeReport::default();

    for_each_tag_row(input, "postcodes", |row| {
        if !row.is_postcode() {
            return;
        }
        if !POSTCODE_PATTERN.is_match(&row.value) {
            report.malformed.insert(row.value.clone());
        }
        if !row.value.starts_with('0') {
            report.deviant_prefix.insert(row.value);
        }
    })?;

    Ok(report)
}

/// Copy a CSV table, replacing every field exactly equal to `from` with `to`.
///
/// The header row is copied like any other row. Rows may have differing
/// lengths.
///
/// # Returns
/// Number of replaced fields
pub fn substitute_field<R: Read, W: Write>(input: R, output: W, from: &str, to: &str) -> Result<u64> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(output);

    let mut replaced = 0;
    for record in reader.records() {
        let record = record.map_err(|e| WranglerError::from_csv(e, "postcode substitution"))?;
        let fields: Vec<&str> = record
            .iter()
            .map(|field| {
                if field == from {
                    replaced += 1;
                    to
                } else {
                    field
                }
            })
            .collect();
        writer.write_record(&fields)?;
    }
    writer.flush()?;

    Ok(replaced)
}

/// File wrapper around [`substitute_field`].
pub fn substitute_field_file(input: &Path, output: &Path, from: &str, to: &str) -> Result<u64> {
    let source = open_input(input)?;
    let replaced = write_atomically(output, |out| substitute_field(source, out, from, to))?;

    tracing::info!(
        from,
        to,
        replaced,
        output = %output.display(),
        "field values substituted"
    );
    Ok(replaced)
}
