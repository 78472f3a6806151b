//! Anomaly and frequency checks over tag CSV extracts.
//!
//! Every check reads a whole `id,key,value,type` table, applies a per-row
//! rule and returns an aggregate. Results use ordered collections so
//! repeated runs print the same output.

mod names;
mod postcodes;
mod scripts;
mod street_numbers;

pub use names::{count_street_names, NameCounts};
pub use postcodes::{check_postcodes, substitute_field, substitute_field_file, PostcodeReport};
pub use scripts::{find_non_latin, is_latin, only_latin, ScriptReport};
pub use street_numbers::{find_numbered_streets, has_digit};

use std::io::Read;

use crate::error::{Result, WranglerError};
use crate::types::TagRow;

/// Feed every row of a tag table to `visit`.
///
/// Rows are decoded as UTF-8 and matched to columns by header name, so
/// column order does not matter.
///
/// # Returns
/// Number of rows read
fn for_each_tag_row<R: Read>(input: R, source: &str, mut visit: impl FnMut(TagRow)) -> Result<u64> {
    let mut reader = csv::Reader::from_reader(input);
    let headers = reader
        .headers()
        .map_err(|e| WranglerError::from_csv(e, source))?
        .clone();

    let mut count = 0;
    for record in reader.records() {
        let record = record.map_err(|e| WranglerError::from_csv(e, source))?;
        let row: TagRow = record
            .deserialize(Some(&headers))
            .map_err(|e| WranglerError::from_csv(e, source))?;
        visit(row);
        count += 1;
    }

    tracing::debug!(rows = count, source, "tag table scanned");
    Ok(count)
}
