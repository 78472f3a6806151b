//! Street names with house numbers glued on.

use std::collections::BTreeSet;
use std::io::Read;

use super::for_each_tag_row;
use crate::error::Result;

/// Whether `s` contains an ASCII digit.
///
/// # Examples
/// ```
/// use mapdata_wrangler::checks::has_digit;
///
/// assert!(has_digit("Zadumana 1A"));
/// assert!(!has_digit("Zadumana"));
/// ```
pub fn has_digit(s: &str) -> bool {
    s.bytes().any(|b| b.is_ascii_digit())
}

/// Distinct street names that contain a digit.
pub fn find_numbered_streets<R: Read>(input: R) -> Result<BTreeSet<String>> {
    let mut streets = BTreeSet::new();
    for_each_tag_row(input, "street numbers", |row| {
        if row.is_street() && has_digit(&row.value) {
            streets.insert(row.value);
        }
    })?;
    Ok(streets)
}
