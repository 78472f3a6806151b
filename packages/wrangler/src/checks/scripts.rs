//! Detection of text written in non-Latin scripts.

use std::collections::HashMap;
use std::io::Read;

use unicode_properties::{GeneralCategoryGroup, UnicodeGeneralCategory};
use unicode_script::{Script, UnicodeScript};

use super::for_each_tag_row;
use crate::error::Result;

/// Whether a character belongs to the Latin script.
///
/// Uses the Unicode Script property, so compatibility letters such as
/// `K` (KELVIN SIGN) and the Roman numerals count as Latin.
///
/// # Examples
/// ```
/// use mapdata_wrangler::checks::is_latin;
///
/// assert!(is_latin('ł'));
/// assert!(is_latin('Ż'));
/// assert!(!is_latin('Ж'));
/// ```
pub fn is_latin(c: char) -> bool {
    c.script() == Script::Latin
}

/// Whether `c` is a letter (general category `L*`).
fn is_letter(c: char) -> bool {
    c.general_category_group() == GeneralCategoryGroup::Letter
}

/// Whether every letter of `s` is Latin.
///
/// Only `L*` characters are checked; digits, letter-like numerals,
/// punctuation and whitespace are ignored.
pub fn only_latin(s: &str) -> bool {
    s.chars().filter(|&c| is_letter(c)).all(is_latin)
}

/// Field values containing non-Latin letters, with occurrence counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptReport {
    /// Values seen more often than the threshold, most frequent first.
    pub frequent: Vec<(String, u64)>,

    /// Distinct non-Latin values seen at all.
    pub distinct: usize,
}

/// Count fields (of any column) that contain non-Latin letters.
///
/// # Arguments
/// * `input` - Tag table
/// * `threshold` - Only values seen more than this many times are reported
pub fn find_non_latin<R: Read>(input: R, threshold: u64) -> Result<ScriptReport> {
    let mut counts: HashMap<String, u64> = HashMap::new();

    for_each_tag_row(input, "script detection", |row| {
        for field in [row.id, row.key, row.value, row.tag_type] {
            if !only_latin(&field) {
                *counts.entry(field).or_default() += 1;
            }
        }
    })?;

    let distinct = counts.len();
    let mut frequent: Vec<(String, u64)> = counts
        .into_iter()
        .filter(|(_, count)| *count > threshold)
        .collect();
    frequent.sort_by(|(a, a_count), (b, b_count)| b_count.cmp(a_count).then_with(|| a.cmp(b)));

    Ok(ScriptReport { frequent, distinct })
}
