//! Occurrence counts of selected street names.

use std::collections::HashMap;
use std::io::Read;

use super::for_each_tag_row;
use crate::error::Result;

/// Street names with their occurrence counts, in the order requested.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameCounts {
    pub counts: Vec<(String, u64)>,
}

impl NameCounts {
    /// Count for `name`, if it was requested.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<u64> {
        self.counts
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, count)| *count)
    }
}

/// Count how often each of `names` appears as a street value.
///
/// Every requested name is present in the result, with zero when absent.
/// Duplicate requests are counted once.
pub fn count_street_names<R: Read, S: AsRef<str>>(input: R, names: &[S]) -> Result<NameCounts> {
    let mut order: Vec<String> = Vec::with_capacity(names.len());
    let mut counts: HashMap<String, u64> = HashMap::with_capacity(names.len());
    for name in names {
        let name = name.as_ref();
        if counts.insert(name.to_string(), 0).is_none() {
            order.push(name.to_string());
        }
    }

    for_each_tag_row(input, "name counts", |row| {
        if row.is_street() {
            if let Some(count) = counts.get_mut(&row.value) {
                *count += 1;
            }
        }
    })?;

    Ok(NameCounts {
        counts: order
            .into_iter()
            .map(|name| {
                let count = counts.get(&name).copied().unwrap_or_default();
                (name, count)
            })
            .collect(),
    })
}
