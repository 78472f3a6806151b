//! The street-name correction table.
//!
//! A fixed mapping from a known-bad full `addr:street` value to its
//! corrected form. The table is built once and never mutated. Corrected
//! values may not themselves be keys, so applying the table twice is the
//! same as applying it once.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::config::STREET_CORRECTIONS;
use crate::error::{Result, WranglerError};

/// Immutable mapping from stale street names to corrected ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionTable {
    entries: HashMap<String, String>,
}

impl CorrectionTable {
    /// Build a table from `(stale, corrected)` pairs.
    ///
    /// # Returns
    /// * `Err(WranglerError::InvalidCorrectionTable)` for empty names,
    ///   no-op entries or chained corrections
    pub fn new<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries: HashMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        for (stale, corrected) in &entries {
            if stale.is_empty() || corrected.is_empty() {
                return Err(WranglerError::InvalidCorrectionTable(format!(
                    "empty street name in entry '{stale}' -> '{corrected}'"
                )));
            }
            if stale == corrected {
                return Err(WranglerError::InvalidCorrectionTable(format!(
                    "'{stale}' maps to itself"
                )));
            }
            if entries.contains_key(corrected) {
                return Err(WranglerError::InvalidCorrectionTable(format!(
                    "'{stale}' -> '{corrected}' is chained: '{corrected}' is corrected again"
                )));
            }
        }

        Ok(Self { entries })
    }

    /// Load a table from a YAML mapping of stale name to corrected name.
    ///
    /// ```yaml
    /// Zadumana 1A: Zadumana
    /// Wiejska 1: Wiejska
    /// ```
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = crate::xml::read_utf8(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse a table from a YAML mapping.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let entries: BTreeMap<String, String> = serde_yaml_ng::from_str(yaml)?;
        Self::new(entries)
    }

    /// Corrected form of `street`, if it is a known-bad name.
    #[must_use]
    pub fn lookup(&self, street: &str) -> Option<&str> {
        self.entries.get(street).map(String::as_str)
    }

    /// Whether `street` is a known-bad name.
    #[must_use]
    pub fn is_stale(&self, street: &str) -> bool {
        self.entries.contains_key(street)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CorrectionTable {
    /// The built-in Warsaw table.
    fn default() -> Self {
        Self {
            entries: STREET_CORRECTIONS
                .iter()
                .map(|(stale, fixed)| ((*stale).to_string(), (*fixed).to_string()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let table = CorrectionTable::default();
        assert_eq!(table.len(), 11);
        assert_eq!(table.lookup("Zadumana 1A"), Some("Zadumana"));
        assert_eq!(table.lookup("Sokołowska 9/U31"), Some("Sokołowska"));
        assert_eq!(table.lookup("Zadumana 5"), None);
    }

    #[test]
    fn test_lookup_is_exact() {
        let table = CorrectionTable::default();
        assert!(!table.is_stale("zadumana 1a"));
        assert!(!table.is_stale("Zadumana 1A "));
        assert!(!table.is_stale("Zadumana"));
    }

    #[test]
    fn test_rejects_chained_corrections() {
        let err = CorrectionTable::new([("Wiejska 1", "Wiejska"), ("Wiejska", "Wiejska 2")])
            .unwrap_err();
        assert!(matches!(err, WranglerError::InvalidCorrectionTable(_)));
    }

    #[test]
    fn test_rejects_identity_entry() {
        assert!(CorrectionTable::new([("Wiejska", "Wiejska")]).is_err());
    }

    #[test]
    fn test_from_yaml_str() {
        let table = CorrectionTable::from_yaml_str(
            "Zadumana 1A: Zadumana\n\"Postępu 14\": Postępu\n",
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup("Postępu 14"), Some("Postępu"));
    }

    #[test]
    fn test_from_yaml_str_rejects_non_mapping() {
        let err = CorrectionTable::from_yaml_str("- Zadumana 1A\n- Zadumana\n").unwrap_err();
        assert!(matches!(err, WranglerError::CorrectionFile(_)));
    }
}
