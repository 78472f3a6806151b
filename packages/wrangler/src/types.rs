//! Core data types shared by the wrangler tools.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One place from the SIMC registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryRecord {
    /// Place name (`NAZWA`).
    pub name: String,

    /// Place identifier (`SYM`).
    pub sym: String,

    /// Identifier of the parent place (`SYMPOD`).
    pub sympod: String,
}

impl RegistryRecord {
    /// Create a new record.
    pub fn new(
        name: impl Into<String>,
        sym: impl Into<String>,
        sympod: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            sym: sym.into(),
            sympod: sympod.into(),
        }
    }
}

/// One row of `nodes_tags.csv` or `ways_tags.csv`.
///
/// OSM keys are split on the first colon: `addr:street` arrives as
/// `type = "addr"`, `key = "street"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRow {
    pub id: String,
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub tag_type: String,
}

impl TagRow {
    /// Whether this row holds a street name.
    #[must_use]
    pub fn is_street(&self) -> bool {
        self.key == crate::config::STREET_KEY
    }

    /// Whether this row holds a postcode.
    #[must_use]
    pub fn is_postcode(&self) -> bool {
        self.key == crate::config::POSTCODE_KEY
    }
}

/// OSM element kinds that carry tags the corrector inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    Node,
    Way,
}

impl FeatureKind {
    /// Match an element name.
    #[must_use]
    pub fn from_tag(name: &[u8]) -> Option<Self> {
        match name {
            b"node" => Some(Self::Node),
            b"way" => Some(Self::Way),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to the OSM feature a tag belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRef {
    pub kind: FeatureKind,

    /// Value of the feature's `id` attribute, if it has one.
    pub id: Option<String>,
}

impl fmt::Display for FeatureRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{} {}", self.kind, id),
            None => write!(f, "{} (no id)", self.kind),
        }
    }
}
