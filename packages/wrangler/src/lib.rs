//! Batch tools for wrangling Warsaw OpenStreetMap data and the TERYT SIMC
//! place registry.
//!
//! Each tool is a single pass over one input file:
//!
//! - the SIMC registry XML is converted into a `name,sym,sympod` CSV table,
//! - stale `addr:street` values in an OSM extract are corrected while the
//!   document is streamed, and a verification pass checks none remain,
//! - the tag CSV extracts are checked for odd street names, postcodes and
//!   non-Latin text,
//! - all CSV extracts are loaded into an SQLite database.
//!
//! # Example
//!
//! ```
//! use mapdata_wrangler::corrections::CorrectionTable;
//! use mapdata_wrangler::osm::correct_streets;
//!
//! let xml = r#"<osm><way id="1"><tag k="addr:street" v="Zadumana 1A"/></way></osm>"#;
//! let mut out = Vec::new();
//! let report = correct_streets(xml.as_bytes(), &mut out, &CorrectionTable::default()).unwrap();
//!
//! assert_eq!(report.corrections.len(), 1);
//! assert!(String::from_utf8(out).unwrap().contains(r#"v="Zadumana""#));
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Constants, default file names and data directory resolution
//! - [`error`]: Error types and Result alias
//! - [`types`]: Shared data types (registry records, tag rows, OSM features)
//! - [`files`]: Input opening and atomic output writing
//! - [`xml`]: XML utilities
//! - [`corrections`]: The street-name correction table
//! - [`simc`]: Registry to CSV conversion
//! - [`osm`]: Streaming street-name correction and verification
//! - [`checks`]: Anomaly and frequency checks over tag tables
//! - [`db`]: SQLite loader
//! - [`cli`]: Command-line interface

pub mod checks;
pub mod cli;
pub mod config;
pub mod corrections;
pub mod db;
pub mod error;
pub mod files;
pub mod osm;
pub mod simc;
pub mod types;
pub mod xml;

// Re-export commonly used items
pub use corrections::CorrectionTable;
pub use error::{Result, WranglerError};
pub use simc::{convert_registry, MissingFieldPolicy};
pub use types::{FeatureKind, FeatureRef, RegistryRecord, TagRow};
