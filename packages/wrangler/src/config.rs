//! Configuration constants and input resolution for the wrangler tools.

use std::path::{Path, PathBuf};

use crate::error::{Result, WranglerError};

/// Environment variable naming the directory that holds the data files.
pub const DATA_DIR_ENV: &str = "MAPDATA_DIR";

/// Registry XML file (TERYT SIMC export).
pub const SIMC_XML: &str = "SIMC.xml";

/// Registry table produced by the converter.
pub const SIMC_CSV: &str = "simc.csv";

/// OSM extract fed to the tag-corrector.
pub const OSM_INPUT: &str = "w.osm";

/// Corrected OSM extract.
pub const OSM_OUTPUT: &str = "new_w.osm";

/// Way tag table, input of every CSV check.
pub const WAYS_TAGS_CSV: &str = "ways_tags.csv";

/// Output of the postcode substitution.
pub const WAYS_TAGS_CORRECTED_CSV: &str = "ways_tags_corrected.csv";

/// SQLite database written by the loader.
pub const DATABASE_FILE: &str = "mydb.db";

/// `name` attribute of the registry field holding the place name.
pub const SIMC_NAME_LABEL: &str = "NAZWA";

/// `name` attribute of the registry field holding the place code.
pub const SIMC_SYM_LABEL: &str = "SYM";

/// `name` attribute of the registry field holding the parent place code.
pub const SIMC_SYMPOD_LABEL: &str = "SYMPOD";

/// Header of the registry table.
pub const SIMC_HEADER: [&str; 3] = ["name", "sym", "sympod"];

/// OSM tag key whose values the corrector rewrites.
pub const STREET_TAG_KEY: &str = "addr:street";

/// Tag CSV `key` column for street names (`addr:street` split on the colon).
pub const STREET_KEY: &str = "street";

/// Tag CSV `key` column for postcodes.
pub const POSTCODE_KEY: &str = "postcode";

/// Known-bad street names and their corrections.
pub const STREET_CORRECTIONS: &[(&str, &str)] = &[
    ("Zadumana 1A", "Zadumana"),
    ("Belwederska 20/22", "Belwederska"),
    ("Nowy Drzewicz 62", "Nowy Drzewicz"),
    ("Sokołowska 9/U31", "Sokołowska"),
    ("Nowoursynowska 154A", "Nowoursynowska"),
    ("Wiejska 1", "Wiejska"),
    ("Powstańców Warszawy 19", "Powstańców Warszawy"),
    ("Powstańców Warszawy 17", "Powstańców Warszawy"),
    ("Karczewska 14/16", "Karczewska"),
    ("Postępu 14", "Postępu"),
    (
        "Ireny Kosmowskiej - Grodzieńska 21/29",
        "Ireny Kosmowskiej - Grodzieńska",
    ),
];

/// Street names counted by default by the name counter.
pub const ODD_STREET_NAMES: &[&str] = &[
    "Powstańców Warszawy 19",
    "Powstańców Warszawy 17",
    "Karczewska 14/16",
    "Ireny Kosmowskiej - Grodzieńska 21/29",
];

/// Postcode found in the extract that belongs elsewhere.
pub const BAD_POSTCODE: &str = "91-065";

/// Replacement for [`BAD_POSTCODE`].
pub const FIXED_POSTCODE: &str = "01-532";

/// Non-Latin values must occur more often than this to be reported.
pub const NON_LATIN_THRESHOLD: u64 = 5;

/// Directory holding the data files.
///
/// Resolution order: explicit path, then `MAPDATA_DIR`, then the
/// current directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    /// Create a data directory rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the data directory from an optional override and the environment.
    pub fn resolve(explicit: Option<&Path>) -> Self {
        if let Some(path) = explicit {
            return Self::new(path);
        }

        let root = std::env::var(DATA_DIR_ENV)
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Self::new(root)
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of `file` inside the data directory.
    pub fn file(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }

    /// Use `explicit` when given, otherwise `default` inside the data directory.
    pub fn pick(&self, explicit: Option<PathBuf>, default: &str) -> PathBuf {
        explicit.unwrap_or_else(|| self.file(default))
    }
}

/// Fail with `FileNotFound` unless `path` is an existing file.
///
/// # Examples
/// ```
/// use mapdata_wrangler::config::require_file;
///
/// assert!(require_file(std::path::Path::new("does/not/exist.csv")).is_err());
/// ```
pub fn require_file(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(WranglerError::FileNotFound {
            path: path.to_path_buf(),
        })
    }
}
