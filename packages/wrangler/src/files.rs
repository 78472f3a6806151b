//! Input and output file handling.
//!
//! Inputs are checked for existence up front so a missing file surfaces as
//! `FileNotFound` rather than a bare IO error.
//!
//! Every tool writes its result through [`write_atomically`]: content goes
//! to a hidden temp file next to the target, which is synced and then
//! renamed over the target. A failed run leaves the previous output
//! untouched.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::require_file;
use crate::error::Result;

/// Open an existing input file for buffered reading.
pub fn open_input(path: &Path) -> Result<BufReader<File>> {
    require_file(path)?;
    Ok(BufReader::new(File::open(path)?))
}

/// Temp file used while writing `path`.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_default());
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `path` through a temp file and rename it into place.
///
/// # Arguments
/// * `path` - Final output path; its parent directory must exist
/// * `write` - Callback producing the content
///
/// # Returns
/// Whatever `write` returns
pub fn write_atomically<T>(
    path: &Path,
    write: impl FnOnce(&mut BufWriter<File>) -> Result<T>,
) -> Result<T> {
    let temp_file = temp_path(path);

    let result = (|| -> Result<T> {
        let mut out = BufWriter::new(File::create(&temp_file)?);
        let value = write(&mut out)?;
        out.flush()?;
        out.get_ref().sync_all()?;
        Ok(value)
    })();

    let value = match result {
        Ok(value) => value,
        Err(e) => {
            let _ = fs::remove_file(&temp_file);
            return Err(e);
        }
    };

    // On Windows, rename fails if the destination already exists
    #[cfg(target_os = "windows")]
    if path.exists() {
        fs::remove_file(path)?;
    }

    fs::rename(&temp_file, path)?;
    tracing::debug!(path = %path.display(), "output written");

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WranglerError;
    use tempfile::tempdir;

    #[test]
    fn test_open_input_missing() {
        let err = open_input(Path::new("missing/ways_tags.csv")).unwrap_err();
        assert!(matches!(err, WranglerError::FileNotFound { .. }));
    }

    #[test]
    fn test_temp_path_is_hidden_sibling() {
        let temp = temp_path(Path::new("/data/simc.csv"));
        assert_eq!(temp, PathBuf::from("/data/.simc.csv.tmp"));
    }

    #[test]
    fn test_write_atomically() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("out.csv");

        let written = write_atomically(&target, |w| {
            w.write_all(b"name,sym,sympod\n")?;
            Ok(16)
        })
        .unwrap();

        assert_eq!(written, 16);
        assert_eq!(fs::read_to_string(&target).unwrap(), "name,sym,sympod\n");
        assert!(!temp_path(&target).exists());
    }

    #[test]
    fn test_failed_write_keeps_previous_output() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("out.csv");
        fs::write(&target, "old").unwrap();

        let result: Result<()> = write_atomically(&target, |w| {
            w.write_all(b"partial")?;
            Err(WranglerError::malformed("row 2", "missing column"))
        });

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&target).unwrap(), "old");
        assert!(!temp_path(&target).exists());
    }
}
