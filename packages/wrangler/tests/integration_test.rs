//! End-to-end tests for the wrangling pipeline.
//!
//! Runs every pass over the Warsaw fixtures: registry conversion, street
//! correction and verification, the tag table checks, and the database load.

use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use rusqlite::Connection;

use mapdata_wrangler::checks::{
    check_postcodes, count_street_names, find_non_latin, find_numbered_streets,
    substitute_field_file,
};
use mapdata_wrangler::config::{DataDir, ODD_STREET_NAMES, SIMC_XML};
use mapdata_wrangler::db::{count_rows, load_database, TABLES};
use mapdata_wrangler::files::open_input;
use mapdata_wrangler::osm::{correct_streets_file, verify_streets_file};
use mapdata_wrangler::{convert_registry, CorrectionTable, MissingFieldPolicy, WranglerError};

fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("warsaw")
}

fn fixture(name: &str) -> PathBuf {
    fixture_dir().join(name)
}

/// Copy every fixture into a fresh temp directory.
fn scratch_data_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for entry in fs::read_dir(fixture_dir()).unwrap() {
        let entry = entry.unwrap();
        fs::copy(entry.path(), dir.path().join(entry.file_name())).unwrap();
    }
    dir
}

#[test]
fn test_registry_fixture_to_csv() {
    let temp = tempfile::tempdir().unwrap();
    let output = temp.path().join("simc.csv");

    let rows = convert_registry(&fixture(SIMC_XML), &output, MissingFieldPolicy::Reject).unwrap();

    assert_eq!(rows, 3);
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        fs::read_to_string(fixture("simc.csv")).unwrap()
    );
}

#[test]
fn test_registry_missing_input() {
    let temp = tempfile::tempdir().unwrap();
    let output = temp.path().join("simc.csv");

    let err = convert_registry(
        &temp.path().join("SIMC.xml"),
        &output,
        MissingFieldPolicy::Reject,
    )
    .unwrap_err();

    assert!(matches!(err, WranglerError::FileNotFound { .. }), "{err}");
    assert!(!output.exists());
}

#[test]
fn test_correct_then_verify() {
    let temp = tempfile::tempdir().unwrap();
    let output = temp.path().join("new_w.osm");
    let table = CorrectionTable::default();

    // The raw extract still has stale names
    let before = verify_streets_file(&fixture("w.osm"), &table).unwrap();
    assert_eq!(before.stale.len(), 2);

    let report = correct_streets_file(&fixture("w.osm"), &output, &table).unwrap();

    let applied: Vec<(String, &str, &str)> = report
        .corrections
        .iter()
        .map(|c| (c.feature.to_string(), c.from.as_str(), c.to.as_str()))
        .collect();
    assert_eq!(
        applied,
        vec![
            ("node 101".to_string(), "Wiejska 1", "Wiejska"),
            (
                "way 201".to_string(),
                "Powstańców Warszawy 19",
                "Powstańców Warszawy"
            ),
        ]
    );
    assert_eq!(report.street_tags, 3);

    let after = verify_streets_file(&output, &table).unwrap();
    assert!(after.is_clean(), "{:?}", after.stale);
    assert_eq!(after.street_tags, 3);
}

#[test]
fn test_correction_keeps_the_rest_of_the_document() {
    let temp = tempfile::tempdir().unwrap();
    let output = temp.path().join("new_w.osm");

    correct_streets_file(&fixture("w.osm"), &output, &CorrectionTable::default()).unwrap();

    let original = fs::read_to_string(fixture("w.osm")).unwrap();
    let corrected = fs::read_to_string(&output).unwrap();

    assert_eq!(corrected.lines().count(), original.lines().count());
    assert_eq!(
        corrected,
        original
            .replace(r#"v="Wiejska 1""#, r#"v="Wiejska""#)
            .replace(
                r#"v="Powstańców Warszawy 19""#,
                r#"v="Powstańców Warszawy""#
            )
    );
    // Relations are not features; their street tags are left alone
    assert!(corrected.contains(r#"<tag k="addr:street" v="Zadumana 1A"/>"#));
}

#[test]
fn test_correction_is_idempotent() {
    let temp = tempfile::tempdir().unwrap();
    let first = temp.path().join("first.osm");
    let second = temp.path().join("second.osm");
    let table = CorrectionTable::default();

    correct_streets_file(&fixture("w.osm"), &first, &table).unwrap();
    let report = correct_streets_file(&first, &second, &table).unwrap();

    assert!(report.corrections.is_empty());
    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn test_correct_in_place() {
    let dir = scratch_data_dir();
    let path = dir.path().join("w.osm");

    let report = correct_streets_file(&path, &path, &CorrectionTable::default()).unwrap();

    assert_eq!(report.corrections.len(), 2);
    assert!(verify_streets_file(&path, &CorrectionTable::default())
        .unwrap()
        .is_clean());
}

#[test]
fn test_tag_table_checks() {
    let tags = fixture("ways_tags.csv");

    let streets = find_numbered_streets(open_input(&tags).unwrap()).unwrap();
    let streets: Vec<&str> = streets.iter().map(String::as_str).collect();
    assert_eq!(streets, vec!["Karczewska 14/16", "Powstańców Warszawy 19"]);

    let postcodes = check_postcodes(open_input(&tags).unwrap()).unwrap();
    let deviant: Vec<&str> = postcodes.deviant_prefix.iter().map(String::as_str).collect();
    let malformed: Vec<&str> = postcodes.malformed.iter().map(String::as_str).collect();
    assert_eq!(deviant, vec!["2-512", "91-065"]);
    assert_eq!(malformed, vec!["2-512"]);

    let counts = count_street_names(open_input(&tags).unwrap(), ODD_STREET_NAMES).unwrap();
    assert_eq!(counts.get("Powstańców Warszawy 19"), Some(1));
    assert_eq!(counts.get("Karczewska 14/16"), Some(1));
    assert_eq!(counts.get("Powstańców Warszawy 17"), Some(0));

    let scripts = find_non_latin(open_input(&tags).unwrap(), 0).unwrap();
    assert_eq!(scripts.frequent, vec![("Варшава".to_string(), 1)]);
}

#[test]
fn test_fix_postcode_then_recheck() {
    let temp = tempfile::tempdir().unwrap();
    let output = temp.path().join("ways_tags_corrected.csv");

    let replaced =
        substitute_field_file(&fixture("ways_tags.csv"), &output, "91-065", "01-532").unwrap();
    assert_eq!(replaced, 1);

    let report = check_postcodes(open_input(&output).unwrap()).unwrap();
    assert!(!report.deviant_prefix.contains("91-065"));

    let content = fs::read_to_string(&output).unwrap();
    assert!(content.starts_with("id,key,value,type\n"));
    assert!(content.contains("201,postcode,01-532,addr\n"));
}

#[test]
fn test_load_database() {
    let dir = scratch_data_dir();
    let db_path = dir.path().join("mydb.db");
    let data = DataDir::new(dir.path());

    let report = load_database(&db_path, &data).unwrap();

    assert_eq!(report.tables.len(), TABLES.len());
    assert_eq!(report.rows("nodes"), Some(2));
    assert_eq!(report.rows("ways_tags"), Some(8));
    assert_eq!(report.rows("ways_nodes"), Some(3));
    assert_eq!(report.rows("simc"), Some(3));

    let conn = Connection::open(&db_path).unwrap();
    assert_eq!(count_rows(&conn, "ways").unwrap(), 2);

    let name: String = conn
        .query_row("SELECT name FROM simc WHERE sym = 918153", [], |r| r.get(0))
        .unwrap();
    assert_eq!(name, "Mokotów");
}

#[test]
fn test_load_database_twice_replaces_tables() {
    let dir = scratch_data_dir();
    let db_path = dir.path().join("mydb.db");
    let data = DataDir::new(dir.path());

    load_database(&db_path, &data).unwrap();
    let report = load_database(&db_path, &data).unwrap();

    assert_eq!(report.rows("nodes"), Some(2));
    let conn = Connection::open(&db_path).unwrap();
    assert_eq!(count_rows(&conn, "nodes").unwrap(), 2);
}

#[test]
fn test_load_database_requires_every_file() {
    let dir = scratch_data_dir();
    fs::remove_file(dir.path().join("ways_nodes.csv")).unwrap();
    let db_path = dir.path().join("mydb.db");

    let err = load_database(&db_path, &DataDir::new(dir.path())).unwrap_err();

    assert!(matches!(err, WranglerError::FileNotFound { .. }), "{err}");
    assert!(!db_path.exists());
}
