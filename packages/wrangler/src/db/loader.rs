//! Bulk loading of the CSV extracts into SQLite.

use std::io::Read;
use std::path::Path;

use rusqlite::{params_from_iter, Connection};

use super::schema::{TableSpec, TABLES};
use crate::config::{require_file, DataDir};
use crate::error::{Result, WranglerError};
use crate::files::open_input;

/// Rows loaded per table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub tables: Vec<(&'static str, u64)>,
}

impl LoadReport {
    /// Rows loaded into `table`, if it was loaded.
    #[must_use]
    pub fn rows(&self, table: &str) -> Option<u64> {
        self.tables
            .iter()
            .find(|(name, _)| *name == table)
            .map(|(_, rows)| *rows)
    }

    #[must_use]
    pub fn total_rows(&self) -> u64 {
        self.tables.iter().map(|(_, rows)| rows).sum()
    }
}

/// Drop and recreate every table.
pub fn reset_schema(conn: &Connection) -> Result<()> {
    for spec in TABLES.iter().rev() {
        conn.execute(&spec.drop_sql(), [])?;
    }
    for spec in TABLES {
        conn.execute(spec.create_sql, [])?;
    }
    Ok(())
}

/// Insert every row of a CSV table into `spec`'s table.
///
/// CSV columns are matched to table columns by header name. All rows are
/// inserted in one transaction, committed at the end.
///
/// # Returns
/// Number of rows inserted
pub fn load_table<R: Read>(conn: &mut Connection, spec: &TableSpec, input: R) -> Result<u64> {
    let mut reader = csv::Reader::from_reader(input);
    let headers = reader
        .headers()
        .map_err(|e| WranglerError::from_csv(e, spec.csv_file))?
        .clone();

    let indices = spec
        .columns
        .iter()
        .map(|column| {
            headers.iter().position(|h| h == *column).ok_or_else(|| {
                WranglerError::malformed(spec.csv_file, format!("missing column {column}"))
            })
        })
        .collect::<Result<Vec<usize>>>()?;

    let tx = conn.transaction()?;
    let mut count = 0;
    {
        let mut stmt = tx.prepare(&spec.insert_sql())?;
        for record in reader.records() {
            let record = record.map_err(|e| WranglerError::from_csv(e, spec.csv_file))?;
            let values = indices.iter().map(|&i| record.get(i).unwrap_or_default());

            stmt.execute(params_from_iter(values))
                .map_err(|source| WranglerError::Insert {
                    table: spec.name.to_string(),
                    line: record.position().map(|p| p.line()).unwrap_or_default(),
                    source,
                })?;
            count += 1;
        }
    }
    tx.commit()?;

    tracing::info!(table = spec.name, rows = count, "table loaded");
    Ok(count)
}

/// Rebuild the database at `db_path` from the CSV files in `data`.
///
/// All six CSV files must exist; this is checked before the database is
/// touched.
pub fn load_database(db_path: &Path, data: &DataDir) -> Result<LoadReport> {
    for spec in TABLES {
        require_file(&data.file(spec.csv_file))?;
    }

    let mut conn = Connection::open(db_path)?;
    reset_schema(&conn)?;

    let mut report = LoadReport::default();
    for spec in TABLES {
        let input = open_input(&data.file(spec.csv_file))?;
        let rows = load_table(&mut conn, spec, input)?;
        report.tables.push((spec.name, rows));
    }

    tracing::info!(
        database = %db_path.display(),
        rows = report.total_rows(),
        "database loaded"
    );
    Ok(report)
}

/// Number of rows currently in `table`.
pub fn count_rows(conn: &Connection, table: &str) -> Result<u64> {
    let spec = TABLES
        .iter()
        .find(|t| t.name == table)
        .ok_or_else(|| WranglerError::malformed("database", format!("unknown table {table}")))?;
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", spec.name), [], |row| {
        row.get(0)
    })?;
    Ok(u64::try_from(count).unwrap_or_default())
}
