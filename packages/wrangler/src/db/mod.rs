//! SQLite database built from the CSV extracts.

mod loader;
mod schema;

pub use loader::{count_rows, load_database, load_table, reset_schema, LoadReport};
pub use schema::{TableSpec, TABLES};
