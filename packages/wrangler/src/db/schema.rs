//! Table definitions for the map database.

/// One table and the CSV file it is loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    pub name: &'static str,
    pub csv_file: &'static str,

    /// Columns in insertion order; CSV columns are matched by these names.
    pub columns: &'static [&'static str],

    pub create_sql: &'static str,
}

impl TableSpec {
    /// `INSERT` statement with one positional parameter per column.
    #[must_use]
    pub fn insert_sql(&self) -> String {
        let placeholders = vec!["?"; self.columns.len()].join(", ");
        format!(
            "INSERT INTO {}({}) VALUES ({placeholders})",
            self.name,
            self.columns.join(", ")
        )
    }

    #[must_use]
    pub fn drop_sql(&self) -> String {
        format!("DROP TABLE IF EXISTS {}", self.name)
    }
}

/// All tables, in load order.
pub const TABLES: &[TableSpec] = &[
    TableSpec {
        name: "nodes",
        csv_file: "nodes.csv",
        columns: &["id", "lat", "lon", "user", "uid", "version", "changeset", "timestamp"],
        create_sql: "CREATE TABLE nodes (
            id INTEGER PRIMARY KEY NOT NULL,
            lat REAL,
            lon REAL,
            user TEXT,
            uid INTEGER,
            version INTEGER,
            changeset INTEGER,
            timestamp TEXT
        )",
    },
    TableSpec {
        name: "nodes_tags",
        csv_file: "nodes_tags.csv",
        columns: &["id", "key", "value", "type"],
        create_sql: "CREATE TABLE nodes_tags (
            id INTEGER,
            key TEXT,
            value TEXT,
            type TEXT,
            FOREIGN KEY (id) REFERENCES nodes(id)
        )",
    },
    TableSpec {
        name: "ways",
        csv_file: "ways.csv",
        columns: &["id", "user", "uid", "version", "changeset", "timestamp"],
        create_sql: "CREATE TABLE ways (
            id INTEGER PRIMARY KEY NOT NULL,
            user TEXT,
            uid INTEGER,
            version TEXT,
            changeset INTEGER,
            timestamp TEXT
        )",
    },
    TableSpec {
        name: "ways_tags",
        csv_file: "ways_tags.csv",
        columns: &["id", "key", "value", "type"],
        create_sql: "CREATE TABLE ways_tags (
            id INTEGER NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            type TEXT,
            FOREIGN KEY (id) REFERENCES ways(id)
        )",
    },
    TableSpec {
        name: "ways_nodes",
        csv_file: "ways_nodes.csv",
        columns: &["id", "node_id", "position"],
        create_sql: "CREATE TABLE ways_nodes (
            id INTEGER NOT NULL,
            node_id INTEGER NOT NULL,
            position INTEGER NOT NULL,
            FOREIGN KEY (id) REFERENCES ways(id),
            FOREIGN KEY (node_id) REFERENCES nodes(id)
        )",
    },
    TableSpec {
        name: "simc",
        csv_file: "simc.csv",
        columns: &["name", "sym", "sympod"],
        create_sql: "CREATE TABLE simc (
            name TEXT NOT NULL,
            sym INTEGER NOT NULL,
            sympod INTEGER NOT NULL
        )",
    },
];
