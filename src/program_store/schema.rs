//! SQLite schema of the programs database.

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, SqlType, Table, VersionedSchema};

const PROGRAM_TABLE_NAME: &str = "program";

/// `id` is AUTOINCREMENT so ids of deleted programs are never handed out again.
const PROGRAM_TABLE: Table = Table {
    name: PROGRAM_TABLE_NAME,
    columns: &[
        sqlite_column!(
            "id",
            SqlType::Integer,
            is_primary_key = true,
            auto_increment = true
        ),
        sqlite_column!("title", SqlType::Text, non_null = true),
        sqlite_column!("synopsis", SqlType::Text, non_null = true),
        sqlite_column!("poster", SqlType::Text, non_null = true),
        sqlite_column!("country", SqlType::Text, non_null = true),
        sqlite_column!("year", SqlType::Integer, non_null = true),
        sqlite_column!("category_id", SqlType::Integer),
    ],
    indices: &[],
};

pub const PROGRAM_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[PROGRAM_TABLE],
    migration: None,
}];

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn latest_schema_creates_the_program_table() {
        let conn = Connection::open_in_memory().unwrap();
        let latest = PROGRAM_VERSIONED_SCHEMAS.last().unwrap();

        latest.create(&conn).unwrap();

        let name: String = conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [PROGRAM_TABLE_NAME],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(name, PROGRAM_TABLE_NAME);
        latest.validate(&conn).unwrap();
    }
}
