//! `SQLite` schema definitions for the record store.
//!
//! The store is a local key-value table: the whole record list lives as
//! JSON text under one key, the in-progress draft index under another.

/// SQL statement to create the key-value table.
pub const CREATE_KV_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_KV_TABLE];

/// Key holding the JSON-encoded ordered record list.
pub const RECORDS_KEY: &str = "records";

/// Key holding the text-encoded draft index; absent when no flow is in
/// progress.
pub const DRAFT_INDEX_KEY: &str = "draft_index";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_not_empty() {
        assert!(!SCHEMA_STATEMENTS.is_empty());
        for stmt in SCHEMA_STATEMENTS {
            assert!(!stmt.is_empty());
        }
    }

    #[test]
    fn test_kv_table_structure() {
        assert!(CREATE_KV_TABLE.contains("key TEXT PRIMARY KEY"));
        assert!(CREATE_KV_TABLE.contains("value TEXT NOT NULL"));
    }

    #[test]
    fn test_keys_are_distinct() {
        assert_ne!(RECORDS_KEY, DRAFT_INDEX_KEY);
    }
}
