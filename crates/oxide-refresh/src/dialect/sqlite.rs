//! SQLite dialect for refreshes.
//!
//! SQLite names relations as `schema.table` (the database is the file),
//! has no `TRUNCATE` and cannot drop the last remaining column of a table.
//! `ADD COLUMN` and `DROP COLUMN` (3.35.0+) keep the table's b-tree, so
//! its root page survives both.

use crate::relation::RelationName;

use super::RefreshDialect;

/// SQLite refresh dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl SqliteDialect {
    /// Creates a new SQLite dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl RefreshDialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn supports_column_alter(&self) -> bool {
        true
    }

    fn supports_dropping_every_column(&self) -> bool {
        false
    }

    fn relation_sql(&self, name: &RelationName) -> String {
        if name.schema.is_empty() {
            self.quote_identifier(&name.identifier)
        } else {
            format!(
                "{}.{}",
                self.quote_identifier(&name.schema),
                self.quote_identifier(&name.identifier)
            )
        }
    }

    fn truncate(&self, target: &RelationName) -> String {
        // An unqualified DELETE takes SQLite's truncate optimization.
        format!("DELETE FROM {}", self.relation_sql(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::RelationKind;

    fn dialect() -> SqliteDialect {
        SqliteDialect::new()
    }

    fn target() -> RelationName {
        RelationName::new("ignored", "main", "orders")
    }

    #[test]
    fn test_relation_ignores_database() {
        assert_eq!(dialect().relation_sql(&target()), "\"main\".\"orders\"");
        assert_eq!(
            dialect().relation_sql(&RelationName::new("", "", "orders")),
            "\"orders\""
        );
    }

    #[test]
    fn test_create_table_as() {
        assert_eq!(
            dialect().create_table_as(&target(), "SELECT 1 AS id"),
            "CREATE TABLE \"main\".\"orders\" AS SELECT 1 AS id"
        );
    }

    #[test]
    fn test_truncate_uses_delete() {
        assert_eq!(dialect().truncate(&target()), "DELETE FROM \"main\".\"orders\"");
    }

    #[test]
    fn test_add_and_drop_column() {
        assert_eq!(
            dialect().add_column(&target(), "created_at", "VARCHAR(8000)"),
            "ALTER TABLE \"main\".\"orders\" ADD COLUMN \"created_at\" VARCHAR(8000)"
        );
        assert_eq!(
            dialect().drop_column(&target(), "legacy_flag"),
            "ALTER TABLE \"main\".\"orders\" DROP COLUMN \"legacy_flag\""
        );
    }

    #[test]
    fn test_insert_select_uses_explicit_columns() {
        let view = target().staging(crate::relation::StagingPurpose::Insert);
        let sql = dialect().insert_select(&target(), &["id".into(), "name".into()], &view);
        assert_eq!(
            sql,
            "INSERT INTO \"main\".\"orders\" (\"id\", \"name\") \
             SELECT \"id\", \"name\" FROM \"main\".\"orders__insert_vw\""
        );
    }

    #[test]
    fn test_drop_table() {
        assert_eq!(
            dialect().drop_relation(&target(), RelationKind::Table),
            "DROP TABLE IF EXISTS \"main\".\"orders\""
        );
    }

    #[test]
    fn test_capabilities() {
        assert_eq!(dialect().name(), "sqlite");
        assert!(dialect().supports_column_alter());
        assert!(!dialect().supports_dropping_every_column());
    }
}
