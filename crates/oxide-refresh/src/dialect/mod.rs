//! Database dialect implementations.
//!
//! Each dialect knows how to spell the statements a refresh issues for its
//! store, and which incremental column changes the store can perform.
//! Identifiers are quoted here and nowhere else.

mod generic;
mod sqlite;

pub use generic::GenericDialect;
pub use sqlite::SqliteDialect;

use crate::error::{RefreshError, Result};
use crate::relation::{RelationKind, RelationName};

/// Trait for store-specific statement generation.
pub trait RefreshDialect: Send + Sync {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Returns whether the store can add and drop columns of an existing
    /// table in place.
    fn supports_column_alter(&self) -> bool;

    /// Returns whether the store can drop every column of a table before
    /// new ones are added.
    fn supports_dropping_every_column(&self) -> bool {
        true
    }

    /// Quote an identifier (table name, column name, etc.).
    fn quote_identifier(&self, name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    /// Returns the qualified, quoted name of a relation.
    fn relation_sql(&self, name: &RelationName) -> String {
        [&name.database, &name.schema, &name.identifier]
            .into_iter()
            .filter(|part| !part.is_empty())
            .map(|part| self.quote_identifier(part))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Returns a comma-separated list of quoted column names.
    fn column_list(&self, columns: &[String]) -> String {
        columns
            .iter()
            .map(|c| self.quote_identifier(c))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Generates SQL creating a table from a query.
    fn create_table_as(&self, target: &RelationName, query: &str) -> String {
        format!("CREATE TABLE {} AS {}", self.relation_sql(target), query)
    }

    /// Generates SQL creating a view over a query.
    fn create_view(&self, view: &RelationName, query: &str) -> String {
        format!("CREATE VIEW {} AS {}", self.relation_sql(view), query)
    }

    /// Generates SQL dropping a relation if it exists.
    fn drop_relation(&self, name: &RelationName, kind: RelationKind) -> String {
        format!("DROP {} IF EXISTS {}", kind.keyword(), self.relation_sql(name))
    }

    /// Generates SQL removing every row of a table.
    fn truncate(&self, target: &RelationName) -> String {
        format!("TRUNCATE TABLE {}", self.relation_sql(target))
    }

    /// Generates SQL adding a column.
    fn add_column(&self, target: &RelationName, column: &str, definition: &str) -> String {
        format!(
            "ALTER TABLE {} ADD COLUMN {} {}",
            self.relation_sql(target),
            self.quote_identifier(column),
            definition
        )
    }

    /// Generates SQL dropping a column.
    fn drop_column(&self, target: &RelationName, column: &str) -> String {
        format!(
            "ALTER TABLE {} DROP COLUMN {}",
            self.relation_sql(target),
            self.quote_identifier(column)
        )
    }

    /// Generates SQL copying rows from `source` into `target`, naming the
    /// same columns on both sides.
    fn insert_select(
        &self,
        target: &RelationName,
        columns: &[String],
        source: &RelationName,
    ) -> String {
        let list = self.column_list(columns);
        format!(
            "INSERT INTO {} ({}) SELECT {} FROM {}",
            self.relation_sql(target),
            list,
            list,
            self.relation_sql(source)
        )
    }
}

/// Checks that every part of a relation name can be quoted.
pub fn validate_name(name: &RelationName) -> Result<()> {
    if name.identifier.trim().is_empty() {
        return Err(RefreshError::InvalidIdentifier(name.identifier.clone()));
    }
    for part in [&name.database, &name.schema, &name.identifier] {
        if part.contains('\0') {
            return Err(RefreshError::InvalidIdentifier(part.clone()));
        }
    }
    Ok(())
}
