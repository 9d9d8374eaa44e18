//! Refresh strategy selection.

use std::fmt;

use serde::Serialize;

use crate::compare::SchemaDiff;
use crate::dialect::RefreshDialect;

/// How a target relation is brought up to date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RefreshStrategy {
    /// The target does not exist yet: create it from the query.
    Create,
    /// Same columns: empty the table and insert the query's rows.
    TruncateInsert,
    /// Columns drifted: empty the table, drop and add columns, insert.
    AlterInPlace,
    /// Columns drifted beyond what the store can alter: rebuild the table.
    DropRecreate,
}

impl RefreshStrategy {
    /// Returns true if this strategy keeps the target's physical identity.
    #[must_use]
    pub fn preserves_identity(self) -> bool {
        matches!(self, Self::TruncateInsert | Self::AlterInPlace)
    }
}

impl fmt::Display for RefreshStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::TruncateInsert => "truncate-insert",
            Self::AlterInPlace => "alter-in-place",
            Self::DropRecreate => "drop-recreate",
        })
    }
}

/// Picks the strategy for one refresh attempt.
///
/// `table_exists` is false both when the target is missing and when it
/// exists as something other than a table.
#[must_use]
pub fn select_strategy(
    table_exists: bool,
    diff: &SchemaDiff,
    dialect: &dyn RefreshDialect,
) -> RefreshStrategy {
    if !table_exists {
        return RefreshStrategy::Create;
    }
    if diff.columns_match() {
        return RefreshStrategy::TruncateInsert;
    }
    let can_alter = dialect.supports_column_alter()
        && (dialect.supports_dropping_every_column() || !diff.drops_every_column());
    if can_alter {
        RefreshStrategy::AlterInPlace
    } else {
        RefreshStrategy::DropRecreate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;
    use crate::compare::compare;
    use crate::dialect::{GenericDialect, SqliteDialect};

    struct NoAlterDialect;

    impl RefreshDialect for NoAlterDialect {
        fn name(&self) -> &'static str {
            "no-alter"
        }

        fn supports_column_alter(&self) -> bool {
            false
        }
    }

    fn cols(names: &[&str]) -> Vec<Column> {
        names.iter().map(|n| Column::new(*n, "INTEGER")).collect()
    }

    #[test]
    fn test_missing_table_creates() {
        let diff = compare(&[], &cols(&["id"]));
        assert_eq!(
            select_strategy(false, &diff, &GenericDialect::new()),
            RefreshStrategy::Create
        );
    }

    #[test]
    fn test_matching_columns_truncate_insert() {
        let diff = compare(&cols(&["id", "name"]), &cols(&["name", "id"]));
        assert_eq!(
            select_strategy(true, &diff, &GenericDialect::new()),
            RefreshStrategy::TruncateInsert
        );
    }

    #[test]
    fn test_drift_alters_in_place() {
        let diff = compare(&cols(&["id"]), &cols(&["id", "name"]));
        assert_eq!(
            select_strategy(true, &diff, &GenericDialect::new()),
            RefreshStrategy::AlterInPlace
        );
    }

    #[test]
    fn test_drift_without_alter_support_recreates() {
        let diff = compare(&cols(&["id"]), &cols(&["id", "name"]));
        assert_eq!(
            select_strategy(true, &diff, &NoAlterDialect),
            RefreshStrategy::DropRecreate
        );
    }

    #[test]
    fn test_disjoint_columns_depend_on_store() {
        let diff = compare(&cols(&["a", "b"]), &cols(&["c"]));
        assert_eq!(
            select_strategy(true, &diff, &GenericDialect::new()),
            RefreshStrategy::AlterInPlace
        );
        assert_eq!(
            select_strategy(true, &diff, &SqliteDialect::new()),
            RefreshStrategy::DropRecreate
        );
    }

    #[test]
    fn test_identity_preservation() {
        assert!(RefreshStrategy::TruncateInsert.preserves_identity());
        assert!(RefreshStrategy::AlterInPlace.preserves_identity());
        assert!(!RefreshStrategy::Create.preserves_identity());
        assert!(!RefreshStrategy::DropRecreate.preserves_identity());
    }
}
