//! Relation identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a relation in the store's catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    /// A persistent table.
    Table,
    /// A view.
    View,
}

impl RelationKind {
    /// Returns the SQL keyword for this kind.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Table => "TABLE",
            Self::View => "VIEW",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => f.write_str("table"),
            Self::View => f.write_str("view"),
        }
    }
}

/// What a transient staging view is used for.
///
/// Each purpose gets its own deterministic name so that the views of
/// different steps never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StagingPurpose {
    /// Column discovery for a pending query.
    Inspect,
    /// Source of a truncate/insert refresh.
    Insert,
    /// Source of an alter-in-place refresh.
    Alter,
    /// Leftover of a create-table-as-select.
    Create,
}

impl StagingPurpose {
    /// Returns the identifier suffix for this purpose.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Inspect => "__inspect_vw",
            Self::Insert => "__insert_vw",
            Self::Alter => "__alter_vw",
            Self::Create => "__create_vw",
        }
    }
}

/// Fully qualified name of a relation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationName {
    /// Database (catalog) name. Empty when the store has a single database.
    pub database: String,
    /// Schema name.
    pub schema: String,
    /// Relation identifier within the schema.
    pub identifier: String,
}

impl RelationName {
    /// Creates a relation name.
    #[must_use]
    pub fn new(
        database: impl Into<String>,
        schema: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        Self {
            database: database.into(),
            schema: schema.into(),
            identifier: identifier.into(),
        }
    }

    /// Returns the name of the staging view for `purpose`, in the same
    /// database and schema.
    #[must_use]
    pub fn staging(&self, purpose: StagingPurpose) -> Self {
        Self {
            database: self.database.clone(),
            schema: self.schema.clone(),
            identifier: format!("{}{}", self.identifier, purpose.suffix()),
        }
    }
}

impl fmt::Display for RelationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in [&self.database, &self.schema] {
            if !part.is_empty() {
                write!(f, "{part}.")?;
            }
        }
        f.write_str(&self.identifier)
    }
}

/// A relation as found in the store's catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    /// The relation's name.
    pub name: RelationName,
    /// Table or view.
    pub kind: RelationKind,
    /// Store-specific token for the relation's physical storage, if the
    /// store exposes one.
    pub location: Option<String>,
}

impl Relation {
    /// Returns true if this relation is a table.
    #[must_use]
    pub fn is_table(&self) -> bool {
        self.kind == RelationKind::Table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staging_names_are_distinct() {
        let target = RelationName::new("", "main", "orders");
        let insert = target.staging(StagingPurpose::Insert);
        let alter = target.staging(StagingPurpose::Alter);
        assert_eq!(insert.identifier, "orders__insert_vw");
        assert_eq!(alter.identifier, "orders__alter_vw");
        assert_eq!(insert.schema, "main");
        assert_ne!(insert, alter);
    }

    #[test]
    fn test_display_skips_empty_parts() {
        assert_eq!(RelationName::new("", "main", "t").to_string(), "main.t");
        assert_eq!(RelationName::new("wh", "dbo", "t").to_string(), "wh.dbo.t");
        assert_eq!(RelationName::new("", "", "t").to_string(), "t");
    }
}
