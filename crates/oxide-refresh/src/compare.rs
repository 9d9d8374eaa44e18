//! Schema comparison.
//!
//! Compares the columns of an existing relation against the columns a
//! pending query projects, by name only. Names match case-insensitively and
//! the match test ignores order; the derived add/drop lists keep the order
//! of the side they come from.

use std::collections::HashSet;

use serde::Serialize;

use crate::column::Column;
use crate::synth::synthesize;

/// A column the query projects that the existing relation lacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnAddition {
    /// The column as reported for the query.
    pub column: Column,
    /// Type definition for the `ADD COLUMN` clause.
    pub definition: String,
}

impl ColumnAddition {
    /// Creates an addition, synthesizing its type definition.
    #[must_use]
    pub fn new(column: Column) -> Self {
        let definition = synthesize(&column);
        Self { column, definition }
    }

    /// Returns the column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.column.name
    }
}

/// Structural difference between an existing relation and a query.
///
/// Produced by [`compare`]; the add/drop lists are derived from the two
/// snapshots and are empty whenever [`columns_match`](Self::columns_match)
/// is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaDiff {
    columns_match: bool,
    existing_columns: Vec<Column>,
    model_columns: Vec<Column>,
    columns_to_add: Vec<ColumnAddition>,
    columns_to_drop: Vec<String>,
}

impl SchemaDiff {
    /// Returns true if both sides carry the same set of column names.
    #[must_use]
    pub fn columns_match(&self) -> bool {
        self.columns_match
    }

    /// Columns of the existing relation, in physical order.
    #[must_use]
    pub fn existing_columns(&self) -> &[Column] {
        &self.existing_columns
    }

    /// Columns the query projects, in projection order.
    #[must_use]
    pub fn model_columns(&self) -> &[Column] {
        &self.model_columns
    }

    /// Columns to add, in projection order.
    #[must_use]
    pub fn columns_to_add(&self) -> &[ColumnAddition] {
        &self.columns_to_add
    }

    /// Names of columns to drop, in physical order.
    #[must_use]
    pub fn columns_to_drop(&self) -> &[String] {
        &self.columns_to_drop
    }

    /// Returns true if every existing column would be dropped.
    #[must_use]
    pub fn drops_every_column(&self) -> bool {
        !self.existing_columns.is_empty()
            && self.columns_to_drop.len() == self.existing_columns.len()
    }

    /// Returns the column list a table holds after the diff is applied:
    /// surviving existing columns in physical order, then additions in
    /// projection order.
    ///
    /// When the columns already match this is the existing order.
    #[must_use]
    pub fn final_column_order(&self) -> Vec<String> {
        let dropped = name_set(self.columns_to_drop.iter().map(String::as_str));
        self.existing_columns
            .iter()
            .filter(|c| !dropped.contains(&c.name.to_ascii_lowercase()))
            .map(|c| c.name.clone())
            .chain(self.columns_to_add.iter().map(|a| a.column.name.clone()))
            .collect()
    }
}

fn name_set<'a>(names: impl Iterator<Item = &'a str>) -> HashSet<String> {
    names.map(str::to_ascii_lowercase).collect()
}

/// Compares an existing relation's columns to a query's columns.
///
/// Names are folded with ASCII case rules only, the same rule as SQLite's
/// `NOCASE` collation; `Été` and `été` are different columns.
#[must_use]
pub fn compare(existing: &[Column], model: &[Column]) -> SchemaDiff {
    let existing_names = name_set(existing.iter().map(|c| c.name.as_str()));
    let model_names = name_set(model.iter().map(|c| c.name.as_str()));
    let columns_match = existing_names == model_names;

    let (columns_to_add, columns_to_drop) = if columns_match {
        (Vec::new(), Vec::new())
    } else {
        let to_add = model
            .iter()
            .filter(|c| !existing_names.contains(&c.name.to_ascii_lowercase()))
            .cloned()
            .map(ColumnAddition::new)
            .collect();
        let to_drop = existing
            .iter()
            .filter(|c| !model_names.contains(&c.name.to_ascii_lowercase()))
            .map(|c| c.name.clone())
            .collect();
        (to_add, to_drop)
    };

    SchemaDiff {
        columns_match,
        existing_columns: existing.to_vec(),
        model_columns: model.to_vec(),
        columns_to_add,
        columns_to_drop,
    }
}
