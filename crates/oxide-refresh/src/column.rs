//! Column model.
//!
//! A [`Column`] describes one column of a relation as reported by the
//! store's catalog: its name and the facets of its physical type. Columns
//! are produced fresh on every inspection and never mutated afterwards.

use serde::{Deserialize, Serialize};

/// One column of a relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Base type name (e.g. `VARCHAR`, `DECIMAL`), if the store reports one.
    pub data_type: Option<String>,
    /// Maximum character length for character types.
    pub char_size: Option<u32>,
    /// Precision for numeric and floating point types.
    pub numeric_precision: Option<u32>,
    /// Scale for numeric types, or fractional-second digits for temporal
    /// types.
    pub numeric_scale: Option<u32>,
}

impl Column {
    /// Creates a column with the given base type and no size facets.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        let data_type = data_type.into();
        Self {
            name: name.into(),
            data_type: (!data_type.trim().is_empty()).then_some(data_type),
            char_size: None,
            numeric_precision: None,
            numeric_scale: None,
        }
    }

    /// Creates a column whose type is unknown.
    #[must_use]
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: None,
            char_size: None,
            numeric_precision: None,
            numeric_scale: None,
        }
    }

    /// Sets the character length.
    #[must_use]
    pub fn char_size(mut self, size: u32) -> Self {
        self.char_size = Some(size);
        self
    }

    /// Sets the numeric precision.
    #[must_use]
    pub fn precision(mut self, precision: u32) -> Self {
        self.numeric_precision = Some(precision);
        self
    }

    /// Sets the numeric scale.
    #[must_use]
    pub fn scale(mut self, scale: u32) -> Self {
        self.numeric_scale = Some(scale);
        self
    }

    /// Builds a column from a declared type string such as `VARCHAR(50)`,
    /// `DECIMAL(10, 2)` or `DATETIME2(3)`.
    ///
    /// Parenthesized arguments are assigned to the facet that the type's
    /// family uses. Arguments that are not integers (`VARCHAR(MAX)`) are
    /// dropped.
    #[must_use]
    pub fn from_declared_type(name: impl Into<String>, declared: &str) -> Self {
        let declared = declared.trim();
        let (base, args) = match declared.find('(') {
            Some(open) => {
                let close = declared.rfind(')').unwrap_or(declared.len());
                let inner = declared.get(open + 1..close).unwrap_or("");
                let args: Vec<Option<u32>> =
                    inner.split(',').map(|a| a.trim().parse().ok()).collect();
                (declared[..open].trim_end(), args)
            }
            None => (declared, Vec::new()),
        };

        let mut column = Self::new(name, base);
        let first = args.first().copied().flatten();
        let second = args.get(1).copied().flatten();
        match TypeFamily::of(base) {
            TypeFamily::VariableChar | TypeFamily::FixedChar => column.char_size = first,
            TypeFamily::Decimal => {
                column.numeric_precision = first;
                column.numeric_scale = second;
            }
            TypeFamily::Float => column.numeric_precision = first,
            TypeFamily::FractionalTemporal => column.numeric_scale = first,
            TypeFamily::Other => {}
        }
        column
    }

    /// Returns the family of this column's base type.
    #[must_use]
    pub fn family(&self) -> TypeFamily {
        self.data_type
            .as_deref()
            .map_or(TypeFamily::Other, TypeFamily::of)
    }
}

/// Groups base type names by the facets their definitions carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFamily {
    /// `VARCHAR`, `NVARCHAR`, `CHARACTER VARYING`.
    VariableChar,
    /// `CHAR`, `NCHAR`, `CHARACTER`.
    FixedChar,
    /// `DECIMAL`, `NUMERIC`.
    Decimal,
    /// `FLOAT`, `REAL`.
    Float,
    /// `TIME`, `DATETIME2`, `DATETIMEOFFSET`.
    FractionalTemporal,
    /// Everything else.
    Other,
}

impl TypeFamily {
    /// Classifies a base type name (case-insensitive).
    #[must_use]
    pub fn of(base_type: &str) -> Self {
        let upper = base_type.trim().to_ascii_uppercase();
        match upper.as_str() {
            "VARCHAR" | "NVARCHAR" | "CHARACTER VARYING" | "NATIONAL CHARACTER VARYING" => {
                Self::VariableChar
            }
            "CHAR" | "NCHAR" | "CHARACTER" | "NATIONAL CHARACTER" => Self::FixedChar,
            "DECIMAL" | "NUMERIC" => Self::Decimal,
            "FLOAT" | "REAL" => Self::Float,
            "TIME" | "DATETIME2" | "DATETIMEOFFSET" => Self::FractionalTemporal,
            _ => Self::Other,
        }
    }
}
