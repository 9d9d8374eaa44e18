//! Column type synthesis.
//!
//! Turns a [`Column`] into a complete type definition suitable for an
//! `ADD COLUMN` clause. Only columns being added go through here; existing
//! columns keep whatever type the store reports for them.

use crate::column::{Column, TypeFamily};

/// Length used for variable-length character columns with no reported size.
pub const DEFAULT_VARCHAR_LENGTH: u32 = 8000;

/// Length used for fixed-length character columns with no reported size.
pub const DEFAULT_CHAR_LENGTH: u32 = 1;

/// Type used when the store reports no type at all.
pub const FALLBACK_TYPE: &str = "VARCHAR";

/// Produces the type definition for a column.
#[must_use]
pub fn synthesize(column: &Column) -> String {
    let Some(base) = column
        .data_type
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
    else {
        return format!("{FALLBACK_TYPE}({DEFAULT_VARCHAR_LENGTH})");
    };

    match column.family() {
        TypeFamily::VariableChar => {
            format!("{base}({})", column.char_size.unwrap_or(DEFAULT_VARCHAR_LENGTH))
        }
        TypeFamily::FixedChar => {
            format!("{base}({})", column.char_size.unwrap_or(DEFAULT_CHAR_LENGTH))
        }
        TypeFamily::Decimal => match (column.numeric_precision, column.numeric_scale) {
            (Some(p), Some(s)) => format!("{base}({p},{s})"),
            (Some(p), None) => format!("{base}({p})"),
            (None, _) => base.to_string(),
        },
        TypeFamily::Float => match column.numeric_precision {
            Some(p) => format!("{base}({p})"),
            None => base.to_string(),
        },
        TypeFamily::FractionalTemporal => match column.numeric_scale {
            Some(s) => format!("{base}({s})"),
            None => base.to_string(),
        },
        TypeFamily::Other => base.to_string(),
    }
}
