//! Generic (ANSI) refresh dialect.

use super::RefreshDialect;

/// Dialect for stores that follow standard SQL and support column-level
/// `ALTER TABLE`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericDialect;

impl GenericDialect {
    /// Creates a new generic dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl RefreshDialect for GenericDialect {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn supports_column_alter(&self) -> bool {
        true
    }
}
