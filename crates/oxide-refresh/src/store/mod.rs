//! Store collaborators.
//!
//! A [`Store`] is the compute engine a refresh runs against: it answers
//! catalog questions and executes statements. The engine never talks to a
//! database except through this trait.

mod sqlite;

pub use sqlite::SqliteStore;

use async_trait::async_trait;

use crate::column::Column;
use crate::dialect::RefreshDialect;
use crate::error::Result;
use crate::relation::{Relation, RelationName};

/// A database the engine can inspect and mutate.
#[async_trait]
pub trait Store: Send + Sync {
    /// Returns the dialect used to spell statements for this store.
    fn dialect(&self) -> &dyn RefreshDialect;

    /// Looks up a relation by name. Returns `None` if it does not exist.
    async fn get_relation(&self, name: &RelationName) -> Result<Option<Relation>>;

    /// Returns the columns of a relation in physical order.
    async fn get_columns(&self, name: &RelationName) -> Result<Vec<Column>>;

    /// Executes a single DDL or DML statement.
    ///
    /// Failures are reported as [`RefreshError::Statement`](crate::error::RefreshError::Statement).
    async fn execute(&self, sql: &str) -> Result<()>;
}
