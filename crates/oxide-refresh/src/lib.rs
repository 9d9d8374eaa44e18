//! In-place table refresh with schema reconciliation.
//!
//! `oxide-refresh` refreshes a table from a query without dropping it
//! unless it has to. Consumers bound to the table's physical storage keep
//! working across refreshes as long as its column structure allows:
//! - Same column names: the table is emptied and refilled
//! - Columns added or removed: the table is altered in place, then refilled
//! - The store cannot alter it: the table is dropped and recreated
//!
//! # Architecture
//!
//! - **Column** - Name and physical type facets of one column
//! - **Inspector** - Reads column snapshots of tables and pending queries
//! - **Comparator** - Diffs two snapshots by case-insensitive name
//! - **Synthesizer** - Builds type definitions for added columns
//! - **Strategy** - Picks create, truncate/insert, alter or drop/recreate
//! - **Executor** - Issues the statements of the chosen strategy
//! - **Dialect** / **Store** - Statement spelling and execution per database
//!
//! # Example
//!
//! ```rust,ignore
//! use oxide_refresh::prelude::*;
//!
//! let store = SqliteStore::connect("sqlite:warehouse.db", 1).await?;
//! let ctx = RefreshContext::new(RelationName::new("", "main", "orders"));
//! let outcome = Refresher::new(&store)
//!     .refresh(&ctx, &QuerySource::Sql("SELECT id, name FROM raw_orders".into()))
//!     .await?;
//! println!("{} -> {:?}", outcome.strategy, outcome.final_columns);
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Refresh every model in ./models
//! oxide-refresh run
//!
//! # Show the statements a refresh would issue
//! oxide-refresh plan --model orders
//!
//! # Show the column diff for a model
//! oxide-refresh diff --model orders
//! ```

pub mod column;
pub mod compare;
pub mod config;
pub mod context;
pub mod dialect;
pub mod error;
pub mod executor;
pub mod inspect;
pub mod refresh;
pub mod relation;
pub mod resolve;
pub mod store;
pub mod strategy;
pub mod synth;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::column::{Column, TypeFamily};
    pub use crate::compare::{ColumnAddition, SchemaDiff, compare};
    pub use crate::config::{ModelConfig, RefreshConfig};
    pub use crate::context::RefreshContext;
    pub use crate::dialect::{GenericDialect, RefreshDialect, SqliteDialect};
    pub use crate::error::{RefreshError, Result};
    pub use crate::executor::{ExecutionReport, PlanExecutor};
    pub use crate::inspect::{RelationSnapshot, SchemaInspector};
    pub use crate::refresh::{RefreshOutcome, RefreshPlan, Refresher};
    pub use crate::relation::{Relation, RelationKind, RelationName, StagingPurpose};
    pub use crate::resolve::{DirectoryResolver, ModelResolver, QuerySource};
    pub use crate::store::{SqliteStore, Store};
    pub use crate::strategy::{RefreshStrategy, select_strategy};
    pub use crate::synth::synthesize;
}
