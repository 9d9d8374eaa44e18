//! Schema inspection.
//!
//! Reads column snapshots of existing relations straight from the catalog.
//! A pending query is materialized as a transient view first, since its
//! result columns can only be known once the store has compiled it.

use crate::column::Column;
use crate::context::RefreshContext;
use crate::error::{RefreshError, Result};
use crate::relation::{Relation, RelationKind, RelationName, StagingPurpose};
use crate::store::Store;

/// An existing relation together with its columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationSnapshot {
    /// The relation as found in the catalog.
    pub relation: Relation,
    /// Its columns in physical order.
    pub columns: Vec<Column>,
}

/// Produces column snapshots through a [`Store`].
pub struct SchemaInspector<'a, S: Store + ?Sized> {
    store: &'a S,
}

impl<'a, S: Store + ?Sized> SchemaInspector<'a, S> {
    /// Creates an inspector over `store`.
    #[must_use]
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Returns the columns of an existing relation, or `None` if it does
    /// not exist.
    pub async fn snapshot_relation(&self, name: &RelationName) -> Result<Option<RelationSnapshot>> {
        let Some(relation) = self.store.get_relation(name).await? else {
            return Ok(None);
        };
        let columns = self.store.get_columns(name).await?;
        Ok(Some(RelationSnapshot { relation, columns }))
    }

    /// Returns the columns `sql` projects, in projection order.
    ///
    /// The query is materialized as the target's inspect view, which is
    /// dropped again whether or not inspection succeeds.
    pub async fn snapshot_query(&self, ctx: &RefreshContext, sql: &str) -> Result<Vec<Column>> {
        let dialect = self.store.dialect();
        let view = ctx.target.staging(StagingPurpose::Inspect);
        let drop_view = dialect.drop_relation(&view, RelationKind::View);

        let inspected: Result<Vec<Column>> = async {
            self.store.execute(&drop_view).await?;
            self.store.execute(&dialect.create_view(&view, sql)).await?;
            ctx.event(format!("Created transient view {view} for column discovery"));
            self.store.get_columns(&view).await
        }
        .await;
        let released = self.store.execute(&drop_view).await;

        let columns = inspected.map_err(|e| inspection_failed(ctx, e))?;
        released.map_err(|e| inspection_failed(ctx, e))?;
        Ok(columns)
    }
}

fn inspection_failed(ctx: &RefreshContext, source: RefreshError) -> RefreshError {
    RefreshError::InspectionFailed {
        relation: ctx.target.to_string(),
        source: Box::new(source),
    }
}
