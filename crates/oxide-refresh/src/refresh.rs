//! Refresh driver.
//!
//! Runs one refresh attempt for one target: resolve the query, snapshot
//! both sides, diff, pick a strategy and execute it. Every attempt reads
//! the catalog afresh, so re-running after a failure plans from whatever
//! state the failure left behind.

use crate::compare::{SchemaDiff, compare};
use crate::context::RefreshContext;
use crate::dialect::validate_name;
use crate::error::{RefreshError, Result};
use crate::executor::PlanExecutor;
use crate::inspect::SchemaInspector;
use crate::relation::Relation;
use crate::resolve::{ModelResolver, QuerySource};
use crate::store::Store;
use crate::strategy::{RefreshStrategy, select_strategy};

/// A decided but not yet executed refresh.
#[derive(Debug, Clone)]
pub struct RefreshPlan {
    /// The chosen strategy.
    pub strategy: RefreshStrategy,
    /// Column diff between the target and the query.
    pub diff: SchemaDiff,
    /// The relation currently at the target name, if any.
    pub existing: Option<Relation>,
    /// Resolved query text.
    pub query: String,
}

/// What a completed refresh did.
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    /// The strategy that ran.
    pub strategy: RefreshStrategy,
    /// Column diff the strategy was chosen from.
    pub diff: SchemaDiff,
    /// Target columns in the order rows were written.
    pub final_columns: Vec<String>,
    /// Statements issued (or planned, in dry-run mode).
    pub statements: Vec<String>,
}

/// Refreshes target relations from queries.
///
/// Attempts against the same target must not run concurrently; the
/// refresher takes no locks of its own.
pub struct Refresher<'a, S: Store + ?Sized> {
    store: &'a S,
    resolver: Option<&'a dyn ModelResolver>,
    dry_run: bool,
}

impl<'a, S: Store + ?Sized> Refresher<'a, S> {
    /// Creates a refresher over `store`.
    #[must_use]
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            resolver: None,
            dry_run: false,
        }
    }

    /// Sets the resolver used for [`QuerySource::Model`] sources.
    #[must_use]
    pub fn with_resolver(mut self, resolver: &'a dyn ModelResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Enables dry-run mode: the target is never touched and the outcome
    /// lists the statements that would have run.
    #[must_use]
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Inspects the target and the query and decides on a strategy.
    ///
    /// Only the transient inspect view is created (and dropped); the target
    /// is not modified.
    pub async fn plan(&self, ctx: &RefreshContext, source: &QuerySource) -> Result<RefreshPlan> {
        validate_name(&ctx.target)?;
        let query = match (source, self.resolver) {
            (QuerySource::Model(name), None) => {
                return Err(RefreshError::UnresolvedModel(name.clone()));
            }
            (QuerySource::Sql(sql), _) => sql.clone(),
            (source, Some(resolver)) => source.resolve(resolver)?,
        };

        let inspector = SchemaInspector::new(self.store);
        let existing = inspector.snapshot_relation(&ctx.target).await?;
        let (existing, existing_columns) = match existing {
            Some(snapshot) if snapshot.relation.is_table() => {
                (Some(snapshot.relation), snapshot.columns)
            }
            Some(snapshot) => (Some(snapshot.relation), Vec::new()),
            None => (None, Vec::new()),
        };
        let table_exists = existing.as_ref().is_some_and(Relation::is_table);

        let model_columns = inspector.snapshot_query(ctx, &query).await?;
        let diff = compare(&existing_columns, &model_columns);
        let strategy = select_strategy(table_exists, &diff, self.store.dialect());
        ctx.event(format!("Selected {strategy} refresh"));

        Ok(RefreshPlan {
            strategy,
            diff,
            existing,
            query,
        })
    }

    /// Runs one refresh attempt.
    pub async fn refresh(
        &self,
        ctx: &RefreshContext,
        source: &QuerySource,
    ) -> Result<RefreshOutcome> {
        let plan = self.plan(ctx, source).await?;
        let report = PlanExecutor::new(self.store)
            .dry_run(self.dry_run)
            .execute(
                ctx,
                plan.strategy,
                plan.existing.as_ref(),
                &plan.query,
                &plan.diff,
            )
            .await?;

        Ok(RefreshOutcome {
            strategy: plan.strategy,
            diff: plan.diff,
            final_columns: report.final_columns,
            statements: report.statements,
        })
    }
}
