//! Refresh plan executor.
//!
//! This module issues the statements that realize a [`RefreshStrategy`]
//! against a [`Store`], one at a time and in order. Nothing is rolled back:
//! when a statement fails, the target stays in whatever state the last
//! successful statement left it.

use tracing::warn;

use crate::compare::SchemaDiff;
use crate::context::RefreshContext;
use crate::dialect::RefreshDialect;
use crate::error::{RefreshError, Result};
use crate::relation::{Relation, RelationKind, RelationName, StagingPurpose};
use crate::store::Store;
use crate::strategy::RefreshStrategy;

/// What an executed plan did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionReport {
    /// Column list of the target after the refresh, in the order used for
    /// the data-moving statement.
    pub final_columns: Vec<String>,
    /// Every statement issued (or, in dry-run mode, planned), in order.
    pub statements: Vec<String>,
}

/// Executes refresh plans against a store.
pub struct PlanExecutor<'a, S: Store + ?Sized> {
    store: &'a S,
    dry_run: bool,
}

impl<'a, S: Store + ?Sized> PlanExecutor<'a, S> {
    /// Creates a new plan executor.
    #[must_use]
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            dry_run: false,
        }
    }

    /// Enables dry-run mode (statements are recorded but not executed).
    #[must_use]
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Executes `strategy` for the context's target.
    ///
    /// `existing` is the relation currently occupying the target name, if
    /// any. It is dropped by `Create` (when it is a view) and by
    /// `DropRecreate`, and left alone otherwise.
    pub async fn execute(
        &self,
        ctx: &RefreshContext,
        strategy: RefreshStrategy,
        existing: Option<&Relation>,
        query: &str,
        diff: &SchemaDiff,
    ) -> Result<ExecutionReport> {
        let mut session = Session {
            store: self.store,
            dialect: self.store.dialect(),
            ctx,
            dry_run: self.dry_run,
            statements: Vec::new(),
            target_modified: false,
        };

        let final_columns = match strategy {
            RefreshStrategy::Create => {
                if let Some(relation) = existing {
                    session.drop_existing(relation.kind).await?;
                }
                session.create(query).await?;
                model_column_names(diff)
            }
            RefreshStrategy::DropRecreate => {
                ctx.event(
                    "Columns differ and cannot be altered in place; dropping and recreating",
                );
                let kind = existing.map_or(RelationKind::Table, |r| r.kind);
                session.drop_existing(kind).await?;
                session.create(query).await?;
                model_column_names(diff)
            }
            RefreshStrategy::TruncateInsert => {
                ctx.event("Columns match; truncating and inserting");
                session.truncate_insert(query, diff).await?
            }
            RefreshStrategy::AlterInPlace => {
                ctx.event("Columns differ; altering in place");
                session.alter_in_place(query, diff).await?
            }
        };

        Ok(ExecutionReport {
            final_columns,
            statements: session.statements,
        })
    }
}

fn model_column_names(diff: &SchemaDiff) -> Vec<String> {
    diff.model_columns().iter().map(|c| c.name.clone()).collect()
}

/// State of one plan execution.
struct Session<'s, S: Store + ?Sized> {
    store: &'s S,
    dialect: &'s dyn RefreshDialect,
    ctx: &'s RefreshContext,
    dry_run: bool,
    statements: Vec<String>,
    target_modified: bool,
}

impl<S: Store + ?Sized> Session<'_, S> {
    fn target(&self) -> &RelationName {
        &self.ctx.target
    }

    /// Issues one statement and records it.
    async fn issue(&mut self, sql: String) -> Result<()> {
        let executed = if self.dry_run {
            Ok(())
        } else {
            self.store.execute(&sql).await
        };
        self.statements.push(sql);
        executed
    }

    /// Issues one statement of the plan. `modifies_target` marks statements
    /// after which the target no longer holds its previous contents; any
    /// later failure is reported as [`RefreshError::Interrupted`].
    async fn run(&mut self, sql: String, modifies_target: bool) -> Result<()> {
        if let Err(e) = self.issue(sql).await {
            return Err(if self.target_modified {
                RefreshError::Interrupted {
                    relation: self.target().to_string(),
                    source: Box::new(e),
                }
            } else {
                e
            });
        }
        if modifies_target {
            self.target_modified = true;
        }
        Ok(())
    }

    async fn drop_existing(&mut self, kind: RelationKind) -> Result<()> {
        self.ctx.event(format!("Dropping {kind} {}", self.target()));
        let sql = self.dialect.drop_relation(self.target(), kind);
        self.run(sql, true).await
    }

    async fn create(&mut self, query: &str) -> Result<()> {
        self.ctx.event(format!("Creating table {}", self.target()));
        let sql = self.dialect.create_table_as(self.target(), query);
        let created = self.run(sql, true).await;
        let leftover = self.target().staging(StagingPurpose::Create);
        self.release(&leftover, created).await
    }

    async fn stage(&mut self, view: &RelationName, query: &str) -> Result<()> {
        let stale = self.dialect.drop_relation(view, RelationKind::View);
        self.run(stale, false).await?;
        let create = self.dialect.create_view(view, query);
        self.run(create, false).await?;
        self.ctx.event(format!("Created transient view {view}"));
        Ok(())
    }

    /// Drops a staging view after `outcome`, keeping the first error.
    async fn release<T>(&mut self, view: &RelationName, outcome: Result<T>) -> Result<T> {
        let sql = self.dialect.drop_relation(view, RelationKind::View);
        let released = self.issue(sql).await;
        match (outcome, released) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(release_err)) => {
                warn!(view = %view, error = %release_err, "Failed to drop staging view");
                Err(e)
            }
        }
    }

    async fn truncate_insert(&mut self, query: &str, diff: &SchemaDiff) -> Result<Vec<String>> {
        let columns = self.checked_final_columns(diff)?;
        let view = self.target().staging(StagingPurpose::Insert);

        let outcome: Result<()> = async {
            self.stage(&view, query).await?;
            let truncate = self.dialect.truncate(self.target());
            self.run(truncate, true).await?;
            let insert = self.dialect.insert_select(self.target(), &columns, &view);
            self.run(insert, true).await
        }
        .await;

        self.release(&view, outcome).await?;
        Ok(columns)
    }

    async fn alter_in_place(&mut self, query: &str, diff: &SchemaDiff) -> Result<Vec<String>> {
        let columns = self.checked_final_columns(diff)?;
        let view = self.target().staging(StagingPurpose::Alter);

        let outcome: Result<()> = async {
            self.stage(&view, query).await?;
            let truncate = self.dialect.truncate(self.target());
            self.run(truncate, true).await?;

            for name in diff.columns_to_drop() {
                self.ctx.event(format!("Dropping column {name}"));
                let sql = self.dialect.drop_column(self.target(), name);
                self.run(sql, true).await?;
            }
            for addition in diff.columns_to_add() {
                self.ctx.event(format!(
                    "Adding column {} {}",
                    addition.name(),
                    addition.definition
                ));
                let sql = self
                    .dialect
                    .add_column(self.target(), addition.name(), &addition.definition);
                self.run(sql, true).await?;
            }

            let insert = self.dialect.insert_select(self.target(), &columns, &view);
            self.run(insert, true).await
        }
        .await;

        self.release(&view, outcome).await?;
        Ok(columns)
    }

    fn checked_final_columns(&self, diff: &SchemaDiff) -> Result<Vec<String>> {
        let columns = diff.final_column_order();
        if columns.is_empty() {
            return Err(RefreshError::StructuralImpossibility {
                relation: self.target().to_string(),
            });
        }
        Ok(columns)
    }
}
