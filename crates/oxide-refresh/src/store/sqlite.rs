//! SQLite store backed by an sqlx connection pool.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::debug;

use crate::column::Column;
use crate::dialect::{RefreshDialect, SqliteDialect};
use crate::error::{RefreshError, Result};
use crate::relation::{Relation, RelationKind, RelationName};

use super::Store;

/// A [`Store`] over a SQLite database.
///
/// Relation kinds come from `sqlite_master`; the table's `rootpage` is
/// reported as its physical location. Columns come from
/// `pragma_table_info`, with declared types split into facets.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    dialect: SqliteDialect,
}

impl SqliteStore {
    /// Creates a store over an existing pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            dialect: SqliteDialect::new(),
        }
    }

    /// Connects to `url`, creating the database file if it is missing.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        Ok(Self::new(pool))
    }

    /// Returns the underlying pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Counts the rows of a relation.
    pub async fn row_count(&self, name: &RelationName) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.dialect.relation_sql(name));
        let (count,): (i64,) = sqlx::query_as(&sql).fetch_one(&self.pool).await?;
        Ok(count)
    }

    fn schema_of<'a>(&self, name: &'a RelationName) -> &'a str {
        if name.schema.is_empty() {
            "main"
        } else {
            &name.schema
        }
    }
}

#[async_trait]
impl Store for SqliteStore {
    fn dialect(&self) -> &dyn RefreshDialect {
        &self.dialect
    }

    async fn get_relation(&self, name: &RelationName) -> Result<Option<Relation>> {
        let sql = format!(
            "SELECT type, rootpage FROM {}.sqlite_master \
             WHERE type IN ('table', 'view') AND name = ?1 COLLATE NOCASE",
            self.dialect.quote_identifier(self.schema_of(name))
        );
        let row: Option<(String, i64)> = sqlx::query_as(&sql)
            .bind(name.identifier.as_str())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(kind, rootpage)| {
            let kind = if kind == "view" {
                RelationKind::View
            } else {
                RelationKind::Table
            };
            Relation {
                name: name.clone(),
                kind,
                location: (kind == RelationKind::Table).then(|| rootpage.to_string()),
            }
        }))
    }

    async fn get_columns(&self, name: &RelationName) -> Result<Vec<Column>> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT name, type FROM pragma_table_info(?1, ?2) ORDER BY cid")
                .bind(name.identifier.as_str())
                .bind(self.schema_of(name))
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|(column, declared)| Column::from_declared_type(column, &declared))
            .collect())
    }

    async fn execute(&self, sql: &str) -> Result<()> {
        debug!(sql = %sql, "Executing SQL");
        sqlx::query(sql)
            .execute(&self.pool)
            .await
            .map_err(|source| RefreshError::Statement {
                statement: sql.to_string(),
                source,
            })?;
        Ok(())
    }
}
