#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use oxide_refresh::prelude::*;

pub async fn memory_store() -> SqliteStore {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .expect("Failed to create in-memory SQLite pool");
    SqliteStore::new(pool)
}

/// Creates `main.raw_orders` with three rows.
pub async fn seed_raw_orders(store: &SqliteStore) {
    store
        .execute("CREATE TABLE main.raw_orders (id INTEGER, name TEXT, created_at TEXT)")
        .await
        .unwrap();
    store
        .execute(
            "INSERT INTO main.raw_orders VALUES \
             (1, 'widget', '2024-01-01'), (2, 'gadget', '2024-01-02'), (3, 'gizmo', '2024-01-03')",
        )
        .await
        .unwrap();
}

pub fn target(identifier: &str) -> RelationName {
    RelationName::new("", "main", identifier)
}

pub fn sql(text: &str) -> QuerySource {
    QuerySource::Sql(text.to_string())
}

pub async fn column_names(store: &SqliteStore, name: &RelationName) -> Vec<String> {
    store
        .get_columns(name)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect()
}

/// Names of every view left in the `main` schema.
pub async fn views(store: &SqliteStore) -> Vec<String> {
    sqlx::query_as::<_, (String,)>(
        "SELECT name FROM main.sqlite_master WHERE type = 'view' ORDER BY name",
    )
    .fetch_all(store.pool())
    .await
    .unwrap()
    .into_iter()
    .map(|(name,)| name)
    .collect()
}

/// A store that records statements instead of running them.
///
/// It reports one optional target relation with fixed columns, and
/// answers column lookups on any `__inspect_vw` view with the configured
/// query columns.
pub struct RecordingStore {
    dialect: GenericDialect,
    target: Option<Relation>,
    target_columns: Vec<Column>,
    query_columns: Vec<Column>,
    fail_on: Option<String>,
    statements: Mutex<Vec<String>>,
}

impl RecordingStore {
    pub fn new(query_columns: Vec<Column>) -> Self {
        Self {
            dialect: GenericDialect::new(),
            target: None,
            target_columns: Vec::new(),
            query_columns,
            fail_on: None,
            statements: Mutex::new(Vec::new()),
        }
    }

    pub fn with_table(mut self, name: RelationName, columns: Vec<Column>) -> Self {
        self.target = Some(Relation {
            name,
            kind: RelationKind::Table,
            location: Some("1".to_string()),
        });
        self.target_columns = columns;
        self
    }

    pub fn with_view(mut self, name: RelationName) -> Self {
        self.target = Some(Relation {
            name,
            kind: RelationKind::View,
            location: None,
        });
        self
    }

    /// Fails the first statement starting with `prefix`.
    pub fn failing_on(mut self, prefix: &str) -> Self {
        self.fail_on = Some(prefix.to_string());
        self
    }

    pub fn statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }
}

#[async_trait]
impl Store for RecordingStore {
    fn dialect(&self) -> &dyn RefreshDialect {
        &self.dialect
    }

    async fn get_relation(&self, name: &RelationName) -> Result<Option<Relation>> {
        Ok(self.target.clone().filter(|t| &t.name == name))
    }

    async fn get_columns(&self, name: &RelationName) -> Result<Vec<Column>> {
        if name.identifier.ends_with(StagingPurpose::Inspect.suffix()) {
            return Ok(self.query_columns.clone());
        }
        match &self.target {
            Some(t) if &t.name == name => Ok(self.target_columns.clone()),
            _ => Ok(Vec::new()),
        }
    }

    async fn execute(&self, sql: &str) -> Result<()> {
        self.statements.lock().unwrap().push(sql.to_string());
        match &self.fail_on {
            Some(prefix) if sql.starts_with(prefix.as_str()) => Err(RefreshError::Statement {
                statement: sql.to_string(),
                source: sqlx::Error::Protocol("injected failure".to_string()),
            }),
            _ => Ok(()),
        }
    }
}

/// Collects formatted log output in memory.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Returns a subscriber writing events up to `level` into this capture.
    pub fn subscriber(&self, level: Level) -> impl tracing::Subscriber + Send + Sync + 'static {
        let capture = self.clone();
        FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(false)
            .without_time()
            .with_ansi(false)
            .with_writer(move || capture.clone())
            .finish()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
