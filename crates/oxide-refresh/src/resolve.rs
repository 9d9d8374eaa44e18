//! Query text resolution.
//!
//! A refresh accepts either compiled query text or a reference to a model
//! that a [`ModelResolver`] turns into query text.

use std::path::{Path, PathBuf};

use crate::error::{RefreshError, Result};

/// Where the query for a refresh comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuerySource {
    /// Compiled query text, used as-is.
    Sql(String),
    /// A model reference to resolve.
    Model(String),
}

impl QuerySource {
    /// Returns the query text, resolving model references through
    /// `resolver`.
    pub fn resolve(&self, resolver: &dyn ModelResolver) -> Result<String> {
        match self {
            Self::Sql(sql) => Ok(sql.clone()),
            Self::Model(name) => resolver.resolve(name),
        }
    }
}

/// Turns model references into executable query text.
pub trait ModelResolver: Send + Sync {
    /// Returns the query text for `model`.
    fn resolve(&self, model: &str) -> Result<String>;
}

/// Resolves `name` to the contents of `<dir>/<name>.sql`.
///
/// Trailing whitespace and semicolons are stripped so the text can be
/// embedded in `CREATE ... AS` statements.
#[derive(Debug, Clone)]
pub struct DirectoryResolver {
    root: PathBuf,
}

impl DirectoryResolver {
    /// Creates a resolver rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the directory models are read from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the path a model is expected at.
    #[must_use]
    pub fn path_for(&self, model: &str) -> PathBuf {
        self.root.join(format!("{model}.sql"))
    }

    /// Lists the models in the directory, sorted by name.
    pub fn discover(&self) -> Result<Vec<String>> {
        let mut models = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let path = entry?.path();
            if !path.extension().is_some_and(|ext| ext == "sql") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                models.push(stem.to_string());
            }
        }
        models.sort();
        Ok(models)
    }
}

impl ModelResolver for DirectoryResolver {
    fn resolve(&self, model: &str) -> Result<String> {
        let path = self.path_for(model);
        if !path.is_file() {
            return Err(RefreshError::ModelNotFound {
                name: model.to_string(),
                path,
            });
        }
        let text = std::fs::read_to_string(&path)?;
        Ok(text
            .trim_end_matches(|c: char| c.is_whitespace() || c == ';')
            .trim_start()
            .to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_source_is_verbatim() {
        let resolver = DirectoryResolver::new("unused");
        let source = QuerySource::Sql("SELECT 1".into());
        assert_eq!(source.resolve(&resolver).unwrap(), "SELECT 1");
    }

    #[test]
    fn test_model_source_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("orders.sql"), "\nSELECT id FROM raw;\n\n").unwrap();
        let resolver = DirectoryResolver::new(dir.path());

        let sql = QuerySource::Model("orders".into())
            .resolve(&resolver)
            .unwrap();
        assert_eq!(sql, "SELECT id FROM raw");
    }

    #[test]
    fn test_missing_model() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = DirectoryResolver::new(dir.path());
        let err = resolver.resolve("ghost").unwrap_err();
        assert!(matches!(err, RefreshError::ModelNotFound { ref name, .. } if name == "ghost"));
    }

    #[test]
    fn test_discover_lists_sql_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.sql"), "SELECT 1").unwrap();
        std::fs::write(dir.path().join("a.sql"), "SELECT 1").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();
        let resolver = DirectoryResolver::new(dir.path());
        assert_eq!(resolver.root(), dir.path());
        assert_eq!(resolver.discover().unwrap(), vec!["a", "b"]);
    }
}
