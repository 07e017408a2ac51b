//! Shared helpers for integration tests.

use sqlout::config::ConnectionConfig;
use sqlout::db::DatabaseBackend;
use std::path::Path;
use tempfile::TempDir;

/// A SQLite database file in a temporary directory.
pub struct TestDatabase {
    pub dir: TempDir,
    pub config: ConnectionConfig,
}

impl TestDatabase {
    /// Creates an empty database file and a connection config for it.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        std::fs::File::create(&path).unwrap();

        let config = ConnectionConfig {
            backend: DatabaseBackend::Sqlite,
            host: path.display().to_string(),
            ..Default::default()
        };

        Self { dir, config }
    }

    /// Returns a path inside the temporary directory.
    pub fn path(&self, name: &str) -> std::path::PathBuf {
        self.dir.path().join(name)
    }
}

/// Reads a whole output file.
pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}
