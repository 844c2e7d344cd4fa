//! Shared application state. Each request handler opens its own SQLite
//! connection; coordination between concurrent handlers happens entirely
//! through the database's transactions, never through in-process state.

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::db::{self, DatabaseError};

pub struct AppState {
    db_path: PathBuf,
}

impl AppState {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self { db_path: db_path.into() }
    }

    /// Open a configured connection (pragmas applied, schema current).
    pub fn open_db(&self) -> Result<Connection, DatabaseError> {
        db::open_database(&self.db_path)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}
