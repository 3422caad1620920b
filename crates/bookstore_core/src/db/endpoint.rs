//! Connection-string parsing for the catalog store.

use super::{DbError, DbResult};
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Environment variable selecting the storage endpoint.
pub const DATABASE_URI_ENV: &str = "DATABASE_URI";

/// Local default used when `DATABASE_URI` is absent.
pub const DEFAULT_DATABASE_URI: &str = "sqlite://bookstore.sqlite3";

const MEMORY_URIS: &[&str] = &["sqlite::memory:", ":memory:", "sqlite://:memory:"];

/// Resolved storage location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageEndpoint {
    /// Database file on local disk.
    File(PathBuf),
    /// Private in-memory database, discarded on close.
    Memory,
}

impl StorageEndpoint {
    /// Parses a connection string.
    ///
    /// Accepted forms: `sqlite::memory:`, `sqlite://<path>`, `file:<path>`,
    /// or a bare filesystem path. Query strings (`?mode=...`) are ignored.
    ///
    /// # Errors
    /// - Returns `DbError::InvalidEndpoint` for empty input, empty paths, or
    ///   schemes other than `sqlite`/`file`.
    pub fn parse(uri: &str) -> DbResult<Self> {
        let trimmed = uri.trim();
        if trimmed.is_empty() {
            return Err(DbError::InvalidEndpoint(uri.to_string()));
        }
        if MEMORY_URIS.contains(&trimmed) {
            return Ok(Self::Memory);
        }

        let without_query = trimmed.split('?').next().unwrap_or(trimmed);
        let path = if let Some(rest) = without_query.strip_prefix("sqlite://") {
            rest
        } else if let Some(rest) = without_query.strip_prefix("file:") {
            rest
        } else if without_query.contains("://") {
            return Err(DbError::InvalidEndpoint(uri.to_string()));
        } else {
            without_query
        };

        if path.is_empty() {
            return Err(DbError::InvalidEndpoint(uri.to_string()));
        }
        Ok(Self::File(PathBuf::from(path)))
    }

    pub(super) fn mode(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory => "memory",
        }
    }
}

impl Display for StorageEndpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "sqlite://{}", path.display()),
            Self::Memory => write!(f, "sqlite::memory:"),
        }
    }
}
