//! SQLite storage bootstrap entry points.
//!
//! # Responsibility
//! - Resolve the configured storage endpoint from a connection string.
//! - Open and configure SQLite connections for the catalog.
//! - Ensure the target collection exists before any record operation.
//!
//! # Invariants
//! - A collection is one SQLite table; its name is a validated identifier.
//! - Core code must not read/write records before the collection exists.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod collection;
mod endpoint;
mod open;

pub use collection::{ensure_collection, list_collections, CollectionName, DEFAULT_COLLECTION};
pub use endpoint::{StorageEndpoint, DATABASE_URI_ENV, DEFAULT_DATABASE_URI};
pub use open::{open_db, open_db_in_memory, open_store, CONNECT_TIMEOUT};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    InvalidEndpoint(String),
    InvalidCollectionName(String),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::InvalidEndpoint(uri) => write!(f, "unsupported storage endpoint `{uri}`"),
            Self::InvalidCollectionName(name) => write!(
                f,
                "invalid collection name `{name}`; expected [A-Za-z_][A-Za-z0-9_]*"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::InvalidEndpoint(_) | Self::InvalidCollectionName(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
