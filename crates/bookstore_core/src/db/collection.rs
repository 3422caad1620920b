//! Collection registry over SQLite tables.
//!
//! # Responsibility
//! - Validate collection names before they reach SQL text.
//! - Create the book collection when it is absent.
//!
//! # Invariants
//! - `ensure_collection` is idempotent: existing collections are left as is.
//! - Every book collection indexes `business_id` for exact-match lookups.

use super::{DbError, DbResult};
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::Connection;
use std::fmt::{Display, Formatter};

/// Collection used when none is configured.
pub const DEFAULT_COLLECTION: &str = "information";

static COLLECTION_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid collection name regex"));

/// Validated collection (table) name, safe to interpolate into SQL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionName(String);

impl CollectionName {
    /// Validates `name` as a plain SQL identifier.
    ///
    /// # Errors
    /// - Returns `DbError::InvalidCollectionName` for anything outside
    ///   `[A-Za-z_][A-Za-z0-9_]*` or names reserved by SQLite (`sqlite_*`).
    pub fn parse(name: &str) -> DbResult<Self> {
        let trimmed = name.trim();
        if !COLLECTION_NAME_RE.is_match(trimmed)
            || trimmed.to_ascii_lowercase().starts_with("sqlite_")
        {
            return Err(DbError::InvalidCollectionName(name.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CollectionName {
    fn default() -> Self {
        Self(DEFAULT_COLLECTION.to_string())
    }
}

impl Display for CollectionName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lists user collections in the open database, sorted by name.
pub fn list_collections(conn: &Connection) -> DbResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name
         FROM sqlite_master
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
         ORDER BY name ASC;",
    )?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}

/// Creates the book collection when absent.
///
/// Returns `true` when the collection was created by this call.
pub fn ensure_collection(conn: &Connection, name: &CollectionName) -> DbResult<bool> {
    let existing = list_collections(conn)?;
    if existing.iter().any(|table| table == name.as_str()) {
        info!("event=collection_ensure module=db status=exists collection={name}");
        return Ok(false);
    }

    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS \"{name}\" (
            storage_key TEXT PRIMARY KEY NOT NULL,
            business_id TEXT NOT NULL,
            title TEXT NOT NULL,
            author TEXT NOT NULL,
            edition TEXT NOT NULL,
            pages TEXT NOT NULL,
            year TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS \"{name}_business_id_idx\" ON \"{name}\" (business_id);"
    ))?;
    info!("event=collection_ensure module=db status=created collection={name}");
    Ok(true)
}
