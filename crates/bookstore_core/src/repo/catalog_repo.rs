//! Catalog repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide lookup, insert, partial update and delete primitives over one
//!   book collection.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Absence is `Ok(None)` / `NoMatch`, never an error.
//! - Every write touches at most one document and runs as one statement.
//! - Single-target operations address the earliest inserted document with
//!   the requested `business_id`.

use crate::db::{ensure_collection, CollectionName, DbError};
use crate::model::book::{BookProjection, BookRecord, FieldSet, NewBook, StorageKey};
use log::info;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

const BOOK_COLUMNS: &str = "storage_key, business_id, title, author, edition, pages, year";

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage-side failure for catalog operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Update requested with no effective fields; storage was not touched.
    EmptyUpdate,
    /// A worker panicked while holding the connection.
    LockPoisoned,
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::EmptyUpdate => write!(f, "update contains no non-empty fields"),
            Self::LockPoisoned => write!(f, "storage connection lock poisoned"),
            Self::InvalidData(message) => write!(f, "invalid persisted book data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::EmptyUpdate | Self::LockPoisoned | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl<T> From<PoisonError<T>> for RepoError {
    fn from(_: PoisonError<T>) -> Self {
        Self::LockPoisoned
    }
}

/// Result of `insert_if_unique`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(StorageKey),
    /// A composite-equal document already exists; nothing was written.
    Conflict,
}

/// Result of `update_fields`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    NoMatch,
}

/// Result of `delete_by_business_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NoMatch,
}

/// Repository interface for the book collection.
pub trait CatalogRepository: Send + Sync {
    /// All projections in storage order.
    fn find_all(&self) -> RepoResult<Vec<BookProjection>>;
    /// First document whose `business_id` equals `id`.
    fn find_by_business_id(&self, id: &str) -> RepoResult<Option<BookRecord>>;
    /// Every document composite-equal to `candidate`.
    fn find_matching(&self, candidate: &NewBook) -> RepoResult<Vec<BookRecord>>;
    /// Unconditional insert.
    fn insert(&self, candidate: &NewBook) -> RepoResult<StorageKey>;
    /// Inserts unless a composite-equal document exists.
    fn insert_if_unique(&self, candidate: &NewBook) -> RepoResult<InsertOutcome>;
    /// Merges `fields` into the first document with `business_id == id`.
    fn update_fields(&self, id: &str, fields: &FieldSet) -> RepoResult<UpdateOutcome>;
    /// Removes the first document with `business_id == id`.
    fn delete_by_business_id(&self, id: &str) -> RepoResult<DeleteOutcome>;
    /// Number of documents in the collection.
    fn count(&self) -> RepoResult<u64>;
}

/// SQLite-backed catalog repository owning the shared connection.
#[derive(Debug)]
pub struct SqliteCatalogRepository {
    conn: Mutex<Connection>,
    collection: CollectionName,
}

impl SqliteCatalogRepository {
    /// Takes ownership of `conn` and ensures `collection` exists.
    pub fn try_new(conn: Connection, collection: CollectionName) -> RepoResult<Self> {
        ensure_collection(&conn, &collection)?;
        Ok(Self {
            conn: Mutex::new(conn),
            collection,
        })
    }

    pub fn collection(&self) -> &CollectionName {
        &self.collection
    }

    /// Closes the underlying connection, reporting close failures.
    ///
    /// Dropping the repository also releases the connection; this variant
    /// exists so shutdown can log the outcome.
    pub fn close(self) -> RepoResult<()> {
        let conn = self
            .conn
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        match conn.close() {
            Ok(()) => {
                info!(
                    "event=db_close module=repo status=ok collection={}",
                    self.collection
                );
                Ok(())
            }
            Err((_, err)) => Err(err.into()),
        }
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, Connection>> {
        Ok(self.conn.lock()?)
    }

    fn first_match_rowid_sql(&self) -> String {
        format!(
            "SELECT rowid FROM \"{}\" WHERE business_id = ? ORDER BY rowid ASC LIMIT 1",
            self.collection
        )
    }
}

impl CatalogRepository for SqliteCatalogRepository {
    fn find_all(&self) -> RepoResult<Vec<BookProjection>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {BOOK_COLUMNS} FROM \"{}\" ORDER BY rowid ASC;",
            self.collection
        ))?;
        let mut rows = stmt.query([])?;
        let mut books = Vec::new();

        while let Some(row) = rows.next()? {
            books.push(parse_book_row(row)?.projection());
        }

        Ok(books)
    }

    fn find_by_business_id(&self, id: &str) -> RepoResult<Option<BookRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {BOOK_COLUMNS} FROM \"{}\"
             WHERE business_id = ?1
             ORDER BY rowid ASC
             LIMIT 1;",
            self.collection
        ))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_book_row(row)?));
        }

        Ok(None)
    }

    fn find_matching(&self, candidate: &NewBook) -> RepoResult<Vec<BookRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {BOOK_COLUMNS} FROM \"{}\"
             WHERE business_id = ?1
               AND title = ?2
               AND author = ?3
               AND year = ?4
               AND pages = ?5
             ORDER BY rowid ASC;",
            self.collection
        ))?;

        let mut rows = stmt.query(params![
            candidate.business_id,
            candidate.title,
            candidate.author,
            candidate.year,
            candidate.pages,
        ])?;
        let mut books = Vec::new();

        while let Some(row) = rows.next()? {
            books.push(parse_book_row(row)?);
        }

        Ok(books)
    }

    fn insert(&self, candidate: &NewBook) -> RepoResult<StorageKey> {
        let storage_key = Uuid::new_v4();
        let conn = self.lock()?;
        conn.execute(
            &format!(
                "INSERT INTO \"{}\" ({BOOK_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
                self.collection
            ),
            params![
                storage_key.to_string(),
                candidate.business_id,
                candidate.title,
                candidate.author,
                candidate.edition,
                candidate.pages,
                candidate.year,
            ],
        )?;

        Ok(storage_key)
    }

    fn insert_if_unique(&self, candidate: &NewBook) -> RepoResult<InsertOutcome> {
        let storage_key = Uuid::new_v4();
        let conn = self.lock()?;
        let changed = conn.execute(
            &format!(
                "INSERT INTO \"{collection}\" ({BOOK_COLUMNS})
                 SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7
                 WHERE NOT EXISTS (
                    SELECT 1 FROM \"{collection}\"
                    WHERE business_id = ?2
                      AND title = ?3
                      AND author = ?4
                      AND year = ?7
                      AND pages = ?6
                 );",
                collection = self.collection
            ),
            params![
                storage_key.to_string(),
                candidate.business_id,
                candidate.title,
                candidate.author,
                candidate.edition,
                candidate.pages,
                candidate.year,
            ],
        )?;

        if changed == 0 {
            return Ok(InsertOutcome::Conflict);
        }

        Ok(InsertOutcome::Inserted(storage_key))
    }

    fn update_fields(&self, id: &str, fields: &FieldSet) -> RepoResult<UpdateOutcome> {
        if fields.is_empty() {
            return Err(RepoError::EmptyUpdate);
        }

        let assignments = fields
            .iter()
            .map(|(field, _)| format!("{} = ?", field.column()))
            .collect::<Vec<_>>()
            .join(", ");
        let mut bind_values: Vec<Value> = fields
            .iter()
            .map(|(_, value)| Value::Text(value.to_string()))
            .collect();
        bind_values.push(Value::Text(id.to_string()));

        let sql = format!(
            "UPDATE \"{}\" SET {assignments} WHERE rowid = ({});",
            self.collection,
            self.first_match_rowid_sql()
        );

        let conn = self.lock()?;
        let changed = conn.execute(&sql, params_from_iter(bind_values))?;
        if changed == 0 {
            return Ok(UpdateOutcome::NoMatch);
        }

        Ok(UpdateOutcome::Updated)
    }

    fn delete_by_business_id(&self, id: &str) -> RepoResult<DeleteOutcome> {
        let sql = format!(
            "DELETE FROM \"{}\" WHERE rowid = ({});",
            self.collection,
            self.first_match_rowid_sql()
        );

        let conn = self.lock()?;
        let changed = conn.execute(&sql, [id])?;
        if changed == 0 {
            return Ok(DeleteOutcome::NoMatch);
        }

        Ok(DeleteOutcome::Deleted)
    }

    fn count(&self) -> RepoResult<u64> {
        let conn = self.lock()?;
        let total = conn.query_row(
            &format!("SELECT COUNT(*) FROM \"{}\";", self.collection),
            [],
            |row| row.get::<_, i64>(0),
        )?;
        u64::try_from(total)
            .map_err(|_| RepoError::InvalidData(format!("negative document count `{total}`")))
    }
}

fn parse_book_row(row: &Row<'_>) -> RepoResult<BookRecord> {
    let key_text: String = row.get("storage_key")?;
    let storage_key = Uuid::parse_str(&key_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid storage key `{key_text}`"))
    })?;

    Ok(BookRecord {
        storage_key,
        business_id: row.get("business_id")?,
        title: row.get("title")?,
        author: row.get("author")?,
        edition: row.get("edition")?,
        pages: row.get("pages")?,
        year: row.get("year")?,
    })
}
