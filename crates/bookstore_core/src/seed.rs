//! Startup seeding of canonical catalog records.
//!
//! # Responsibility
//! - Hold the fixed list of canonical books.
//! - Insert each canonical book unless a composite-equal document exists.
//!
//! # Invariants
//! - Repeated runs against the same store never add documents.
//! - More than one composite match is corrupt state and aborts the pass.

use crate::model::book::NewBook;
use crate::repo::catalog_repo::{CatalogRepository, RepoError};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure of the seed pass. Every variant is fatal at startup.
#[derive(Debug)]
pub enum SeedError {
    /// Several documents composite-match one canonical book.
    Ambiguous { business_id: String, matches: usize },
    Repo(RepoError),
}

impl Display for SeedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ambiguous {
                business_id,
                matches,
            } => write!(
                f,
                "seed record `{business_id}` matches {matches} stored documents; refusing to continue"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SeedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Ambiguous { .. } => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for SeedError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Summary of one seed pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: usize,
    pub skipped: usize,
}

/// Canonical books guaranteed to exist after startup.
pub fn canonical_books() -> Vec<NewBook> {
    vec![
        NewBook::new(
            "example1",
            "The Vortex",
            "José Eustasio Rivera",
            "958-30-0804-4",
            "292",
            "1924",
        ),
        NewBook::new(
            "example2",
            "Frankenstein",
            "Mary Shelley",
            "978-3-649-64609-9",
            "280",
            "1818",
        ),
        NewBook::new(
            "example3",
            "The Black Cat",
            "Edgar Allan Poe",
            "978-3-99168-238-7",
            "280",
            "1843",
        ),
    ]
}

/// Ensures every book in `books` is present exactly once.
///
/// # Errors
/// - `SeedError::Ambiguous` when a book matches more than one document.
/// - `SeedError::Repo` when a lookup or insert fails.
pub fn seed_catalog<R: CatalogRepository + ?Sized>(
    repo: &R,
    books: &[NewBook],
) -> Result<SeedReport, SeedError> {
    let mut report = SeedReport::default();

    for book in books {
        let matches = repo.find_matching(book)?;
        match matches.len() {
            0 => {
                let storage_key = repo.insert(book)?;
                report.inserted += 1;
                info!(
                    "event=seed_record module=seed status=inserted business_id={} storage_key={}",
                    book.business_id, storage_key
                );
            }
            1 => {
                report.skipped += 1;
                info!(
                    "event=seed_record module=seed status=exists business_id={}",
                    book.business_id
                );
            }
            count => {
                error!(
                    "event=seed_record module=seed status=error error_code=seed_ambiguous business_id={} matches={}",
                    book.business_id, count
                );
                return Err(SeedError::Ambiguous {
                    business_id: book.business_id.clone(),
                    matches: count,
                });
            }
        }
    }

    info!(
        "event=seed_done module=seed status=ok inserted={} skipped={}",
        report.inserted, report.skipped
    );
    Ok(report)
}
