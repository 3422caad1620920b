//! Catalog use-case service.
//!
//! # Responsibility
//! - Apply create/update/delete policy on top of the catalog repository.
//! - Derive distinct-author and distinct-year aggregates from raw records.
//!
//! # Invariants
//! - Updates with no non-empty field are rejected before storage is touched.
//! - Duplicate detection is composite equality, never `id` alone.
//! - Aggregates are recomputed from a full scan on every call and contain
//!   no duplicate values.

use crate::model::book::{BookPatch, BookProjection, NewBook};
use crate::repo::catalog_repo::{
    CatalogRepository, DeleteOutcome, InsertOutcome, RepoError, UpdateOutcome,
};
use log::debug;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for catalog use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Update request carried no non-empty field.
    EmptyUpdate,
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUpdate => write!(f, "no fields to update"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::EmptyUpdate => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::EmptyUpdate => Self::EmptyUpdate,
            other => Self::Repo(other),
        }
    }
}

/// Create request body. Missing fields default to empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CreateBookRequest {
    pub id: String,
    pub title: String,
    pub author: String,
    pub pages: String,
    pub edition: String,
    pub year: String,
}

impl From<CreateBookRequest> for NewBook {
    fn from(value: CreateBookRequest) -> Self {
        NewBook {
            business_id: value.id,
            title: value.title,
            author: value.author,
            edition: value.edition,
            pages: value.pages,
            year: value.year,
        }
    }
}

/// Partial update request body. The path parameter selects the target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub pages: Option<String>,
    pub edition: Option<String>,
    pub year: Option<String>,
}

impl From<UpdateBookRequest> for BookPatch {
    fn from(value: UpdateBookRequest) -> Self {
        BookPatch {
            title: value.title,
            author: value.author,
            pages: value.pages,
            edition: value.edition,
            year: value.year,
        }
    }
}

/// Outcome of a create call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    Duplicate,
}

/// Catalog service facade over a repository implementation.
pub struct CatalogService<R: CatalogRepository> {
    repo: R,
}

impl<R: CatalogRepository> CatalogService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Returns the repository, e.g. to close it on shutdown.
    pub fn into_repository(self) -> R {
        self.repo
    }

    /// Lists every book projection in storage order.
    pub fn list_books(&self) -> ServiceResult<Vec<BookProjection>> {
        Ok(self.repo.find_all()?)
    }

    /// Gets one book by business id. `Ok(None)` when absent.
    pub fn get_book(&self, id: &str) -> ServiceResult<Option<BookProjection>> {
        let found = self.repo.find_by_business_id(id)?;
        if found.is_none() {
            debug!("event=book_get module=service status=no_match business_id={id}");
        }
        Ok(found.map(|record| record.projection()))
    }

    /// Inserts a book unless a composite-equal book exists.
    pub fn create_book(&self, request: CreateBookRequest) -> ServiceResult<CreateOutcome> {
        let candidate = NewBook::from(request);
        match self.repo.insert_if_unique(&candidate)? {
            InsertOutcome::Inserted(_) => Ok(CreateOutcome::Created),
            InsertOutcome::Conflict => {
                debug!(
                    "event=book_create module=service status=duplicate business_id={}",
                    candidate.business_id
                );
                Ok(CreateOutcome::Duplicate)
            }
        }
    }

    /// Merges the non-empty fields of `request` into book `id`.
    ///
    /// # Errors
    /// - `ServiceError::EmptyUpdate` when no field is non-empty.
    /// - `ServiceError::Repo` on storage failure.
    pub fn update_book(
        &self,
        id: &str,
        request: UpdateBookRequest,
    ) -> ServiceResult<UpdateOutcome> {
        let fields = BookPatch::from(request).effective_fields();
        if fields.is_empty() {
            return Err(ServiceError::EmptyUpdate);
        }
        Ok(self.repo.update_fields(id, &fields)?)
    }

    /// Deletes book `id`.
    pub fn delete_book(&self, id: &str) -> ServiceResult<DeleteOutcome> {
        Ok(self.repo.delete_by_business_id(id)?)
    }

    /// Distinct non-empty authors across the catalog.
    pub fn distinct_authors(&self) -> ServiceResult<Vec<String>> {
        Ok(distinct_authors(&self.repo.find_all()?))
    }

    /// Distinct publication years across the catalog.
    pub fn distinct_years(&self) -> ServiceResult<Vec<String>> {
        Ok(distinct_years(&self.repo.find_all()?))
    }
}

/// Deduplicates authors, skipping empty values.
// TODO: switch to a storage-level DISTINCT query once catalogs outgrow a full scan.
pub fn distinct_authors(books: &[BookProjection]) -> Vec<String> {
    books
        .iter()
        .filter(|book| !book.author.is_empty())
        .map(|book| book.author.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Deduplicates years. Empty years are kept as a value of their own.
pub fn distinct_years(books: &[BookProjection]) -> Vec<String> {
    books
        .iter()
        .map(|book| book.year.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{distinct_authors, distinct_years};
    use crate::model::book::BookProjection;

    fn book(author: &str, year: &str) -> BookProjection {
        BookProjection {
            author: author.to_string(),
            year: year.to_string(),
            ..BookProjection::default()
        }
    }

    #[test]
    fn distinct_authors_deduplicates_and_skips_empty() {
        let books = vec![
            book("Mary Shelley", "1818"),
            book("", "1900"),
            book("Mary Shelley", "1831"),
            book("Edgar Allan Poe", "1843"),
        ];
        assert_eq!(
            distinct_authors(&books),
            vec!["Edgar Allan Poe".to_string(), "Mary Shelley".to_string()]
        );
    }

    #[test]
    fn distinct_years_deduplicates() {
        let books = vec![book("a", "1843"), book("b", "1843"), book("c", "1818")];
        assert_eq!(
            distinct_years(&books),
            vec!["1818".to_string(), "1843".to_string()]
        );
    }

    #[test]
    fn distinct_of_empty_catalog_is_empty() {
        assert!(distinct_authors(&[]).is_empty());
        assert!(distinct_years(&[]).is_empty());
    }
}
