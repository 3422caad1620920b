//! Core domain logic for the bookstore catalog.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;
pub mod service;
pub mod view;

pub use db::{CollectionName, DbError, StorageEndpoint};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::book::{
    BookField, BookPatch, BookProjection, BookRecord, FieldSet, NewBook, StorageKey,
};
pub use repo::catalog_repo::{
    CatalogRepository, DeleteOutcome, InsertOutcome, RepoError, RepoResult,
    SqliteCatalogRepository, UpdateOutcome,
};
pub use seed::{canonical_books, seed_catalog, SeedError, SeedReport};
pub use service::catalog_service::{
    CatalogService, CreateBookRequest, CreateOutcome, ServiceError, ServiceResult,
    UpdateBookRequest,
};
pub use view::{CatalogViews, RenderError, ViewData, ViewModel, ViewName, ViewRenderer};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
