//! Shared request state.

use crate::error::ApiError;
use bookstore_core::{CatalogService, ServiceResult, SqliteCatalogRepository, ViewRenderer};
use std::sync::Arc;

/// Catalog service over the shared SQLite store.
pub type Catalog = CatalogService<SqliteCatalogRepository>;

/// State cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub renderer: Arc<dyn ViewRenderer>,
}

impl AppState {
    pub fn new(catalog: Arc<Catalog>, renderer: Arc<dyn ViewRenderer>) -> Self {
        Self { catalog, renderer }
    }

    /// Runs a blocking catalog call off the async workers.
    pub async fn with_catalog<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Catalog) -> ServiceResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let catalog = Arc::clone(&self.catalog);
        let joined = tokio::task::spawn_blocking(move || op(&catalog)).await;
        match joined {
            Ok(result) => result.map_err(ApiError::from),
            Err(err) => Err(ApiError::Worker(err.to_string())),
        }
    }
}
