//! Startup bootstrap and shutdown wiring.
//!
//! # Invariants
//! - The store is opened, its collection ensured and the seed pass applied
//!   before the listener accepts connections.
//! - Any startup failure is returned to `main` and ends the process.

use crate::config::StorageConfig;
use anyhow::{anyhow, Context};
use bookstore_core::db::{open_store, CONNECT_TIMEOUT};
use bookstore_core::{
    canonical_books, seed_catalog, CatalogRepository, RepoError, SeedReport,
    SqliteCatalogRepository,
};
use log::info;

/// Opens the store within `CONNECT_TIMEOUT` and ensures the collection.
pub async fn open_catalog(storage: &StorageConfig) -> anyhow::Result<SqliteCatalogRepository> {
    let endpoint = storage.endpoint.clone();
    let collection = storage.collection.clone();
    let task = tokio::task::spawn_blocking(move || -> Result<SqliteCatalogRepository, RepoError> {
        let conn = open_store(&endpoint)?;
        SqliteCatalogRepository::try_new(conn, collection)
    });

    let joined = tokio::time::timeout(CONNECT_TIMEOUT, task)
        .await
        .map_err(|_| {
            anyhow!(
                "storage at {} did not open within {}s",
                storage.endpoint,
                CONNECT_TIMEOUT.as_secs()
            )
        })?;
    let repo = joined
        .context("storage bootstrap task failed")?
        .with_context(|| format!("failed to open catalog store at {}", storage.endpoint))?;
    Ok(repo)
}

/// Runs the canonical seed pass and returns the repository with its report.
pub async fn seed_canonical(
    repo: SqliteCatalogRepository,
) -> anyhow::Result<(SqliteCatalogRepository, SeedReport)> {
    let (repo, seeded) = tokio::task::spawn_blocking(move || {
        let seeded = seed_catalog(&repo, &canonical_books());
        (repo, seeded)
    })
    .await
    .context("seed task failed")?;
    let report = seeded.context("seed pass failed")?;
    Ok((repo, report))
}

/// Opens, ensures and seeds the configured store.
pub async fn bootstrap_catalog(
    storage: &StorageConfig,
) -> anyhow::Result<SqliteCatalogRepository> {
    let repo = open_catalog(storage).await?;
    let (repo, report) = seed_canonical(repo).await?;
    info!(
        "event=bootstrap module=server status=ok collection={} inserted={} skipped={} documents={}",
        repo.collection(),
        report.inserted,
        report.skipped,
        repo.count().context("failed to count documents after seeding")?
    );
    Ok(repo)
}

/// Resolves on ctrl-c, or on SIGTERM where available.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    info!("event=server_stop module=server status=signal");
}

#[cfg(test)]
mod tests {
    use super::bootstrap_catalog;
    use crate::config::StorageConfig;
    use bookstore_core::db::open_db;
    use bookstore_core::{
        canonical_books, CatalogRepository, CollectionName, SeedError, SqliteCatalogRepository,
        StorageEndpoint,
    };
    use std::path::Path;

    fn storage_at(path: &Path) -> StorageConfig {
        StorageConfig {
            endpoint: StorageEndpoint::File(path.to_path_buf()),
            collection: CollectionName::default(),
        }
    }

    #[tokio::test]
    async fn bootstrap_seeds_a_fresh_store_once() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_at(&dir.path().join("bookstore.sqlite3"));

        let repo = bootstrap_catalog(&storage).await.expect("fresh store should bootstrap");
        assert_eq!(repo.count().unwrap(), 3);
        repo.close().unwrap();

        let repo = bootstrap_catalog(&storage).await.expect("reopen should bootstrap");
        assert_eq!(repo.count().unwrap(), 3);
    }

    #[tokio::test]
    async fn bootstrap_fails_on_a_non_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-a-db.sqlite3");
        std::fs::write(&path, vec![b'x'; 4096]).unwrap();

        assert!(bootstrap_catalog(&storage_at(&path)).await.is_err());
    }

    #[tokio::test]
    async fn bootstrap_fails_when_a_canonical_book_is_ambiguous() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookstore.sqlite3");
        {
            let conn = open_db(&path).unwrap();
            let repo = SqliteCatalogRepository::try_new(conn, CollectionName::default()).unwrap();
            let vortex = &canonical_books()[0];
            repo.insert(vortex).unwrap();
            repo.insert(vortex).unwrap();
            repo.close().unwrap();
        }

        let err = bootstrap_catalog(&storage_at(&path))
            .await
            .expect_err("duplicate canonical copies must stop startup");
        let ambiguous = err.chain().find_map(|cause| cause.downcast_ref::<SeedError>());
        assert!(matches!(
            ambiguous,
            Some(SeedError::Ambiguous { business_id, matches: 2 }) if business_id == "example1"
        ));
    }
}
