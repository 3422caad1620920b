//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas required by core behavior.
//!
//! # Invariants
//! - Returned connections carry a busy timeout equal to `CONNECT_TIMEOUT`.
//! - Every open attempt emits one `db_open` start event and one outcome event.

use super::endpoint::StorageEndpoint;
use super::DbResult;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Upper bound for the initial storage connection and for lock waits.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Opens the store selected by a parsed connection string.
///
/// # Side effects
/// - Creates the database file when it does not exist yet.
/// - Emits `db_open` logging events with duration and status.
pub fn open_store(endpoint: &StorageEndpoint) -> DbResult<Connection> {
    let mode = endpoint.mode();
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode} endpoint={endpoint}");

    let opened = match endpoint {
        StorageEndpoint::File(path) => Connection::open(path),
        StorageEndpoint::Memory => Connection::open_in_memory(),
    };
    let conn = match opened {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match configure_connection(&conn) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_configure_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

/// Opens a SQLite database file.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_store(&StorageEndpoint::File(path.as_ref().to_path_buf()))
}

/// Opens a private in-memory SQLite database.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_store(&StorageEndpoint::Memory)
}

fn configure_connection(conn: &Connection) -> DbResult<()> {
    conn.busy_timeout(CONNECT_TIMEOUT)?;
    // Forces the file header to be read so a corrupt or foreign file fails here.
    conn.query_row("SELECT COUNT(*) FROM sqlite_master;", [], |row| {
        row.get::<_, i64>(0)
    })?;
    Ok(())
}
