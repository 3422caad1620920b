//! Command-line and environment configuration.

use bookstore_core::db::{
    CollectionName, DbResult, StorageEndpoint, DATABASE_URI_ENV, DEFAULT_COLLECTION,
    DEFAULT_DATABASE_URI,
};
use bookstore_core::default_log_level;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default HTTP bind address.
pub const DEFAULT_BIND: &str = "0.0.0.0:3000";

/// Default static stylesheet directory served under `/css`.
pub const DEFAULT_CSS_DIR: &str = "css";

/// Book catalog service with HTML views and a JSON API.
#[derive(Parser, Debug)]
#[command(name = "bookstore")]
#[command(version)]
pub struct Cli {
    /// Storage connection string (`sqlite://<path>`, `file:<path>` or `sqlite::memory:`)
    #[arg(long, env = DATABASE_URI_ENV, default_value = DEFAULT_DATABASE_URI)]
    pub database_uri: String,

    /// Collection holding book documents
    #[arg(long, env = "BOOKSTORE_COLLECTION", default_value = DEFAULT_COLLECTION)]
    pub collection: String,

    /// HTTP bind address
    #[arg(long, env = "BOOKSTORE_BIND", default_value = DEFAULT_BIND)]
    pub bind: SocketAddr,

    /// Directory served under `/css`
    #[arg(long, env = "BOOKSTORE_CSS_DIR", default_value = DEFAULT_CSS_DIR)]
    pub css_dir: PathBuf,

    /// Log level (trace|debug|info|warn|error); defaults per build mode
    #[arg(long, env = "BOOKSTORE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files; stderr when unset
    #[arg(long, env = "BOOKSTORE_LOG_DIR")]
    pub log_dir: Option<String>,
}

/// Storage selection resolved from the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub endpoint: StorageEndpoint,
    pub collection: CollectionName,
}

/// Validated server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub storage: StorageConfig,
    pub bind: SocketAddr,
    pub css_dir: PathBuf,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl Cli {
    /// Validates the connection string and collection name.
    pub fn into_config(self) -> DbResult<ServerConfig> {
        Ok(ServerConfig {
            storage: StorageConfig {
                endpoint: StorageEndpoint::parse(&self.database_uri)?,
                collection: CollectionName::parse(&self.collection)?,
            },
            bind: self.bind,
            css_dir: self.css_dir,
            log_level: self
                .log_level
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir: self.log_dir,
        })
    }
}
