//! Error types for the adapter crate.

use qdbc_core::ConfigError;
use thiserror::Error;

/// Errors that can occur while opening a QuestDB connection.
///
/// Statement execution on an open connection returns the driver's
/// `sqlx::Error` unchanged.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// The configuration could not be turned into connection options.
    #[error("invalid connection configuration: {0}")]
    Config(#[from] ConfigError),

    /// A passthrough option was rejected by the driver. No connection was
    /// attempted.
    #[error("invalid driver option: {0}")]
    Options(#[source] sqlx::Error),

    /// The connection could not be established.
    #[error("failed to connect to QuestDB: {0}")]
    Connect(#[source] sqlx::Error),

    /// Capability discovery failed with a non-database error.
    #[error("failed to load server capabilities: {0}")]
    Introspection(#[source] sqlx::Error),
}
