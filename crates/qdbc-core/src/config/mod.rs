//! Configuration types for qdbc.
//!
//! A QuestDB connection is described by a flat set of named options. The
//! well-known ones (`host`, `port`, `username`, `password`, `database`) have
//! QuestDB defaults; anything else is carried along untouched and handed to
//! the Postgres driver.
//!
//! Configuration can be built in code, parsed from key/value pairs, or loaded
//! from a YAML file such as:
//!
//! ```yaml
//! host: questdb.internal
//! port: 8812
//! username: admin
//! password_env: QDB_PASSWORD
//! sslmode: "disable"
//! statement-cache-capacity: 100
//! ```

pub mod connect;

use thiserror::Error;

pub use connect::{
    ConnectConfig, DEFAULT_DATABASE, DEFAULT_HOST, DEFAULT_PASSWORD, DEFAULT_PORT,
    DEFAULT_USERNAME,
};

/// Errors raised while loading or resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A known option carried a value of the wrong shape.
    #[error("invalid value for option '{key}': {value}")]
    InvalidOption { key: String, value: String },

    #[error("invalid connection URL: {0}")]
    Url(#[from] url::ParseError),

    /// The host cannot carry the given URL component.
    #[error("cannot set {component} on postgres://{authority}")]
    UrlComponent {
        component: &'static str,
        authority: String,
    },
}
