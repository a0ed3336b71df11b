// Configuration types shared across all qdbc crates
pub mod config;

// Re-export commonly used config types for convenience
pub use config::{
    ConfigError, ConnectConfig, DEFAULT_DATABASE, DEFAULT_HOST, DEFAULT_PASSWORD, DEFAULT_PORT,
    DEFAULT_USERNAME,
};
