//! CLI command implementations for qdbc.

pub mod capabilities;
pub mod query;
pub mod rewrite;
