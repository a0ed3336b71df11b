//! # qdbc-rewrite
//!
//! SQL rewriting for QuestDB's Postgres dialect.
//!
//! QuestDB speaks the Postgres wire protocol but has no `public` schema, so
//! statements generated by Postgres-oriented tools fail as soon as they
//! qualify a table name. This crate strips those qualifiers textually before
//! a statement leaves the client.
//!
//! **Before (from the tool):**
//! ```sql
//! SELECT * FROM public.trades WHERE symbol = 'BTC-USD'
//! ```
//!
//! **After (to QuestDB):**
//! ```sql
//! SELECT * FROM trades WHERE symbol = 'BTC-USD'
//! ```
//!
//! ## Recognized qualifiers
//!
//! | Form | Example |
//! |------|---------|
//! | bare | `public.trades` |
//! | single-quoted | `'public'.trades` |
//! | double-quoted | `"public".trades` |
//!
//! Matching is case-insensitive. `public` inside a longer identifier
//! (`publication`, `my_public.t`) is never touched.

pub mod filter;
pub mod statement;

pub use filter::{PublicSchemaFilter, remove_public_schema};
pub use statement::Statement;
