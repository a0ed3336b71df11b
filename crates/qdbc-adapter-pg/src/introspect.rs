//! Server introspection queries.

use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgConnection, PgRow};
use sqlx::Row;

use crate::connection::QuestDbConnection;

/// Lists every function the server supports, one name per row.
pub const FUNCTION_NAMES_QUERY: &str = "SELECT name FROM functions()";

/// Lists every reserved keyword, one per row.
pub const KEYWORDS_QUERY: &str = "SELECT keyword FROM keywords()";

/// Something that can answer a single-column introspection query.
#[async_trait]
pub trait IntrospectionSource: Send {
    /// Run `sql` and return the first column of every row, in server order.
    /// NULL values are skipped.
    async fn fetch_strings(&mut self, sql: &str) -> Result<Vec<String>, sqlx::Error>;
}

#[async_trait]
impl IntrospectionSource for PgConnection {
    async fn fetch_strings(&mut self, sql: &str) -> Result<Vec<String>, sqlx::Error> {
        let rows = sqlx::query(sql).fetch_all(&mut *self).await?;
        first_column(&rows)
    }
}

#[async_trait]
impl IntrospectionSource for QuestDbConnection {
    async fn fetch_strings(&mut self, sql: &str) -> Result<Vec<String>, sqlx::Error> {
        let rows = self.fetch_all(sql, PgArguments::default()).await?;
        first_column(&rows)
    }
}

fn first_column(rows: &[PgRow]) -> Result<Vec<String>, sqlx::Error> {
    let values = rows
        .iter()
        .map(|row| row.try_get::<Option<String>, _>(0))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(skip_nulls(values))
}

fn skip_nulls(values: Vec<Option<String>>) -> Vec<String> {
    let total = values.len();
    let names: Vec<String> = values.into_iter().flatten().collect();
    if names.len() < total {
        tracing::debug!(skipped = total - names.len(), "Ignoring NULL introspection rows");
    }
    names
}
