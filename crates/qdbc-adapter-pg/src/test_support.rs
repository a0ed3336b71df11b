//! Scripted introspection sources for unit tests.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::introspect::IntrospectionSource;

#[derive(Debug)]
pub struct UnknownFunction;

impl std::fmt::Display for UnknownFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("unknown function name")
    }
}

impl std::error::Error for UnknownFunction {}

impl sqlx::error::DatabaseError for UnknownFunction {
    fn message(&self) -> &str {
        "unknown function name"
    }

    fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
        self
    }

    fn kind(&self) -> sqlx::error::ErrorKind {
        sqlx::error::ErrorKind::Other
    }
}

pub enum Reply {
    Rows(Vec<&'static str>),
    DatabaseError,
    Disconnected,
}

/// Answers each query with a fixed reply and records what was asked.
#[derive(Default)]
pub struct FakeServer {
    replies: HashMap<&'static str, Reply>,
    pub queries: Vec<String>,
}

impl FakeServer {
    pub fn reply(mut self, sql: &'static str, reply: Reply) -> Self {
        self.replies.insert(sql, reply);
        self
    }
}

#[async_trait]
impl IntrospectionSource for FakeServer {
    async fn fetch_strings(&mut self, sql: &str) -> Result<Vec<String>, sqlx::Error> {
        self.queries.push(sql.to_string());
        match self.replies.get(sql) {
            Some(Reply::Rows(rows)) => Ok(rows.iter().map(|r| r.to_string()).collect()),
            Some(Reply::DatabaseError) => Err(sqlx::Error::Database(Box::new(UnknownFunction))),
            Some(Reply::Disconnected) | None => Err(sqlx::Error::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset",
            ))),
        }
    }
}
