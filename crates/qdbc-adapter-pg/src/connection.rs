//! A Postgres connection that speaks QuestDB's dialect.
//!
//! Every text statement executed through [`QuestDbConnection`] has its
//! `public` schema qualifiers removed before it reaches the server. Bound
//! arguments and already prepared statements are passed to the driver as-is.

use qdbc_rewrite::{Statement, remove_public_schema};
use sqlx::postgres::{PgArguments, PgConnection, PgQueryResult, PgRow, PgStatement};
use sqlx::Statement as _;
use sqlx::{Connection, Executor};

use crate::capabilities::Capabilities;

/// A statement prepared on a [`QuestDbConnection`].
pub type PreparedStatement = PgStatement<'static>;

/// Text or prepared statement accepted by [`QuestDbConnection`].
pub type QuestDbStatement<'q> = Statement<'q, &'q PreparedStatement>;

/// An open connection whose statements are rewritten for QuestDB.
pub struct QuestDbConnection {
    conn: PgConnection,
    capabilities: Capabilities,
}

impl std::fmt::Debug for QuestDbConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuestDbConnection")
            .field("function_names", &self.capabilities.function_names().len())
            .field("keywords", &self.capabilities.keywords().len())
            .finish_non_exhaustive()
    }
}

impl QuestDbConnection {
    pub(crate) fn new(conn: PgConnection) -> Self {
        Self {
            conn,
            capabilities: Capabilities::default(),
        }
    }

    pub(crate) fn set_capabilities(&mut self, capabilities: Capabilities) {
        self.capabilities = capabilities;
    }

    /// Server capabilities captured when this connection was opened.
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Execute a statement and return the number of affected rows.
    pub async fn execute<'q>(
        &mut self,
        statement: impl Into<QuestDbStatement<'q>>,
        args: PgArguments,
    ) -> Result<PgQueryResult, sqlx::Error> {
        match statement.into().without_public_schema() {
            Statement::Text(sql) => sqlx::query_with(&sql, args).execute(&mut self.conn).await,
            Statement::Prepared(prepared) => {
                prepared.query_with(args).execute(&mut self.conn).await
            }
        }
    }

    /// Execute a statement and collect every returned row.
    pub async fn fetch_all<'q>(
        &mut self,
        statement: impl Into<QuestDbStatement<'q>>,
        args: PgArguments,
    ) -> Result<Vec<PgRow>, sqlx::Error> {
        match statement.into().without_public_schema() {
            Statement::Text(sql) => sqlx::query_with(&sql, args).fetch_all(&mut self.conn).await,
            Statement::Prepared(prepared) => {
                prepared.query_with(args).fetch_all(&mut self.conn).await
            }
        }
    }

    /// Execute a statement that must return exactly one row.
    pub async fn fetch_one<'q>(
        &mut self,
        statement: impl Into<QuestDbStatement<'q>>,
        args: PgArguments,
    ) -> Result<PgRow, sqlx::Error> {
        match statement.into().without_public_schema() {
            Statement::Text(sql) => sqlx::query_with(&sql, args).fetch_one(&mut self.conn).await,
            Statement::Prepared(prepared) => {
                prepared.query_with(args).fetch_one(&mut self.conn).await
            }
        }
    }

    /// Execute a statement returning at most one row.
    pub async fn fetch_optional<'q>(
        &mut self,
        statement: impl Into<QuestDbStatement<'q>>,
        args: PgArguments,
    ) -> Result<Option<PgRow>, sqlx::Error> {
        match statement.into().without_public_schema() {
            Statement::Text(sql) => {
                sqlx::query_with(&sql, args)
                    .fetch_optional(&mut self.conn)
                    .await
            }
            Statement::Prepared(prepared) => {
                prepared.query_with(args).fetch_optional(&mut self.conn).await
            }
        }
    }

    /// Prepare a statement on the server. The SQL is rewritten once, here;
    /// executing the returned statement skips the rewriter.
    pub async fn prepare(&mut self, sql: &str) -> Result<PreparedStatement, sqlx::Error> {
        let sql = remove_public_schema(sql);
        let statement = Executor::prepare(&mut self.conn, &sql).await?;
        Ok(sqlx::Statement::to_owned(&statement))
    }

    /// Check that the connection is still alive.
    pub async fn ping(&mut self) -> Result<(), sqlx::Error> {
        self.conn.ping().await
    }

    /// Close the connection gracefully.
    pub async fn close(self) -> Result<(), sqlx::Error> {
        self.conn.close().await
    }

    /// The underlying driver connection. Statements issued on it directly are
    /// not rewritten.
    pub fn as_pg_connection(&mut self) -> &mut PgConnection {
        &mut self.conn
    }
}
