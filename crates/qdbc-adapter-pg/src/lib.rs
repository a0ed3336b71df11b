//! # qdbc-adapter-pg
//!
//! QuestDB connections over the Postgres wire protocol.
//!
//! [`connect`] opens a `sqlx` Postgres connection with QuestDB defaults,
//! wraps it so every statement is rewritten for QuestDB's dialect, and loads
//! the server's supported functions and keywords into the capability cache.
//!
//! ```no_run
//! use qdbc_adapter_pg::{connect, keywords};
//! use qdbc_core::ConnectConfig;
//! use sqlx::postgres::PgArguments;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut conn = connect(&ConnectConfig::default()).await?;
//!     let rows = conn
//!         .fetch_all("SELECT * FROM public.trades LIMIT 10", PgArguments::default())
//!         .await?;
//!     println!("{} rows, {} keywords", rows.len(), keywords().len());
//!     Ok(())
//! }
//! ```

pub mod capabilities;
pub mod connection;
pub mod defaults;
pub mod error;
pub mod introspect;
pub mod timestamp;

#[cfg(test)]
pub(crate) mod test_support;

use qdbc_core::ConnectConfig;
use sqlx::postgres::{PgArguments, PgConnectOptions, Postgres};
use sqlx::{Arguments, ConnectOptions};

pub use capabilities::{Capabilities, CapabilityCache, CapabilityList, function_names, keywords};
pub use connection::{PreparedStatement, QuestDbConnection, QuestDbStatement};
pub use error::ConnectError;
pub use introspect::IntrospectionSource;
pub use qdbc_rewrite::Statement;
pub use timestamp::UtcTimestamp;

/// Append a bind argument, surfacing encode failures as `sqlx::Error`.
pub fn args_add<T>(args: &mut PgArguments, v: T) -> Result<(), sqlx::Error>
where
    T: Send + Sync + 'static,
    for<'q> T: sqlx::Encode<'q, Postgres> + sqlx::Type<Postgres>,
{
    args.add(v).map_err(sqlx::Error::Encode)
}

/// Driver options for `config`, with unrecognized options forwarded.
pub fn connect_options(config: &ConnectConfig) -> Result<PgConnectOptions, ConnectError> {
    let url = config.connection_url()?;
    PgConnectOptions::from_url(&url).map_err(ConnectError::Options)
}

/// Open a connection using the process-wide capability cache.
pub async fn connect(config: &ConnectConfig) -> Result<QuestDbConnection, ConnectError> {
    connect_with_cache(config, CapabilityCache::global()).await
}

/// Open a connection and populate `cache` from it if it is still empty.
pub async fn connect_with_cache(
    config: &ConnectConfig,
    cache: &CapabilityCache,
) -> Result<QuestDbConnection, ConnectError> {
    let options = connect_options(config)?;

    tracing::info!(target_db = %config.target(), "Connecting to QuestDB");

    let conn = options.connect().await.map_err(ConnectError::Connect)?;
    let mut connection = QuestDbConnection::new(conn);

    let capabilities = load_capabilities(&mut connection, cache).await?;
    connection.set_capabilities(capabilities);
    Ok(connection)
}

/// Populate `cache` through `source` and return the snapshot to attach to the
/// new connection.
async fn load_capabilities<S>(
    source: &mut S,
    cache: &CapabilityCache,
) -> Result<Capabilities, ConnectError>
where
    S: IntrospectionSource + ?Sized,
{
    let capabilities = cache
        .populate(source)
        .await
        .map_err(ConnectError::Introspection)?;

    tracing::debug!(
        function_names = capabilities.function_names().len(),
        keywords = capabilities.keywords().len(),
        "Server capabilities ready"
    );

    Ok(capabilities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::{FUNCTION_NAMES_QUERY, KEYWORDS_QUERY};
    use crate::test_support::{FakeServer, Reply};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_connect_options_apply_defaults() {
        let options = connect_options(&ConnectConfig::default()).unwrap();
        assert_eq!(options.get_host(), "127.0.0.1");
        assert_eq!(options.get_port(), 8812);
        assert_eq!(options.get_username(), "admin");
        assert_eq!(options.get_database(), Some("main"));
    }

    #[test]
    fn test_connect_options_forward_application_name() {
        let config =
            ConnectConfig::from_pairs([("host", "questdb"), ("application_name", "grafana")])
                .unwrap();
        let options = connect_options(&config).unwrap();
        assert_eq!(options.get_host(), "questdb");
        assert_eq!(options.get_application_name(), Some("grafana"));
    }

    #[test]
    fn test_connect_options_reject_bad_driver_option() {
        let config = ConnectConfig::from_pairs([("sslmode", "sometimes")]).unwrap();
        let err = connect_options(&config).unwrap_err();
        assert!(matches!(err, ConnectError::Options(_)));
        assert!(err.to_string().starts_with("invalid driver option"));
    }

    #[test]
    fn test_args_add() {
        let mut args = PgArguments::default();
        args_add(&mut args, 42_i64).unwrap();
        args_add(&mut args, "BTC-USD".to_string()).unwrap();
        assert_eq!(args.len(), 2);
    }

    #[tokio::test]
    async fn test_unreachable_server_propagates_and_leaves_cache_empty() {
        let cache = CapabilityCache::new();
        let config = ConnectConfig::from_pairs([("host", "127.0.0.1"), ("port", "1")]).unwrap();

        let err = connect_with_cache(&config, &cache).await.unwrap_err();

        assert!(matches!(err, ConnectError::Connect(_)));
        assert!(cache.function_names().is_empty());
        assert!(cache.keywords().is_empty());
    }

    #[tokio::test]
    async fn test_load_capabilities_populates_both_lists() {
        let cache = CapabilityCache::new();
        let mut server = FakeServer::default()
            .reply(FUNCTION_NAMES_QUERY, Reply::Rows(vec!["now", "sum"]))
            .reply(KEYWORDS_QUERY, Reply::Rows(vec!["select"]));

        let caps = load_capabilities(&mut server, &cache).await.unwrap();

        assert_eq!(
            server.queries,
            vec![FUNCTION_NAMES_QUERY.to_string(), KEYWORDS_QUERY.to_string()]
        );
        assert_eq!(caps.function_names(), cache.function_names());
        assert_eq!(caps.keywords(), cache.keywords());
        assert_eq!(caps.function_names().len(), 2);
        assert_eq!(caps.keywords().len(), 1);
    }

    #[tokio::test]
    async fn test_load_capabilities_reports_introspection_failure() {
        let cache = CapabilityCache::new();
        let mut server = FakeServer::default()
            .reply(FUNCTION_NAMES_QUERY, Reply::Rows(vec!["now"]))
            .reply(KEYWORDS_QUERY, Reply::Disconnected);

        let err = load_capabilities(&mut server, &cache).await.unwrap_err();

        assert!(matches!(err, ConnectError::Introspection(sqlx::Error::Io(_))));
        assert!(cache.keywords().is_empty());
    }
}
