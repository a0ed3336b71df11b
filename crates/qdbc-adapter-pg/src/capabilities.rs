//! Server capability discovery.
//!
//! QuestDB reports the functions and reserved keywords it supports through
//! two table functions, `functions()` and `keywords()`. Consumers such as
//! autocompletion or statement validation read those lists from here.
//!
//! Each list is loaded at most once per [`CapabilityCache`], the first time a
//! connection is opened against it:
//!
//! - a successful query stores the returned rows as-is, in server order;
//! - a database error (older servers lack these tables) stores the built-in
//!   default list instead;
//! - any other error is returned to the caller and nothing is stored;
//! - an empty result stores nothing, so the next connection asks again.
//!
//! Once stored, a list is frozen for the lifetime of the cache.

use std::sync::{Arc, LazyLock};

use tokio::sync::OnceCell;

use crate::defaults::{DEFAULT_FUNCTION_NAMES, DEFAULT_KEYWORDS};
use crate::introspect::{FUNCTION_NAMES_QUERY, IntrospectionSource, KEYWORDS_QUERY};

/// Shared, immutable list of names.
pub type CapabilityList = Arc<[String]>;

static GLOBAL_CACHE: LazyLock<CapabilityCache> = LazyLock::new(CapabilityCache::new);

/// Function names known to the process-wide cache. Empty until a connection
/// has been opened with [`crate::connect`].
pub fn function_names() -> &'static [String] {
    CapabilityCache::global().function_names()
}

/// Reserved keywords known to the process-wide cache. Empty until a
/// connection has been opened with [`crate::connect`].
pub fn keywords() -> &'static [String] {
    CapabilityCache::global().keywords()
}

/// Lazily populated function-name and keyword lists.
///
/// Population is guarded per list, so concurrent first connections run the
/// introspection query once and everyone observes the same result.
#[derive(Debug, Default)]
pub struct CapabilityCache {
    function_names: OnceCell<CapabilityList>,
    keywords: OnceCell<CapabilityList>,
}

impl CapabilityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache used by [`crate::connect`].
    pub fn global() -> &'static CapabilityCache {
        &GLOBAL_CACHE
    }

    pub fn function_names(&self) -> &[String] {
        self.function_names.get().map(|l| &l[..]).unwrap_or(&[])
    }

    pub fn keywords(&self) -> &[String] {
        self.keywords.get().map(|l| &l[..]).unwrap_or(&[])
    }

    /// Current contents as a snapshot.
    pub fn snapshot(&self) -> Capabilities {
        Capabilities {
            function_names: self.function_names.get().cloned().unwrap_or_default(),
            keywords: self.keywords.get().cloned().unwrap_or_default(),
        }
    }

    /// Load whichever lists are not populated yet and return a snapshot.
    ///
    /// Only non-database errors are returned; database errors fall back to
    /// the built-in lists.
    pub async fn populate<S>(&self, source: &mut S) -> Result<Capabilities, sqlx::Error>
    where
        S: IntrospectionSource + ?Sized,
    {
        let function_names = populate_list(
            &self.function_names,
            source,
            FUNCTION_NAMES_QUERY,
            DEFAULT_FUNCTION_NAMES,
        )
        .await?;
        let keywords =
            populate_list(&self.keywords, source, KEYWORDS_QUERY, DEFAULT_KEYWORDS).await?;

        Ok(Capabilities {
            function_names,
            keywords,
        })
    }

    /// Forget both lists so the next connection queries the server again.
    pub fn reset(&mut self) {
        self.function_names.take();
        self.keywords.take();
    }
}

enum LoadError {
    /// The server answered with no rows; leave the list unpopulated.
    Empty,
    Sql(sqlx::Error),
}

async fn populate_list<S>(
    cell: &OnceCell<CapabilityList>,
    source: &mut S,
    sql: &str,
    defaults: &[&str],
) -> Result<CapabilityList, sqlx::Error>
where
    S: IntrospectionSource + ?Sized,
{
    match cell.get_or_try_init(move || load_list(source, sql, defaults)).await {
        Ok(list) => Ok(list.clone()),
        Err(LoadError::Empty) => Ok(CapabilityList::default()),
        Err(LoadError::Sql(e)) => Err(e),
    }
}

async fn load_list<S>(
    source: &mut S,
    sql: &str,
    defaults: &[&str],
) -> Result<CapabilityList, LoadError>
where
    S: IntrospectionSource + ?Sized,
{
    match source.fetch_strings(sql).await {
        Ok(values) if values.is_empty() => {
            tracing::debug!(query = sql, "Introspection returned no rows");
            Err(LoadError::Empty)
        }
        Ok(values) => {
            tracing::debug!(query = sql, count = values.len(), "Loaded capability list");
            Ok(values.into())
        }
        Err(sqlx::Error::Database(e)) => {
            tracing::debug!(
                query = sql,
                error = %e,
                "Introspection unsupported, using built-in list"
            );
            Ok(defaults.iter().map(|s| s.to_string()).collect())
        }
        Err(e) => Err(LoadError::Sql(e)),
    }
}

/// Capability lists as seen by one connection.
#[derive(Debug, Clone, Default)]
pub struct Capabilities {
    function_names: CapabilityList,
    keywords: CapabilityList,
}

impl Capabilities {
    pub fn function_names(&self) -> &[String] {
        &self.function_names
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Case-insensitive function lookup.
    pub fn supports_function(&self, name: &str) -> bool {
        self.function_names
            .iter()
            .any(|f| f.eq_ignore_ascii_case(name))
    }

    /// Case-insensitive keyword lookup.
    pub fn is_keyword(&self, word: &str) -> bool {
        self.keywords.iter().any(|k| k.eq_ignore_ascii_case(word))
    }

    /// Function names then keywords starting with `prefix` (case-insensitive),
    /// without duplicates.
    pub fn completions(&self, prefix: &str) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for candidate in self.function_names.iter().chain(self.keywords.iter()) {
            if starts_with_ignore_case(candidate, prefix) && !out.contains(&candidate.as_str()) {
                out.push(candidate);
            }
        }
        out
    }
}

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value.len() >= prefix.len()
        && value.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeServer, Reply};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_populates_from_server_rows() {
        let cache = CapabilityCache::new();
        let mut server = FakeServer::default()
            .reply(FUNCTION_NAMES_QUERY, Reply::Rows(vec!["now", "sum"]))
            .reply(KEYWORDS_QUERY, Reply::Rows(vec!["select", "sample"]));

        let caps = cache.populate(&mut server).await.unwrap();

        assert_eq!(cache.function_names(), strings(&["now", "sum"]).as_slice());
        assert_eq!(cache.keywords(), strings(&["select", "sample"]).as_slice());
        assert_eq!(caps.function_names(), cache.function_names());
        assert_eq!(caps.keywords(), cache.keywords());
    }

    #[tokio::test]
    async fn test_keeps_server_order_and_duplicates() {
        let cache = CapabilityCache::new();
        let mut server = FakeServer::default()
            .reply(FUNCTION_NAMES_QUERY, Reply::Rows(vec!["sum", "avg", "sum"]))
            .reply(KEYWORDS_QUERY, Reply::Rows(vec!["from"]));

        cache.populate(&mut server).await.unwrap();

        assert_eq!(cache.function_names(), strings(&["sum", "avg", "sum"]).as_slice());
    }

    #[tokio::test]
    async fn test_database_error_uses_builtin_list() {
        let cache = CapabilityCache::new();
        let mut server = FakeServer::default()
            .reply(FUNCTION_NAMES_QUERY, Reply::DatabaseError)
            .reply(KEYWORDS_QUERY, Reply::Rows(vec!["select"]));

        cache.populate(&mut server).await.unwrap();

        assert_eq!(cache.function_names(), strings(DEFAULT_FUNCTION_NAMES).as_slice());
        // Keywords are loaded independently of the failed function query.
        assert_eq!(cache.keywords(), strings(&["select"]).as_slice());
    }

    #[tokio::test]
    async fn test_keyword_database_error_uses_builtin_list() {
        let cache = CapabilityCache::new();
        let mut server = FakeServer::default()
            .reply(FUNCTION_NAMES_QUERY, Reply::Rows(vec!["now"]))
            .reply(KEYWORDS_QUERY, Reply::DatabaseError);

        cache.populate(&mut server).await.unwrap();

        assert_eq!(cache.function_names(), strings(&["now"]).as_slice());
        assert_eq!(cache.keywords(), strings(DEFAULT_KEYWORDS).as_slice());
    }

    #[tokio::test]
    async fn test_second_populate_does_not_requery() {
        let cache = CapabilityCache::new();
        let mut first = FakeServer::default()
            .reply(FUNCTION_NAMES_QUERY, Reply::Rows(vec!["now", "sum"]))
            .reply(KEYWORDS_QUERY, Reply::Rows(vec!["select"]));
        cache.populate(&mut first).await.unwrap();

        let mut second = FakeServer::default()
            .reply(FUNCTION_NAMES_QUERY, Reply::Rows(vec!["other"]))
            .reply(KEYWORDS_QUERY, Reply::Rows(vec!["other"]));
        let caps = cache.populate(&mut second).await.unwrap();

        assert!(second.queries.is_empty());
        assert_eq!(caps.function_names(), strings(&["now", "sum"]).as_slice());
        assert_eq!(cache.function_names().len(), 2);
    }

    #[tokio::test]
    async fn test_non_database_error_propagates() {
        let cache = CapabilityCache::new();
        let mut server = FakeServer::default()
            .reply(FUNCTION_NAMES_QUERY, Reply::Disconnected)
            .reply(KEYWORDS_QUERY, Reply::Rows(vec!["select"]));

        let err = cache.populate(&mut server).await.unwrap_err();

        assert!(matches!(err, sqlx::Error::Io(_)));
        assert!(cache.function_names().is_empty());
    }

    #[tokio::test]
    async fn test_empty_result_is_retried() {
        let cache = CapabilityCache::new();
        let mut empty = FakeServer::default()
            .reply(FUNCTION_NAMES_QUERY, Reply::Rows(vec![]))
            .reply(KEYWORDS_QUERY, Reply::Rows(vec!["select"]));
        let caps = cache.populate(&mut empty).await.unwrap();
        assert!(caps.function_names().is_empty());
        assert!(cache.function_names().is_empty());

        let mut server = FakeServer::default()
            .reply(FUNCTION_NAMES_QUERY, Reply::Rows(vec!["now"]))
            .reply(KEYWORDS_QUERY, Reply::Rows(vec!["other"]));
        cache.populate(&mut server).await.unwrap();

        assert_eq!(server.queries, vec![FUNCTION_NAMES_QUERY.to_string()]);
        assert_eq!(cache.function_names(), strings(&["now"]).as_slice());
        assert_eq!(cache.keywords(), strings(&["select"]).as_slice());
    }

    #[tokio::test]
    async fn test_reset_forgets_lists() {
        let mut cache = CapabilityCache::new();
        let mut server = FakeServer::default()
            .reply(FUNCTION_NAMES_QUERY, Reply::Rows(vec!["now"]))
            .reply(KEYWORDS_QUERY, Reply::Rows(vec!["select"]));
        cache.populate(&mut server).await.unwrap();

        cache.reset();

        assert!(cache.function_names().is_empty());
        assert!(cache.keywords().is_empty());
        assert!(cache.snapshot().function_names().is_empty());
    }

    #[test]
    fn test_unpopulated_cache_is_empty() {
        let cache = CapabilityCache::new();
        assert!(cache.function_names().is_empty());
        assert!(cache.keywords().is_empty());
    }

    #[tokio::test]
    async fn test_lookup_helpers() {
        let cache = CapabilityCache::new();
        let mut server = FakeServer::default()
            .reply(FUNCTION_NAMES_QUERY, Reply::Rows(vec!["sum", "sample_by", "isOrdered"]))
            .reply(KEYWORDS_QUERY, Reply::Rows(vec!["sample", "select", "sum"]));
        let caps = cache.populate(&mut server).await.unwrap();

        assert!(caps.supports_function("SUM"));
        assert!(caps.supports_function("isordered"));
        assert!(!caps.supports_function("median"));
        assert!(caps.is_keyword("Select"));
        assert!(!caps.is_keyword("trades"));
        assert_eq!(caps.completions("SA"), vec!["sample_by", "sample"]);
        assert_eq!(caps.completions("su"), vec!["sum"]);
        assert!(caps.completions("zzz").is_empty());
    }

    /// Counts queries across every connection that shares it.
    struct CountingServer {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl IntrospectionSource for CountingServer {
        async fn fetch_strings(&mut self, sql: &str) -> Result<Vec<String>, sqlx::Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // Give racing connections a chance to reach the same cell.
            tokio::task::yield_now().await;
            Ok(vec![sql.to_string()])
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_connections_populate_once() {
        let cache = Arc::new(CapabilityCache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let mut server = CountingServer {
                    calls: Arc::clone(&calls),
                };
                tokio::spawn(async move { cache.populate(&mut server).await })
            })
            .collect();

        let mut snapshots = Vec::new();
        for handle in handles {
            snapshots.push(handle.await.unwrap().unwrap());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.function_names(), strings(&[FUNCTION_NAMES_QUERY]).as_slice());
        assert_eq!(cache.keywords(), strings(&[KEYWORDS_QUERY]).as_slice());
        let stored_functions = cache.function_names.get().unwrap();
        let stored_keywords = cache.keywords.get().unwrap();
        for caps in &snapshots {
            assert!(Arc::ptr_eq(&caps.function_names, stored_functions));
            assert!(Arc::ptr_eq(&caps.keywords, stored_keywords));
        }
    }
}
