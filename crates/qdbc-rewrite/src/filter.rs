//! `public` schema qualifier removal.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// Optional matching quote, `public`, closing quote, then the dot. The bare
/// form is anchored on a word boundary so `my_public.t` stays intact.
const PUBLIC_QUALIFIER_PATTERN: &str = r#"(?i)'public'\.|"public"\.|\bpublic\."#;

static GLOBAL_FILTER: LazyLock<PublicSchemaFilter> = LazyLock::new(PublicSchemaFilter::new);

/// Removes `public` schema qualifiers from SQL text.
#[derive(Debug, Clone)]
pub struct PublicSchemaFilter {
    pattern: Regex,
}

impl Default for PublicSchemaFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl PublicSchemaFilter {
    /// Compile a new filter.
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(PUBLIC_QUALIFIER_PATTERN)
                .expect("public qualifier pattern is a valid regex"),
        }
    }

    /// Shared process-wide filter.
    pub fn global() -> &'static PublicSchemaFilter {
        &GLOBAL_FILTER
    }

    /// Cheap pre-check: does the text mention `public` in any case?
    pub fn contains_candidate(sql: &str) -> bool {
        sql.as_bytes()
            .windows(b"public".len())
            .any(|w| w.eq_ignore_ascii_case(b"public"))
    }

    /// Strip every `public` qualifier from `sql`.
    ///
    /// Returns the input borrowed when nothing was removed. Substitution is
    /// repeated until the text is stable, so the result is idempotent.
    pub fn rewrite<'q>(&self, sql: &'q str) -> Cow<'q, str> {
        if !Self::contains_candidate(sql) {
            return Cow::Borrowed(sql);
        }

        let mut rewritten = match self.pattern.replace_all(sql, "") {
            Cow::Borrowed(_) => return Cow::Borrowed(sql),
            Cow::Owned(rewritten) => rewritten,
        };

        // A removal can splice a new qualifier together, e.g. `pu'public'.blic.t`.
        loop {
            let next = match self.pattern.replace_all(&rewritten, "") {
                Cow::Borrowed(_) => break,
                Cow::Owned(next) => next,
            };
            rewritten = next;
        }

        tracing::debug!(
            original = %sql,
            rewritten = %rewritten,
            "Removed public schema qualifiers"
        );

        Cow::Owned(rewritten)
    }
}

/// Strip `public` schema qualifiers using the shared filter.
pub fn remove_public_schema(sql: &str) -> Cow<'_, str> {
    PublicSchemaFilter::global().rewrite(sql)
}
