//! Statements routed through the rewriter.

use std::borrow::Cow;

use crate::filter::PublicSchemaFilter;

/// A statement on its way to the server.
///
/// Only `Text` is rewritten. `Prepared` carries a driver-side prepared
/// statement (whose SQL was fixed when it was prepared) and passes through
/// untouched.
#[derive(Debug, Clone)]
pub enum Statement<'q, P> {
    Text(Cow<'q, str>),
    Prepared(P),
}

impl<'q, P> Statement<'q, P> {
    /// Strip `public` qualifiers using the shared filter.
    pub fn without_public_schema(self) -> Self {
        self.rewrite_with(PublicSchemaFilter::global())
    }

    pub fn rewrite_with(self, filter: &PublicSchemaFilter) -> Self {
        match self {
            Statement::Text(Cow::Borrowed(sql)) => Statement::Text(filter.rewrite(sql)),
            Statement::Text(Cow::Owned(sql)) => {
                let rewritten = match filter.rewrite(&sql) {
                    Cow::Borrowed(_) => None,
                    Cow::Owned(rewritten) => Some(rewritten),
                };
                Statement::Text(Cow::Owned(rewritten.unwrap_or(sql)))
            }
            prepared @ Statement::Prepared(_) => prepared,
        }
    }

    /// The SQL text, if this is a text statement.
    pub fn sql(&self) -> Option<&str> {
        match self {
            Statement::Text(sql) => Some(&**sql),
            Statement::Prepared(_) => None,
        }
    }
}

impl<'q, P> From<&'q str> for Statement<'q, P> {
    fn from(sql: &'q str) -> Self {
        Statement::Text(Cow::Borrowed(sql))
    }
}

impl<'q, P> From<&'q String> for Statement<'q, P> {
    fn from(sql: &'q String) -> Self {
        Statement::Text(Cow::Borrowed(sql.as_str()))
    }
}

impl<P> From<String> for Statement<'_, P> {
    fn from(sql: String) -> Self {
        Statement::Text(Cow::Owned(sql))
    }
}
