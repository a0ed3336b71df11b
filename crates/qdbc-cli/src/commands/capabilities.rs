//! `qdbc functions` / `qdbc keywords` command implementation.

use anyhow::Result;
use qdbc_adapter_pg::connect;
use qdbc_adapter_pg::defaults::{DEFAULT_FUNCTION_NAMES, DEFAULT_KEYWORDS};
use qdbc_core::ConnectConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Functions,
    Keywords,
}

pub async fn run(
    kind: ListKind,
    config: &ConnectConfig,
    prefix: Option<&str>,
    builtin: bool,
) -> Result<()> {
    let names: Vec<String> = if builtin {
        let list = match kind {
            ListKind::Functions => DEFAULT_FUNCTION_NAMES,
            ListKind::Keywords => DEFAULT_KEYWORDS,
        };
        list.iter().map(|s| s.to_string()).collect()
    } else {
        let conn = connect(config).await?;
        let caps = conn.capabilities();
        let list = match kind {
            ListKind::Functions => caps.function_names().to_vec(),
            ListKind::Keywords => caps.keywords().to_vec(),
        };
        conn.close().await?;
        list
    };

    for name in filter_prefix(&names, prefix) {
        println!("{}", name);
    }
    Ok(())
}

fn filter_prefix<'a>(names: &'a [String], prefix: Option<&'a str>) -> impl Iterator<Item = &'a str> {
    names.iter().map(String::as_str).filter(move |name| match prefix {
        Some(p) => name
            .get(..p.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(p)),
        None => true,
    })
}
