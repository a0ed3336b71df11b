//! `qdbc rewrite` command implementation.

use anyhow::{Context, Result};
use std::io::Read;

use qdbc_rewrite::remove_public_schema;

pub fn run(sql: &str) -> Result<()> {
    let input = if sql == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read SQL from stdin")?;
        buf
    } else {
        sql.to_string()
    };

    println!("{}", remove_public_schema(input.trim_end()));
    Ok(())
}
