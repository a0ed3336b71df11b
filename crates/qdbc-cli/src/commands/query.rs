//! `qdbc query` command implementation.

use anyhow::Result;
use qdbc_adapter_pg::{UtcTimestamp, connect};
use qdbc_core::ConnectConfig;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{Column, Row, TypeInfo, ValueRef};

pub async fn run(config: &ConnectConfig, sql: &str, header: bool) -> Result<()> {
    let mut conn = connect(config).await?;

    let rows = conn.fetch_all(sql, PgArguments::default()).await?;
    tracing::debug!(rows = rows.len(), "Query returned");

    if header && let Some(first) = rows.first() {
        let names: Vec<&str> = first.columns().iter().map(|c| c.name()).collect();
        println!("{}", names.join("\t"));
    }

    for row in &rows {
        let values: Vec<String> = row_to_cells(row).iter().map(Cell::to_string).collect();
        println!("{}", values.join("\t"));
    }

    conn.close().await?;
    Ok(())
}

/// One rendered column value.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Cell {
    Null,
    Value(String),
    /// A non-null value of a type we don't know how to print.
    Unsupported(String),
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Null => f.write_str("null"),
            Cell::Value(v) => f.write_str(v),
            Cell::Unsupported(type_name) => write!(f, "<{}>", type_name.to_lowercase()),
        }
    }
}

fn row_to_cells(row: &PgRow) -> Vec<Cell> {
    (0..row.len())
        .map(|i| {
            if row.try_get_raw(i).is_ok_and(|raw| raw.is_null()) {
                return Cell::Null;
            }
            match decode_text(row, i) {
                Some(text) => Cell::Value(text),
                None => Cell::Unsupported(row.column(i).type_info().name().to_string()),
            }
        })
        .collect()
}

/// Try the column types we know how to print, in order.
fn decode_text(row: &PgRow, i: usize) -> Option<String> {
    row.try_get::<String, _>(i)
        .ok()
        .or_else(|| row.try_get::<i64, _>(i).ok().map(|v| v.to_string()))
        .or_else(|| row.try_get::<i32, _>(i).ok().map(|v| v.to_string()))
        .or_else(|| row.try_get::<i16, _>(i).ok().map(|v| v.to_string()))
        .or_else(|| row.try_get::<f64, _>(i).ok().map(|v| v.to_string()))
        .or_else(|| row.try_get::<f32, _>(i).ok().map(|v| v.to_string()))
        .or_else(|| row.try_get::<bool, _>(i).ok().map(|v| v.to_string()))
        .or_else(|| {
            row.try_get::<UtcTimestamp, _>(i)
                .ok()
                .map(|v| v.to_string())
        })
        .or_else(|| {
            row.try_get::<chrono::DateTime<chrono::Utc>, _>(i)
                .ok()
                .map(|v| v.to_rfc3339())
        })
        .or_else(|| {
            row.try_get::<chrono::NaiveDate, _>(i)
                .ok()
                .map(|v| v.to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_and_unsupported_render_differently() {
        assert_eq!(Cell::Null.to_string(), "null");
        assert_eq!(Cell::Unsupported("UUID".to_string()).to_string(), "<uuid>");
        assert_eq!(Cell::Value("null".to_string()).to_string(), "null");
        assert_ne!(Cell::Null.to_string(), Cell::Unsupported("NUMERIC".to_string()).to_string());
    }
}
