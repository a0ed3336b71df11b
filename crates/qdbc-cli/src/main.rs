use clap::{Args, Parser, Subcommand};
use qdbc_core::ConnectConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "qdbc", version, about = "QuestDB client over the Postgres wire protocol")]
struct Cli {
    #[command(flatten)]
    conn: ConnectArgs,

    #[command(subcommand)]
    cmd: Command,
}

/// Connection flags. Anything left unset falls back to the config file, then
/// to the QuestDB defaults.
#[derive(Args, Debug, Default)]
struct ConnectArgs {
    /// YAML file with connection options.
    #[arg(long, global = true, env = "QDB_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long, global = true, env = "QDB_HOST")]
    host: Option<String>,

    #[arg(long, global = true, env = "QDB_PORT")]
    port: Option<u16>,

    #[arg(long, global = true, env = "QDB_USER")]
    username: Option<String>,

    #[arg(long, global = true, env = "QDB_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[arg(long, global = true, env = "QDB_DATABASE")]
    database: Option<String>,

    /// Extra driver option, forwarded as-is (e.g. `-o sslmode=disable`).
    #[arg(short = 'o', long = "option", global = true, value_parser = parse_key_value)]
    options: Vec<(String, String)>,
}

impl ConnectArgs {
    fn resolve(&self) -> anyhow::Result<ConnectConfig> {
        let base = match &self.config {
            Some(path) => ConnectConfig::from_file(path)?,
            None => ConnectConfig::default(),
        };

        let mut overlay = ConnectConfig::from_pairs(self.options.iter().cloned())?;
        overlay.host = self.host.clone().or(overlay.host);
        overlay.port = self.port.or(overlay.port);
        overlay.username = self.username.clone().or(overlay.username);
        overlay.password = self.password.clone().or(overlay.password);
        overlay.database = self.database.clone().or(overlay.database);

        Ok(base.merge(overlay))
    }
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print SQL with `public` schema qualifiers removed (no connection needed).
    Rewrite {
        /// SQL text, or `-` to read from stdin.
        sql: String,
    },

    /// Run a statement and print the rows tab-separated.
    Query {
        sql: String,

        /// Print a header line with column names.
        #[arg(long, default_value_t = false)]
        header: bool,
    },

    /// List the server's supported function names.
    Functions {
        /// Only names starting with this prefix (case-insensitive).
        #[arg(long)]
        prefix: Option<String>,

        /// Print the built-in list without connecting.
        #[arg(long, default_value_t = false)]
        builtin: bool,
    },

    /// List the server's reserved keywords.
    Keywords {
        /// Only keywords starting with this prefix (case-insensitive).
        #[arg(long)]
        prefix: Option<String>,

        /// Print the built-in list without connecting.
        #[arg(long, default_value_t = false)]
        builtin: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Rewrite { sql } => commands::rewrite::run(&sql)?,

        Command::Query { sql, header } => {
            commands::query::run(&cli.conn.resolve()?, &sql, header).await?
        }

        Command::Functions { prefix, builtin } => {
            let config = cli.conn.resolve()?;
            commands::capabilities::run(
                commands::capabilities::ListKind::Functions,
                &config,
                prefix.as_deref(),
                builtin,
            )
            .await?
        }

        Command::Keywords { prefix, builtin } => {
            let config = cli.conn.resolve()?;
            commands::capabilities::run(
                commands::capabilities::ListKind::Keywords,
                &config,
                prefix.as_deref(),
                builtin,
            )
            .await?
        }
    }

    Ok(())
}
