use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use leaseweb_client::config::{file_to_config, ClientConfig};
use leaseweb_client::encoding::encode_with_prefix;
use leaseweb_client::observability::metrics;
use leaseweb_client::utils::constants::DEFAULT_PAGE_LIMIT;
use leaseweb_client::utils::logging::{self, LogLevel};
use leaseweb_client::LeasewebClient;
use serde_json::Value;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "LSW_CONFIG", default_value = "leaseweb.yaml")]
    config: PathBuf,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
    /// Print collected metrics to stderr before exiting
    #[arg(long)]
    dump_metrics: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the auth header for the configured credentials
    Token,
    /// Drop the cached token of the configured OAuth client
    Forget,
    /// Form-encode a JSON document read from a file or stdin
    Encode {
        #[arg(short, long)]
        file: Option<PathBuf>,
        #[arg(short, long, default_value = "")]
        prefix: String,
    },
    /// Authenticated GET request
    Get {
        path: String,
        /// Query parameters as a JSON object
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Collect all pages of a list endpoint
    Paginate {
        path: String,
        key: String,
        #[arg(short, long, default_value_t = DEFAULT_PAGE_LIMIT)]
        limit: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // -------------------------------
    // 1. Encoding needs no config
    // -------------------------------

    if let Command::Encode { file, prefix } = &args.command {
        logging::run(None, args.log_level);
        let value = read_json(file.as_deref())?;
        println!("{}", encode_with_prefix(&value, prefix));
        return finish(args.dump_metrics).await;
    }

    // -------------------------------
    // 2. Load YAML config, start logging
    // -------------------------------

    let client_config: ClientConfig = file_to_config(&args.config)?;
    logging::run(client_config.logging.as_ref(), args.log_level);

    // -------------------------------
    // 3. Build client (fails fast on missing credentials)
    // -------------------------------

    let client = LeasewebClient::from_config(&client_config)?;
    info!(credentials = ?client.credentials(), "client ready");

    match args.command {
        Command::Token => {
            let header = client.auth_header().await?;
            println!("{}", header);
        }
        Command::Forget => {
            let client_id = client
                .credentials()
                .client_identity()
                .ok_or_else(|| anyhow!("api key credentials are never cached"))?;
            client.manager().forget(client_id).await;
            info!(client_id, "cached token removed");
        }
        Command::Get { path, query } => {
            let query = query
                .map(|q| serde_json::from_str::<Value>(&q))
                .transpose()
                .context("--query must be a JSON object")?;
            let response = client.get(&path, query.as_ref()).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Paginate { path, key, limit } => {
            let response = client.get_all_pages(&path, &key, limit).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Encode { .. } => unreachable!("handled before config loading"),
    }

    finish(args.dump_metrics).await
}

fn read_json(file: Option<&Path>) -> Result<Value> {
    let content = match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("cannot read '{}'", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    serde_json::from_str(&content).context("input is not valid JSON")
}

async fn finish(dump_metrics: bool) -> Result<()> {
    if dump_metrics {
        eprintln!("{}", metrics::render().await);
    }
    Ok(())
}
