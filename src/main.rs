use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use telepost::commands::{self, DEFAULT_ACTOR};
use telepost::config::Config;

#[derive(Parser)]
#[command(
    name = "telepost",
    version,
    about = "Import public Telegram channel posts as draft content",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true, default_value = "text")]
    log_format: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a channel and list its messages for review
    Preview {
        /// Channel name, @name, or t.me URL
        #[arg(short = 'n', long)]
        channel: Option<String>,

        /// Maximum number of messages to fetch (0 = unbounded)
        #[arg(short, long)]
        max_count: Option<usize>,

        /// Actor key the review list is saved under
        #[arg(long, default_value = DEFAULT_ACTOR)]
        actor: String,
    },

    /// Import channel messages as posts
    Import {
        /// Channel name, @name, or t.me URL
        #[arg(short = 'n', long)]
        channel: Option<String>,

        /// Maximum number of messages to fetch (0 = unbounded)
        #[arg(short, long)]
        max_count: Option<usize>,

        /// Import only these message ids from the last preview
        #[arg(long, value_delimiter = ',')]
        ids: Option<Vec<u64>>,

        /// Update existing posts instead of skipping them
        #[arg(long, default_value = "false")]
        overwrite: bool,

        /// Actor key the review list was saved under
        #[arg(long, default_value = DEFAULT_ACTOR)]
        actor: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging
    setup_tracing(&cli.log_format, cli.verbose)?;

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    config.validate()?;

    match cli.command {
        Commands::Preview {
            channel,
            max_count,
            actor,
        } => {
            tracing::info!(
                channel = ?channel,
                max_count = ?max_count,
                "Starting preview command"
            );
            commands::preview::preview(config, channel, max_count, &actor).await?;
        }

        Commands::Import {
            channel,
            max_count,
            ids,
            overwrite,
            actor,
        } => {
            tracing::info!(
                channel = ?channel,
                max_count = ?max_count,
                ids = ?ids,
                overwrite = %overwrite,
                "Starting import command"
            );
            commands::import::import(config, channel, max_count, ids, overwrite, &actor).await?;
        }
    }

    Ok(())
}

fn setup_tracing(format: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("telepost=debug,info")
    } else {
        tracing_subscriber::EnvFilter::new("telepost=info,warn")
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
