//! hearth: command-line access to the operational store.
//!
//! ```text
//! hearth seed --dir load
//! hearth scan utilization NT01T02
//! hearth query --asset NT01 --channel T02 --category sensor
//! hearth resolve --location "Living Room" --format json
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hearth_core::Category;

mod commands;

#[derive(Parser)]
#[command(
    name = "hearth",
    about = "Hearth home telemetry time-series store",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Path to hearth.toml (defaults are used if it does not exist)
    #[arg(short, long, global = true, default_value = "hearth.toml")]
    config: PathBuf,

    /// Override [store].data_dir from the config file
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load `<category>-data-load.txt` files into the store
    Seed {
        /// Directory holding the seed files (default: [seed].dir or ./load)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Store one record
    Put {
        #[arg(value_parser = parse_category)]
        category: Category,
        key: String,
        value: String,
    },
    /// Look up one record
    Get {
        #[arg(value_parser = parse_category)]
        category: Category,
        key: String,
    },
    /// List every record whose key starts with a prefix
    Scan {
        #[arg(value_parser = parse_category)]
        category: Category,
        /// Key prefix, usually `{asset_id}{channel_code}`
        #[arg(default_value = "")]
        prefix: String,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Values of one asset channel in chronological order
    Query {
        #[arg(short, long)]
        asset: String,
        /// Channel code, e.g. T02
        #[arg(long)]
        channel: String,
        /// Category name or synonym (sensor, warning, message, ...)
        #[arg(long, value_parser = parse_category)]
        category: Category,
        /// Inclusive lower bound, YYYYMMDDTHHMMSSZ
        #[arg(long)]
        from: Option<String>,
        /// Exclusive upper bound, YYYYMMDDTHHMMSSZ
        #[arg(long)]
        to: Option<String>,
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Resolve an asset with all of its stream values
    Resolve {
        #[arg(short, long)]
        asset: Option<String>,
        #[arg(short, long)]
        location: Option<String>,
        /// Only show streams of this category (name or synonym)
        #[arg(long = "type", value_parser = parse_category)]
        category: Option<Category>,
        #[arg(short, long, default_value = "json")]
        format: String,
    },
    /// Resolve every asset, optionally at one location
    Assets {
        #[arg(short, long)]
        location: Option<String>,
        #[arg(short, long, default_value = "json")]
        format: String,
    },
}

fn parse_category(s: &str) -> Result<Category, String> {
    Category::find(s).ok_or_else(|| {
        format!("unknown category {s:?} (expected utilization, alarm, or notification)")
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,hearth=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let env = commands::Env::load(&cli.config, cli.data_dir)?;

    match cli.command {
        Commands::Seed { dir } => commands::store::seed(&env, dir),
        Commands::Put {
            category,
            key,
            value,
        } => commands::store::put(&env, category, &key, &value),
        Commands::Get { category, key } => commands::store::get(&env, category, &key),
        Commands::Scan {
            category,
            prefix,
            format,
        } => commands::store::scan(&env, category, &prefix, &format),
        Commands::Query {
            asset,
            channel,
            category,
            from,
            to,
            format,
        } => commands::query::query(
            &env,
            &asset,
            &channel,
            category,
            from.as_deref(),
            to.as_deref(),
            &format,
        ),
        Commands::Resolve {
            asset,
            location,
            category,
            format,
        } => {
            commands::query::resolve(
                &env,
                asset.as_deref(),
                location.as_deref(),
                category,
                &format,
            )
            .await
        }
        Commands::Assets { location, format } => {
            commands::query::assets(&env, location.as_deref(), &format).await
        }
    }
}
