//! market-scout - Telegram shopping assistant for Russian marketplaces
//!
//! Runs the bot, or performs one-off searches from the command line.

use anyhow::Result;
use clap::{Parser, Subcommand};
use market_scout::commands::{LinkCommand, SearchCommand};
use market_scout::config::{Config, OutputFormat};
use market_scout::market::Marketplace;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "market-scout",
    version,
    about = "Telegram shopping assistant for Wildberries and Ozon",
    long_about = "Finds the most reviewed products for a query on Wildberries or Ozon, \
                  as a Telegram bot or from the command line."
)]
struct Cli {
    /// Marketplace to search
    #[arg(short, long, global = true, env = "SCOUT_MARKETPLACE")]
    marketplace: Option<Marketplace>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "SCOUT_PROXY")]
    proxy: Option<String>,

    /// Pause before falling back to the next source, in milliseconds
    #[arg(long, global = true, env = "SCOUT_DELAY")]
    delay: Option<u64>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format (table, json, markdown)
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the Telegram bot and the liveness endpoint
    Bot {
        /// Telegram user id allowed to run /stats and /broadcast
        #[arg(long, env = "SCOUT_ADMIN_ID")]
        admin: Option<u64>,

        /// Port of the liveness endpoint
        #[arg(long, env = "PORT")]
        port: Option<u16>,
    },

    /// Search for products
    #[command(alias = "s")]
    Search {
        /// Search query
        query: String,

        /// Maximum number of results (at most 5)
        #[arg(short = 'n', long)]
        max: Option<usize>,

        /// Minimum price filter, roubles
        #[arg(long)]
        min_price: Option<u64>,

        /// Maximum price filter, roubles
        #[arg(long)]
        max_price: Option<u64>,

        /// Minimum rating filter (1.0-5.0)
        #[arg(long)]
        min_rating: Option<f32>,

        /// Turn a conversational message into search keywords
        #[arg(long)]
        refine: bool,
    },

    /// Print the storefront search link for a query
    #[command(alias = "l")]
    Link {
        /// Search query
        query: String,

        /// Turn a conversational message into search keywords
        #[arg(long)]
        refine: bool,
    },

    /// List supported marketplaces
    Marketplaces,
}

/// Loads config with layered overrides: file, then environment, then global CLI flags.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(marketplace) = cli.marketplace {
        config.marketplace = marketplace;
    }
    if let Some(proxy) = &cli.proxy {
        config.proxy = Some(proxy.clone());
    }
    if let Some(delay) = cli.delay {
        config.delay_ms = delay;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Bot logs at INFO by default, one-off commands at WARN
    let default_level = match cli.command {
        Commands::Bot { .. } => Level::INFO,
        _ => Level::WARN,
    };

    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(default_level.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    let mut config = load_config(&cli)?;

    match cli.command {
        Commands::Bot { admin, port } => {
            if let Some(admin) = admin {
                config.admin_id = Some(admin);
            }
            if let Some(port) = port {
                config.port = port;
            }

            market_scout::bot::run(config).await?;
        }

        Commands::Search { query, max, min_price, max_price, min_rating, refine } => {
            // Apply search-specific config
            if let Some(max) = max {
                config.max_results = max;
            }
            if min_price.is_some() {
                config.min_price = min_price;
            }
            if max_price.is_some() {
                config.max_price = max_price;
            }
            if min_rating.is_some() {
                config.min_rating = min_rating;
            }
            config.refine_queries |= refine;

            let cmd = SearchCommand::new(config)?;
            let output = cmd.execute(&query).await?;
            println!("{}", output);
        }

        Commands::Link { query, refine } => {
            config.refine_queries |= refine;

            let cmd = LinkCommand::new(config);
            println!("{}", cmd.execute(&query)?);
        }

        Commands::Marketplaces => {
            println!("Supported marketplaces:\n");
            println!("{:<12} {:<20} {:<10}", "Code", "Domain", "Currency");
            println!("{:-<12} {:-<20} {:-<10}", "", "", "");

            for marketplace in Marketplace::all() {
                println!(
                    "{:<12} {:<20} {:<10}",
                    marketplace.to_string(),
                    marketplace.domain(),
                    marketplace.currency()
                );
            }
        }
    }

    Ok(())
}
