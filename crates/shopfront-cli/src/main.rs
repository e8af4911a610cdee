mod catalog;
mod output;
mod stylist;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "shopfront-cli")]
#[command(about = "Shopfront catalog, inventory and stylist command line interface")]
struct Cli {
    /// Print results as pretty JSON instead of text lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search the catalog (live storefront first, demo catalog as fallback)
    Search {
        /// Matched against titles and tags; empty lists everything
        #[arg(default_value = "")]
        query: String,
    },
    /// Bulk-load the storefront into the inventory index and query it
    Inventory {
        /// Free-text search over the loaded inventory
        #[arg(long, conflicts_with_all = ["category", "tag"])]
        query: Option<String>,

        /// List products in a category
        #[arg(long, conflicts_with = "tag")]
        category: Option<String>,

        /// List products carrying an exact tag
        #[arg(long)]
        tag: Option<String>,
    },
    /// Ask the shopping assistant a question
    Ask {
        prompt: String,

        /// Reply language tag (en, fr, es, hi)
        #[arg(long, default_value = "en")]
        lang: String,

        /// Answer from this catalog search instead of the whole catalog
        #[arg(long)]
        query: Option<String>,
    },
    /// Ask the outfit service for a recommendation
    Recommend {
        request: String,

        /// Total budget for the outfit
        #[arg(long)]
        budget: Option<Decimal>,
    },
    /// Price a cart given as `product-id=quantity` pairs
    Cart {
        #[arg(required = true, value_parser = parse_cart_entry)]
        entries: Vec<(String, u32)>,
    },
}

fn parse_cart_entry(raw: &str) -> Result<(String, u32), String> {
    let (id, quantity) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected product-id=quantity, got '{raw}'"))?;
    let id = id.trim();
    if id.is_empty() {
        return Err(format!("missing product id in '{raw}'"));
    }
    let quantity = quantity
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid quantity in '{raw}': {e}"))?;
    Ok((id.to_owned(), quantity))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = shopfront_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json = cli.json;
    match cli.command {
        Commands::Search { query } => catalog::run_search(&config, &query, json).await,
        Commands::Inventory {
            query,
            category,
            tag,
        } => {
            let filter = catalog::InventoryFilter::from_args(query, category, tag);
            catalog::run_inventory(&config, filter, json).await
        }
        Commands::Ask {
            prompt,
            lang,
            query,
        } => stylist::run_ask(&config, &prompt, &lang, query.as_deref(), json).await,
        Commands::Recommend { request, budget } => {
            stylist::run_recommend(&config, &request, budget, json).await
        }
        Commands::Cart { entries } => catalog::run_cart(&config, entries, json).await,
    }
}
