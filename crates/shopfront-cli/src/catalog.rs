//! Catalog, inventory and cart command handlers.

use anyhow::Context;
use serde::Serialize;
use shopfront_catalog::{BulkLoader, CatalogClient, InventoryStore};
use shopfront_core::{cart_lines, cart_subtotal, AppConfig, Cart, Product};

use crate::output::{print_json, print_products};

/// Which slice of the loaded inventory to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum InventoryFilter {
    Stats,
    Text(String),
    Category(String),
    Tag(String),
}

impl InventoryFilter {
    pub(crate) fn from_args(
        query: Option<String>,
        category: Option<String>,
        tag: Option<String>,
    ) -> Self {
        match (query, category, tag) {
            (Some(q), _, _) => Self::Text(q),
            (None, Some(c), _) => Self::Category(c),
            (None, None, Some(t)) => Self::Tag(t),
            (None, None, None) => Self::Stats,
        }
    }
}

pub(crate) async fn run_search(config: &AppConfig, query: &str, json: bool) -> anyhow::Result<()> {
    let client = CatalogClient::from_config(config);
    let result = client.search(query.trim()).await;

    if json {
        return print_json(&result);
    }
    match result.source {
        Some(source) => println!("{} product(s) from {source}", result.products.len()),
        None => println!("no source returned products"),
    }
    print_products(&result.products);
    Ok(())
}

/// Runs a full bulk load and then answers `filter` from the fresh index.
///
/// # Errors
///
/// Fails when no storefront credentials are configured or the load yields
/// nothing usable.
pub(crate) async fn run_inventory(
    config: &AppConfig,
    filter: InventoryFilter,
    json: bool,
) -> anyhow::Result<()> {
    let loader = BulkLoader::from_config(config).context("invalid storefront configuration")?;
    let store = InventoryStore::new();
    let report = store
        .reload(&loader)
        .await
        .context("inventory load failed")?;
    if !report.outcome.is_complete() {
        tracing::warn!(outcome = %report.outcome, "inventory loaded partially");
    }

    let index = store.snapshot();
    let products: Vec<Product> = match &filter {
        InventoryFilter::Stats => {
            if json {
                return print_json(&report);
            }
            let stats = &report.stats;
            println!("products:   {}", stats.total_products);
            println!("categories: {}", stats.categories);
            println!("tags:       {}", stats.tags);
            println!("pages:      {}", report.pages);
            println!("outcome:    {}", report.outcome);
            for (label, count) in index.category_counts() {
                println!("  {label:<24} {count}");
            }
            return Ok(());
        }
        InventoryFilter::Text(q) => index.search_by_text(q).into_iter().cloned().collect(),
        InventoryFilter::Category(c) => index.by_category(c).into_iter().cloned().collect(),
        InventoryFilter::Tag(t) => index.by_tag(t).into_iter().cloned().collect(),
    };

    if json {
        print_json(&products)
    } else {
        print_products(&products);
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct CartSummary {
    subtotal: rust_decimal::Decimal,
    item_count: u64,
    lines: Vec<shopfront_core::CartLine>,
}

/// Prices `entries` against the current catalog. Repeated ids accumulate.
pub(crate) async fn run_cart(
    config: &AppConfig,
    entries: Vec<(String, u32)>,
    json: bool,
) -> anyhow::Result<()> {
    let cart: Cart = entries.into_iter().collect();
    let products = CatalogClient::from_config(config).search_products("").await;

    let summary = CartSummary {
        subtotal: cart_subtotal(&products, &cart)?,
        item_count: cart.item_count(),
        lines: cart_lines(&products, &cart)?,
    };

    if json {
        return print_json(&summary);
    }
    for line in &summary.lines {
        let title = line.title.as_deref().unwrap_or("(unknown product)");
        println!(
            "{:>3} x {:<32} ${:>9.2}  {title}",
            line.quantity, line.product_id, line.line_total
        );
    }
    println!("{} item(s), subtotal ${:.2}", summary.item_count, summary.subtotal);
    Ok(())
}
