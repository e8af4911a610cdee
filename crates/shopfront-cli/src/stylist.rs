//! Assistant and outfit command handlers.

use anyhow::Context;
use rust_decimal::Decimal;
use shopfront_catalog::{BulkLoader, CatalogClient, InventoryStore, LoadOutcome};
use shopfront_core::{AppConfig, Product};
use shopfront_stylist::{Assistant, Language, OutfitClient};

use crate::output::print_json;

pub(crate) async fn run_ask(
    config: &AppConfig,
    prompt: &str,
    lang: &str,
    query: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let assistant = Assistant::from_config(config)?;
    let catalog = CatalogClient::from_config(config);
    let products = catalog.search_products(query.unwrap_or("").trim()).await;

    let answer = assistant
        .answer(prompt, &products, Language::from_tag(lang))
        .await;

    if json {
        return print_json(&answer);
    }
    println!("{}", answer.text);
    Ok(())
}

/// The full storefront inventory. Recommendations are only made from a
/// complete load.
pub(crate) async fn recommendation_catalog(config: &AppConfig) -> anyhow::Result<Vec<Product>> {
    let loader = BulkLoader::from_config(config).context("invalid storefront configuration")?;
    if !loader.has_credentials() {
        anyhow::bail!(
            "SHOPFRONT_SHOP_DOMAIN and SHOPFRONT_STOREFRONT_TOKEN are required to recommend outfits"
        );
    }

    let store = InventoryStore::new();
    let report = store
        .reload(&loader)
        .await
        .context("inventory load failed")?;
    ensure_complete(&report.outcome)?;
    Ok(store.snapshot().products().to_vec())
}

pub(crate) fn ensure_complete(outcome: &LoadOutcome) -> anyhow::Result<()> {
    anyhow::ensure!(
        outcome.is_complete(),
        "inventory load did not complete ({outcome}); refusing to recommend from a partial catalog"
    );
    Ok(())
}

pub(crate) async fn run_recommend(
    config: &AppConfig,
    request: &str,
    budget: Option<Decimal>,
    json: bool,
) -> anyhow::Result<()> {
    let client = OutfitClient::from_config(config)?
        .context("SHOPFRONT_OUTFIT_URL is not set; no outfit service to ask")?;
    let products = recommendation_catalog(config).await?;

    let recommendation = client
        .recommend(request, &products, budget)
        .await
        .context("outfit recommendation failed")?;

    if json {
        return print_json(&recommendation);
    }

    let primary = &recommendation.primary_outfit;
    if recommendation.is_empty() {
        println!("no outfit could be assembled");
    } else {
        println!("{} (${:.2})", primary.name, primary.total_cost);
        for item in &primary.items {
            println!("  - {} ${:.2}", item.title, item.price);
        }
        if !primary.rationale.is_empty() {
            println!("  {}", primary.rationale);
        }
    }
    for outfit in &recommendation.alternative_outfits {
        println!("alternative: {} (${:.2})", outfit.name, outfit.total_cost);
    }
    for tip in &recommendation.styling_tips {
        println!("tip: {tip}");
    }
    Ok(())
}
