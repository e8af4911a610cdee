//! Bundled demo catalog used when no live store is configured, and as the
//! last stop of every catalog fallback chain.

use std::sync::LazyLock;

use rust_decimal::Decimal;

use crate::products::Product;

static MOCK_CATALOG: LazyLock<Vec<Product>> = LazyLock::new(build_catalog);

/// The fixed demo catalog, in display order.
#[must_use]
pub fn mock_catalog() -> &'static [Product] {
    &MOCK_CATALOG
}

/// Case-insensitive substring search over [`mock_catalog`].
///
/// An empty (or whitespace-only) query returns the whole catalog. Otherwise a
/// product matches when its title or any of its tags contains the query.
/// Catalog order is preserved.
#[must_use]
pub fn filter_mock_catalog(query: &str) -> Vec<Product> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return mock_catalog().to_vec();
    }
    mock_catalog()
        .iter()
        .filter(|p| p.matches_title_or_tag(&needle))
        .cloned()
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn item(
    id: &str,
    title: &str,
    price_cents: i64,
    image: &str,
    tags: &[&str],
    rating: f32,
    features: &[&str],
    colors: &[&str],
    inventory: i64,
) -> Product {
    let owned = |values: &[&str]| values.iter().map(|v| (*v).to_string()).collect::<Vec<_>>();
    let mut product = Product::new(id, title, Decimal::new(price_cents, 2));
    product.image_url = format!("https://images.unsplash.com/{image}?w=600&h=800&fit=crop");
    product.tags = owned(tags);
    product.rating = Some(rating);
    product.features = owned(features);
    product.colors = owned(colors);
    product.inventory = Some(inventory);
    product
}

fn build_catalog() -> Vec<Product> {
    vec![
        item(
            "mock-linen-wrap-dress",
            "Linen Wrap Dress",
            8999,
            "photo-1595777457583-95e059d581b8",
            &["dress", "summer", "linen"],
            4.6,
            &["Breathable European linen", "Adjustable wrap tie", "Midi length"],
            &["Sand", "Olive"],
            14,
        ),
        item(
            "mock-wool-blazer",
            "Tailored Wool Blazer",
            14900,
            "photo-1591047139829-d91aecb6caea",
            &["blazer", "workwear", "wool"],
            4.8,
            &["Italian wool blend", "Half-canvas construction"],
            &["Charcoal", "Camel"],
            6,
        ),
        item(
            "mock-leather-tote",
            "Everyday Leather Tote",
            9900,
            "photo-1590874103328-eac38a683ce7",
            &["bag", "leather", "accessories"],
            4.4,
            &["Full-grain leather", "Fits a 15-inch laptop", "Interior zip pocket"],
            &["Cognac", "Black"],
            22,
        ),
        item(
            "mock-silk-camisole",
            "Silk Camisole",
            4950,
            "photo-1618354691373-d851c5c3a990",
            &["top", "silk", "evening"],
            4.3,
            &["Mulberry silk", "Adjustable straps"],
            &["Ivory", "Black", "Blush"],
            30,
        ),
        item(
            "mock-straight-jeans",
            "High-Rise Straight Jeans",
            7950,
            "photo-1541099649105-f69ad21f3246",
            &["denim", "jeans", "casual"],
            4.1,
            &["Rigid organic cotton", "Ankle length"],
            &["Mid Wash", "Black"],
            18,
        ),
        item(
            "mock-lip-tint",
            "Hydrating Lip Tint",
            1800,
            "photo-1586495777744-4413f21062fa",
            &["beauty", "lips", "makeup", "try-on"],
            4.5,
            &["Buildable sheer color", "Hyaluronic acid"],
            &["Rose", "Berry", "Coral"],
            64,
        ),
        item(
            "mock-skin-tint",
            "Luminous Skin Tint",
            3600,
            "photo-1631729371254-42c2892f0e6e",
            &["beauty", "face", "makeup", "try-on"],
            4.2,
            &["Light, dewy coverage", "SPF 20"],
            &["Fair", "Medium", "Deep"],
            40,
        ),
        item(
            "mock-knit-cardigan",
            "Chunky Knit Cardigan",
            11900,
            "photo-1620799140408-edc6dcb6d633",
            &["knitwear", "cardigan", "winter"],
            4.7,
            &["Merino and alpaca blend", "Horn buttons"],
            &["Oat", "Forest"],
            9,
        ),
        item(
            "mock-ankle-boots",
            "Leather Ankle Boots",
            18900,
            "photo-1543163521-1bf539c55dd2",
            &["shoes", "boots", "leather"],
            4.6,
            &["Stacked block heel", "Side zip"],
            &["Black", "Chocolate"],
            0,
        ),
        item(
            "mock-gold-hoops",
            "Gold Hoop Earrings",
            2900,
            "photo-1535632066927-ab7c9ab60908",
            &["jewelry", "accessories", "gold"],
            4.4,
            &["18k gold plated", "Hypoallergenic posts"],
            &["Gold"],
            75,
        ),
    ]
}
