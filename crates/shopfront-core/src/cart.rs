//! Session cart and subtotal math.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mock_catalog::mock_catalog;
use crate::products::Product;

/// Product id → quantity. A zero quantity is never stored; setting one
/// removes the line instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, u32>", into = "BTreeMap<String, u32>")]
pub struct Cart {
    lines: BTreeMap<String, u32>,
}

/// One resolved cart line, for display next to the subtotal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
    pub product_id: String,
    /// `None` when the id resolved against neither catalog.
    pub title: Option<String>,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `quantity` units of `product_id`. Adding zero is a no-op.
    pub fn add(&mut self, product_id: impl Into<String>, quantity: u32) {
        if quantity == 0 {
            return;
        }
        let entry = self.lines.entry(product_id.into()).or_insert(0);
        *entry = entry.saturating_add(quantity);
    }

    /// Sets the quantity for `product_id`; zero removes the line.
    pub fn set_quantity(&mut self, product_id: impl Into<String>, quantity: u32) {
        let product_id = product_id.into();
        if quantity == 0 {
            self.lines.remove(&product_id);
        } else {
            self.lines.insert(product_id, quantity);
        }
    }

    pub fn remove(&mut self, product_id: &str) -> Option<u32> {
        self.lines.remove(product_id)
    }

    #[must_use]
    pub fn quantity(&self, product_id: &str) -> u32 {
        self.lines.get(product_id).copied().unwrap_or(0)
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.values().map(|&q| u64::from(q)).sum()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.lines.iter().map(|(id, &q)| (id.as_str(), q))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl From<BTreeMap<String, u32>> for Cart {
    fn from(lines: BTreeMap<String, u32>) -> Self {
        lines.into_iter().collect()
    }
}

impl From<Cart> for BTreeMap<String, u32> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for Cart {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        let mut cart = Cart::new();
        for (id, quantity) in iter {
            cart.add(id, quantity);
        }
        cart
    }
}

/// Looks `product_id` up in `products` first, then in the mock catalog, so
/// lines added while browsing mock data still price after a catalog switch.
fn resolve<'a>(products: &'a [Product], product_id: &str) -> Option<&'a Product> {
    products
        .iter()
        .find(|p| p.id == product_id)
        .or_else(|| mock_catalog().iter().find(|p| p.id == product_id))
}

/// Cart arithmetic that left the `Decimal` range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("line total for {product_id} overflows")]
    LineOverflow { product_id: String },

    #[error("cart subtotal overflows")]
    SubtotalOverflow,
}

fn line_total(product_id: &str, unit_price: Decimal, quantity: u32) -> Result<Decimal, CartError> {
    unit_price
        .checked_mul(Decimal::from(quantity))
        .ok_or_else(|| CartError::LineOverflow {
            product_id: product_id.to_owned(),
        })
}

/// Exact subtotal of `cart`: Σ price × quantity over resolvable lines.
/// Unresolved ids contribute zero.
///
/// # Errors
///
/// Returns [`CartError`] if a line total or the running sum overflows.
pub fn cart_subtotal(products: &[Product], cart: &Cart) -> Result<Decimal, CartError> {
    cart.iter().try_fold(Decimal::ZERO, |total, (id, quantity)| {
        let Some(product) = resolve(products, id) else {
            return Ok(total);
        };
        let line = line_total(id, product.price, quantity)?;
        total.checked_add(line).ok_or(CartError::SubtotalOverflow)
    })
}

/// Per-line breakdown of `cart`, in product-id order.
///
/// # Errors
///
/// Returns [`CartError::LineOverflow`] for the first line whose total
/// overflows.
pub fn cart_lines(products: &[Product], cart: &Cart) -> Result<Vec<CartLine>, CartError> {
    cart.iter()
        .map(|(id, quantity)| {
            let product = resolve(products, id);
            let unit_price = product.map_or(Decimal::ZERO, |p| p.price);
            Ok(CartLine {
                product_id: id.to_string(),
                title: product.map(|p| p.title.clone()),
                quantity,
                unit_price,
                line_total: line_total(id, unit_price, quantity)?,
            })
        })
        .collect()
}
