//! Canned "best under budget" answer used when no answer service is wired in.

use rust_decimal::Decimal;
use shopfront_core::Product;

use crate::language::Language;

/// Fixed price ceiling for the heuristic answer.
pub const PRICE_CEILING: Decimal = Decimal::ONE_HUNDRED;

/// Answer given when nothing is priced at or under [`PRICE_CEILING`].
pub const NOTHING_FOUND: &str =
    "I couldn't find anything under $100 right now. Try a different search.";

/// Highest-rated product priced at or under `ceiling`.
///
/// A missing rating ranks as 0. Ties go to the earliest product.
#[must_use]
pub fn pick_best_under(products: &[Product], ceiling: Decimal) -> Option<&Product> {
    let rating = |p: &Product| p.rating.unwrap_or(0.0);
    products
        .iter()
        .filter(|p| p.price <= ceiling)
        .fold(None, |best: Option<&Product>, candidate| match best {
            Some(current) if rating(candidate) <= rating(current) => Some(current),
            _ => Some(candidate),
        })
}

/// Sentence recommending the best product under [`PRICE_CEILING`], rendered
/// for `lang`.
///
/// `prompt` is not parsed; it is only logged.
#[must_use]
pub fn best_under_budget(prompt: &str, products: &[Product], lang: Language) -> String {
    let Some(best) = pick_best_under(products, PRICE_CEILING) else {
        tracing::debug!(prompt, candidates = products.len(), "no product under the ceiling");
        return lang.render(NOTHING_FOUND);
    };
    tracing::debug!(prompt, product_id = %best.id, "heuristic pick");
    lang.render(&describe(best))
}

fn describe(product: &Product) -> String {
    let mut sentence = format!(
        "Top pick under $100: {} at ${:.2}",
        product.title,
        product.price.round_dp(2)
    );
    match product.features.as_slice() {
        [] => {}
        [only] => sentence.push_str(&format!(", featuring {only}")),
        [first, second, ..] => sentence.push_str(&format!(", featuring {first} and {second}")),
    }
    sentence.push('.');
    sentence
}
