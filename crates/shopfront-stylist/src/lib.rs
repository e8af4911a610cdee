//! Shopping assistant: the budget heuristic, the placeholder translator, and
//! clients for the external answer and outfit-completion services.

pub mod answer;
pub mod error;
pub mod heuristic;
pub mod language;
pub mod outfits;
pub mod types;

pub use answer::{Answer, AnswerClient, AnswerSource, Assistant};
pub use error::StylistError;
pub use heuristic::{best_under_budget, pick_best_under, NOTHING_FOUND, PRICE_CEILING};
pub use language::{translate, Language};
pub use outfits::{CompletionReply, OutfitClient};
pub use types::{Outfit, OutfitItem, OutfitRecommendation, ProductSummary};
