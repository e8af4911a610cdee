//! Shared domain types and configuration for the shopfront workspace.

pub mod app_config;
pub mod cart;
pub mod config;
pub mod mock_catalog;
pub mod products;

pub use app_config::{AnswerMode, AppConfig, Environment, StorefrontCredentials};
pub use cart::{cart_lines, cart_subtotal, Cart, CartError, CartLine};
pub use config::{load_app_config, load_app_config_from_env};
pub use mock_catalog::{filter_mock_catalog, mock_catalog};
pub use products::{
    Metafield, Product, ProductImage, ProductVariant, PLACEHOLDER_IMAGE_URL,
    UNCATEGORIZED_LABEL,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
