use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by {domain} (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("storefront GraphQL errors: {0}")]
    GraphQl(String),

    #[error("storefront response for {context} carried no data")]
    MissingData { context: String },

    #[error("invalid shop domain \"{shop_domain}\": {reason}")]
    InvalidShopDomain { shop_domain: String, reason: String },
}

/// Failures a caller of the inventory store must surface to the user.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("storefront credentials are not configured; set a shop domain and access token")]
    MissingCredentials,

    #[error("inventory load returned no products: {0}")]
    LoadFailed(String),
}
