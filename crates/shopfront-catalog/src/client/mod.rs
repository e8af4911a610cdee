//! HTTP client for the Shopify Storefront GraphQL API.

mod endpoint;
mod fetch_all;

use std::time::Duration;

use reqwest::Client;
use shopfront_core::{AppConfig, Product, StorefrontCredentials};

use crate::error::CatalogError;
use crate::normalize::normalize_product;
use crate::query::GraphQlRequest;
use crate::rate_limit::retry_with_backoff;
use crate::types::{GraphQlResponse, ProductConnection, ProductsData};

pub use endpoint::storefront_endpoint;
pub use fetch_all::{BulkLoad, BulkLoader, BulkOptions, LoadOutcome};

/// Header carrying the public Storefront access token.
pub const STOREFRONT_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

/// Page size for interactive catalog searches.
pub const SEARCH_PAGE_SIZE: u32 = 12;

/// Timeout and retry policy shared by every Storefront request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientSettings {
    pub request_timeout_secs: u64,
    /// Additional attempts after the first failure for retriable errors.
    pub max_retries: u32,
    /// Base delay for exponential back-off: `base * 2^(n-1)` ms before retry `n`.
    pub retry_backoff_base_ms: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            max_retries: 2,
            retry_backoff_base_ms: 500,
        }
    }
}

impl ClientSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            request_timeout_secs: config.request_timeout_secs,
            max_retries: config.max_retries,
            retry_backoff_base_ms: config.retry_backoff_base_ms,
        }
    }
}

/// Storefront GraphQL client bound to one shop.
///
/// Throttling (429), 5xx responses and network failures are retried with
/// exponential back-off and jitter up to `max_retries` additional attempts.
/// GraphQL-level `errors` are never retried.
pub struct StorefrontClient {
    client: Client,
    endpoint: String,
    shop_domain: String,
    access_token: String,
    max_retries: u32,
    retry_backoff_base_ms: u64,
}

impl std::fmt::Debug for StorefrontClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontClient")
            .field("endpoint", &self.endpoint)
            .field("access_token", &"[redacted]")
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl StorefrontClient {
    /// Creates a client for `credentials.shop_domain` at `api_version`.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::InvalidShopDomain`] if the domain has no usable host.
    /// - [`CatalogError::Http`] if the underlying `reqwest::Client` cannot be
    ///   constructed.
    pub fn new(
        credentials: &StorefrontCredentials,
        api_version: &str,
        settings: ClientSettings,
    ) -> Result<Self, CatalogError> {
        let endpoint = storefront_endpoint(&credentials.shop_domain, api_version)?;
        Self::with_endpoint(credentials, endpoint, settings)
    }

    /// Creates a client that posts to an explicit GraphQL `endpoint` URL.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Http`] if the `reqwest::Client` cannot be built.
    pub fn with_endpoint(
        credentials: &StorefrontCredentials,
        endpoint: impl Into<String>,
        settings: ClientSettings,
    ) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("shopfront/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            shop_domain: credentials.shop_domain.clone(),
            access_token: credentials.access_token.clone(),
            max_retries: settings.max_retries,
            retry_backoff_base_ms: settings.retry_backoff_base_ms,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// One search page of up to [`SEARCH_PAGE_SIZE`] products matching
    /// `query` in title or tags, normalized.
    ///
    /// # Errors
    ///
    /// Propagates any error from the underlying request; see
    /// [`Self::fetch_products_page`].
    pub async fn search_products(&self, query: &str) -> Result<Vec<Product>, CatalogError> {
        let request = GraphQlRequest::search(query, SEARCH_PAGE_SIZE);
        let connection = self.post_products(&request, "product search").await?;
        Ok(connection
            .edges
            .into_iter()
            .map(|edge| normalize_product(edge.node))
            .collect())
    }

    /// Fetches one page of the bulk product listing, continuing from `after`.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::RateLimited`] on HTTP 429 after all retries.
    /// - [`CatalogError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`CatalogError::Http`] on network or TLS failure after all retries.
    /// - [`CatalogError::Deserialize`] if the body does not match the
    ///   expected shape.
    /// - [`CatalogError::GraphQl`] if the response carries `errors`.
    /// - [`CatalogError::MissingData`] if `data` is null without `errors`.
    pub async fn fetch_products_page(
        &self,
        first: u32,
        after: Option<&str>,
    ) -> Result<ProductConnection, CatalogError> {
        let request = GraphQlRequest::list(first, after);
        self.post_products(&request, "product listing page").await
    }

    async fn post_products(
        &self,
        request: &GraphQlRequest<'_>,
        context: &str,
    ) -> Result<ProductConnection, CatalogError> {
        let text = retry_with_backoff(self.max_retries, self.retry_backoff_base_ms, || {
            async move {
                let response = self
                    .client
                    .post(&self.endpoint)
                    .header(STOREFRONT_TOKEN_HEADER, &self.access_token)
                    .header(reqwest::header::ACCEPT, "application/json")
                    .json(request)
                    .send()
                    .await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.trim().parse::<u64>().ok())
                        .unwrap_or(1);
                    return Err(CatalogError::RateLimited {
                        domain: self.shop_domain.clone(),
                        retry_after_secs,
                    });
                }

                if !status.is_success() {
                    return Err(CatalogError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: self.endpoint.clone(),
                    });
                }

                Ok(response.text().await?)
            }
        })
        .await?;

        let parsed = serde_json::from_str::<GraphQlResponse<ProductsData>>(&text).map_err(|e| {
            CatalogError::Deserialize {
                context: format!("{context} from {}", self.shop_domain),
                source: e,
            }
        })?;

        if !parsed.errors.is_empty() {
            let messages = parsed
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(CatalogError::GraphQl(messages));
        }

        parsed
            .data
            .map(|data| data.products)
            .ok_or_else(|| CatalogError::MissingData {
                context: context.to_owned(),
            })
    }
}
