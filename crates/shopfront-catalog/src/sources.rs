//! Product sources and the fallback cascade behind interactive catalog search.
//!
//! A [`FallbackChain`] asks each [`ProductSource`] in turn and returns the
//! first non-empty successful result. Failures are logged and swallowed; the
//! caller only ever sees a (possibly empty) product list.

use async_trait::async_trait;
use serde::Serialize;
use shopfront_core::{filter_mock_catalog, AppConfig, Product, StorefrontCredentials};

use crate::client::{ClientSettings, StorefrontClient};
use crate::error::CatalogError;

#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Short label used in logs and responses.
    fn name(&self) -> &'static str;

    async fn search(&self, query: &str) -> Result<Vec<Product>, CatalogError>;
}

/// The bundled demo catalog. Never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockSource;

#[async_trait]
impl ProductSource for MockSource {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn search(&self, query: &str) -> Result<Vec<Product>, CatalogError> {
        Ok(filter_mock_catalog(query))
    }
}

/// One Storefront search page per query.
#[derive(Debug)]
pub struct StorefrontSource {
    client: StorefrontClient,
}

impl StorefrontSource {
    #[must_use]
    pub fn new(client: StorefrontClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProductSource for StorefrontSource {
    fn name(&self) -> &'static str {
        "storefront"
    }

    async fn search(&self, query: &str) -> Result<Vec<Product>, CatalogError> {
        self.client.search_products(query).await
    }
}

/// Products plus the name of the source that produced them.
///
/// `source` is `None` when every source failed or came back empty.
#[derive(Debug, Clone, Serialize)]
pub struct SourcedProducts {
    pub source: Option<&'static str>,
    pub products: Vec<Product>,
}

/// Ordered list of sources tried until one returns products.
pub struct FallbackChain {
    sources: Vec<Box<dyn ProductSource>>,
}

impl FallbackChain {
    #[must_use]
    pub fn new(sources: Vec<Box<dyn ProductSource>>) -> Self {
        Self { sources }
    }

    #[must_use]
    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// First non-empty successful result, else an empty list.
    pub async fn search(&self, query: &str) -> SourcedProducts {
        for source in &self.sources {
            match source.search(query).await {
                Ok(products) if !products.is_empty() => {
                    tracing::debug!(
                        source = source.name(),
                        count = products.len(),
                        "catalog source answered"
                    );
                    return SourcedProducts {
                        source: Some(source.name()),
                        products,
                    };
                }
                Ok(_) => {
                    tracing::debug!(source = source.name(), query, "catalog source returned nothing");
                }
                Err(e) => {
                    tracing::warn!(
                        source = source.name(),
                        query,
                        error = %e,
                        "catalog source failed, trying next"
                    );
                }
            }
        }
        SourcedProducts {
            source: None,
            products: Vec::new(),
        }
    }
}

impl std::fmt::Debug for FallbackChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackChain")
            .field("sources", &self.source_names())
            .finish()
    }
}

/// Interactive catalog search: live Storefront first, mock catalog second.
#[derive(Debug)]
pub struct CatalogClient {
    chain: FallbackChain,
}

impl CatalogClient {
    /// Builds the cascade for `credentials`.
    ///
    /// With no credentials, or when the Storefront client cannot be built,
    /// the chain holds only the mock source.
    #[must_use]
    pub fn new(
        credentials: Option<&StorefrontCredentials>,
        api_version: &str,
        settings: ClientSettings,
    ) -> Self {
        let mut sources: Vec<Box<dyn ProductSource>> = Vec::new();
        if let Some(credentials) = credentials {
            match StorefrontClient::new(credentials, api_version, settings) {
                Ok(client) => sources.push(Box::new(StorefrontSource::new(client))),
                Err(e) => tracing::warn!(
                    shop_domain = %credentials.shop_domain,
                    error = %e,
                    "could not build storefront client, serving mock catalog only"
                ),
            }
        }
        sources.push(Box::new(MockSource));
        Self::with_chain(FallbackChain::new(sources))
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.storefront_credentials().as_ref(),
            &config.storefront_api_version,
            ClientSettings::from_config(config),
        )
    }

    #[must_use]
    pub fn mock_only() -> Self {
        Self::with_chain(FallbackChain::new(vec![Box::new(MockSource)]))
    }

    #[must_use]
    pub fn with_chain(chain: FallbackChain) -> Self {
        Self { chain }
    }

    /// `true` when a live Storefront source heads the chain.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.chain.source_names().first() == Some(&"storefront")
    }

    pub async fn search(&self, query: &str) -> SourcedProducts {
        self.chain.search(query).await
    }

    /// Convenience wrapper returning only the products.
    pub async fn search_products(&self, query: &str) -> Vec<Product> {
        self.search(query).await.products
    }
}
