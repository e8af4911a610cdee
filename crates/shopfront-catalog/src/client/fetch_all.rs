//! Sequential, bounded bulk load of the whole Storefront catalog.

use std::time::{Duration, Instant};

use serde::Serialize;
use shopfront_core::{AppConfig, Product};

use crate::error::CatalogError;
use crate::normalize::normalize_product;
use crate::pagination::{next_page, NextPage};

use super::{ClientSettings, StorefrontClient};

/// Page size for bulk listing requests.
pub const BULK_PAGE_SIZE: u32 = 50;

/// Bounds on a single bulk load.
///
/// Note: each page request may itself be retried up to `max_retries` times,
/// so the worst-case request count is `max_pages * (1 + max_retries)`.
/// `max_duration` caps the wall-clock time regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkOptions {
    pub page_size: u32,
    pub max_pages: usize,
    pub max_duration: Duration,
    /// Pause between page requests (not before the first).
    pub inter_request_delay: Duration,
}

impl Default for BulkOptions {
    fn default() -> Self {
        Self {
            page_size: BULK_PAGE_SIZE,
            max_pages: 200,
            max_duration: Duration::from_secs(120),
            inter_request_delay: Duration::ZERO,
        }
    }
}

impl BulkOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            page_size: BULK_PAGE_SIZE,
            max_pages: config.bulk_max_pages,
            max_duration: Duration::from_secs(config.bulk_max_duration_secs),
            inter_request_delay: Duration::from_millis(config.bulk_inter_request_delay_ms),
        }
    }
}

/// How a bulk load ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadOutcome {
    /// The last page reported `hasNextPage: false`.
    Complete,
    /// No shop domain or access token; nothing was requested.
    MissingCredentials,
    /// A page request failed; earlier pages are kept.
    Partial { error: String },
    /// Stopped after `max_pages` pages with more still available.
    PageLimit { max_pages: usize },
    /// Stopped when the time budget ran out.
    TimeLimit { max_duration_secs: u64 },
    /// The server reported another page without a new cursor.
    CursorStalled,
}

impl LoadOutcome {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl std::fmt::Display for LoadOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Complete => f.write_str("complete"),
            Self::MissingCredentials => f.write_str("storefront credentials missing"),
            Self::Partial { error } => write!(f, "stopped early: {error}"),
            Self::PageLimit { max_pages } => write!(f, "stopped at the {max_pages}-page limit"),
            Self::TimeLimit { max_duration_secs } => {
                write!(f, "stopped at the {max_duration_secs}s time limit")
            }
            Self::CursorStalled => f.write_str("pagination cursor did not advance"),
        }
    }
}

/// Result of [`BulkLoader::load_all`]: every record collected, in page order.
#[derive(Debug, Clone)]
pub struct BulkLoad {
    pub products: Vec<Product>,
    /// Pages successfully fetched.
    pub pages: usize,
    pub outcome: LoadOutcome,
}

/// Drains the Storefront `products` connection page by page.
#[derive(Debug)]
pub struct BulkLoader {
    client: Option<StorefrontClient>,
    options: BulkOptions,
}

impl BulkLoader {
    /// `client` is `None` when no credentials are configured.
    #[must_use]
    pub fn new(client: Option<StorefrontClient>, options: BulkOptions) -> Self {
        Self { client, options }
    }

    /// Loader for the store named in `config`, or a credential-less loader
    /// when the shop domain or token is unset.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if credentials are present but the client
    /// cannot be built (for example an unusable shop domain).
    pub fn from_config(config: &AppConfig) -> Result<Self, CatalogError> {
        let client = config
            .storefront_credentials()
            .map(|credentials| {
                StorefrontClient::new(
                    &credentials,
                    &config.storefront_api_version,
                    ClientSettings::from_config(config),
                )
            })
            .transpose()?;
        Ok(Self::new(client, BulkOptions::from_config(config)))
    }

    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.client.is_some()
    }

    #[must_use]
    pub fn options(&self) -> &BulkOptions {
        &self.options
    }

    /// Fetches pages of [`BulkOptions::page_size`] sequentially, each with the
    /// previous page's `endCursor`, until `hasNextPage` is false or a bound is
    /// hit.
    ///
    /// Never fails: a page error ends the load with whatever was already
    /// collected and the reason in [`BulkLoad::outcome`]. Dropping the
    /// returned future cancels the in-flight request.
    pub async fn load_all(&self) -> BulkLoad {
        let Some(client) = &self.client else {
            tracing::warn!("storefront credentials missing, skipping bulk load");
            return BulkLoad {
                products: Vec::new(),
                pages: 0,
                outcome: LoadOutcome::MissingCredentials,
            };
        };

        let options = self.options;
        let started = Instant::now();
        let mut products: Vec<Product> = Vec::new();
        let mut pages = 0usize;
        let mut cursor: Option<String> = None;

        let outcome = loop {
            if pages >= options.max_pages {
                break LoadOutcome::PageLimit {
                    max_pages: options.max_pages,
                };
            }

            if pages > 0 && !options.inter_request_delay.is_zero() {
                tokio::time::sleep(options.inter_request_delay).await;
            }

            let time_limit = LoadOutcome::TimeLimit {
                max_duration_secs: options.max_duration.as_secs(),
            };
            let remaining = options.max_duration.saturating_sub(started.elapsed());
            if remaining.is_zero() {
                break time_limit;
            }

            let fetch = client.fetch_products_page(options.page_size, cursor.as_deref());
            let page = match tokio::time::timeout(remaining, fetch).await {
                Err(_elapsed) => break time_limit,
                Ok(Err(e)) => {
                    tracing::warn!(
                        page = pages + 1,
                        collected = products.len(),
                        error = %e,
                        "bulk catalog page failed, keeping records fetched so far"
                    );
                    break LoadOutcome::Partial {
                        error: e.to_string(),
                    };
                }
                Ok(Ok(page)) => page,
            };

            pages += 1;
            let fetched = page.edges.len();
            products.extend(page.edges.into_iter().map(|edge| normalize_product(edge.node)));
            tracing::debug!(page = pages, fetched, total = products.len(), "fetched bulk page");

            match next_page(&page.page_info, cursor.as_deref()) {
                NextPage::Done => break LoadOutcome::Complete,
                NextPage::Continue(next) => cursor = Some(next),
                NextPage::Stalled => {
                    tracing::warn!(
                        page = pages,
                        cursor = ?page.page_info.end_cursor,
                        "hasNextPage set without a new endCursor, stopping"
                    );
                    break LoadOutcome::CursorStalled;
                }
            }
        };

        if matches!(
            outcome,
            LoadOutcome::PageLimit { .. } | LoadOutcome::TimeLimit { .. }
        ) {
            tracing::warn!(pages, total = products.len(), %outcome, "bulk load hit a safety bound");
        }
        tracing::info!(
            pages,
            total = products.len(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            %outcome,
            "bulk catalog load finished"
        );

        BulkLoad {
            products,
            pages,
            outcome,
        }
    }
}
