use std::net::SocketAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Where chat answers come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnswerMode {
    /// Highest-rated pick under the price ceiling, rendered from a template.
    #[default]
    Heuristic,
    /// Forwarded to the external answer service, heuristic on failure.
    Remote,
}

impl std::fmt::Display for AnswerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnswerMode::Heuristic => write!(f, "heuristic"),
            AnswerMode::Remote => write!(f, "remote"),
        }
    }
}

/// Shop domain and Storefront API access token.
///
/// Both halves are required to talk to a live store; when either is missing
/// the catalog runs against the bundled mock data.
#[derive(Clone, PartialEq, Eq)]
pub struct StorefrontCredentials {
    /// Bare shop domain, e.g. `"demo-store.myshopify.com"`.
    pub shop_domain: String,
    pub access_token: String,
}

impl StorefrontCredentials {
    /// Builds credentials only when both values are present and non-blank.
    #[must_use]
    pub fn from_parts(shop_domain: Option<&str>, access_token: Option<&str>) -> Option<Self> {
        let shop_domain = shop_domain.map(str::trim).filter(|s| !s.is_empty())?;
        let access_token = access_token.map(str::trim).filter(|s| !s.is_empty())?;
        Some(Self {
            shop_domain: shop_domain.to_owned(),
            access_token: access_token.to_owned(),
        })
    }
}

impl std::fmt::Debug for StorefrontCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontCredentials")
            .field("shop_domain", &self.shop_domain)
            .field("access_token", &"[redacted]")
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub shop_domain: Option<String>,
    pub storefront_token: Option<String>,
    pub storefront_api_version: String,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub bulk_max_pages: usize,
    pub bulk_max_duration_secs: u64,
    pub bulk_inter_request_delay_ms: u64,
    /// Requests allowed per window on the rate-limited API routes.
    pub rate_limit_max_requests: usize,
    pub rate_limit_window_secs: u64,
    pub answer_mode: AnswerMode,
    pub answer_url: Option<String>,
    pub outfit_url: Option<String>,
}

impl AppConfig {
    /// Live-store credentials, or `None` when the catalog should stay on mock data.
    #[must_use]
    pub fn storefront_credentials(&self) -> Option<StorefrontCredentials> {
        StorefrontCredentials::from_parts(
            self.shop_domain.as_deref(),
            self.storefront_token.as_deref(),
        )
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("shop_domain", &self.shop_domain)
            .field(
                "storefront_token",
                &self.storefront_token.as_ref().map(|_| "[redacted]"),
            )
            .field("storefront_api_version", &self.storefront_api_version)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("bulk_max_pages", &self.bulk_max_pages)
            .field("bulk_max_duration_secs", &self.bulk_max_duration_secs)
            .field(
                "bulk_inter_request_delay_ms",
                &self.bulk_inter_request_delay_ms,
            )
            .field("rate_limit_max_requests", &self.rate_limit_max_requests)
            .field("rate_limit_window_secs", &self.rate_limit_window_secs)
            .field("answer_mode", &self.answer_mode)
            .field("answer_url", &self.answer_url)
            .field("outfit_url", &self.outfit_url)
            .finish()
    }
}
