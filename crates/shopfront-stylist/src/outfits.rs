//! Client for the external outfit-completion service.

use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopfront_core::{AppConfig, Product};

use crate::error::StylistError;
use crate::types::{OutfitRecommendation, ProductSummary};

/// How the completion service answered.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionReply {
    Parsed(OutfitRecommendation),
    /// The body could not be read as a recommendation.
    Malformed(String),
    /// The service answered `{"success": false, "error": ...}`.
    ServiceError(String),
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    query: &'a str,
    products: Vec<ProductSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    budget: Option<Decimal>,
}

#[derive(Deserialize)]
struct CompletionEnvelope {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    recommendations: Option<serde_json::Value>,
    /// A plain string or an object carrying `message`.
    #[serde(default)]
    error: Option<serde_json::Value>,
}

fn error_message(error: Option<serde_json::Value>) -> String {
    match error {
        Some(serde_json::Value::String(message)) => message,
        Some(serde_json::Value::Object(fields)) => fields
            .get("message")
            .and_then(serde_json::Value::as_str)
            .map_or_else(
                || serde_json::Value::Object(fields.clone()).to_string(),
                str::to_owned,
            ),
        Some(serde_json::Value::Null) | None => "completion service reported failure".to_owned(),
        Some(other) => other.to_string(),
    }
}

impl CompletionReply {
    /// Classifies a raw response body.
    #[must_use]
    pub fn classify(body: &str) -> Self {
        let envelope = match serde_json::from_str::<CompletionEnvelope>(body) {
            Ok(envelope) => envelope,
            Err(e) => return Self::Malformed(format!("body is not a completion envelope: {e}")),
        };

        if envelope.success == Some(false) {
            return Self::ServiceError(error_message(envelope.error));
        }

        let Some(recommendations) = envelope.recommendations else {
            return Self::Malformed("missing recommendations".to_owned());
        };

        // Some completion backends hand the structured output back as a string.
        let parsed = match recommendations {
            serde_json::Value::String(text) => serde_json::from_str::<OutfitRecommendation>(&text),
            other => serde_json::from_value::<OutfitRecommendation>(other),
        };
        match parsed {
            Ok(recommendation) => Self::Parsed(recommendation),
            Err(e) => Self::Malformed(format!("recommendations do not match the outfit shape: {e}")),
        }
    }

    /// Collapses a reply into the caller-facing result. Malformed replies
    /// become [`OutfitRecommendation::degraded`].
    ///
    /// # Errors
    ///
    /// Returns [`StylistError::Service`] for [`CompletionReply::ServiceError`].
    pub fn into_recommendation(self) -> Result<OutfitRecommendation, StylistError> {
        match self {
            Self::Parsed(recommendation) => Ok(recommendation),
            Self::Malformed(reason) => {
                tracing::warn!(reason, "malformed outfit completion, returning degraded recommendation");
                Ok(OutfitRecommendation::degraded())
            }
            Self::ServiceError(message) => Err(StylistError::Service(message)),
        }
    }
}

/// Posts style requests plus the catalog summary to the completion service.
#[derive(Debug, Clone)]
pub struct OutfitClient {
    client: reqwest::Client,
    endpoint: String,
}

impl OutfitClient {
    /// # Errors
    ///
    /// Returns [`StylistError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Result<Self, StylistError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Client for `config.outfit_url`, or `None` when it is unset.
    ///
    /// # Errors
    ///
    /// Returns [`StylistError::Http`] if the `reqwest::Client` cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Option<Self>, StylistError> {
        config
            .outfit_url
            .as_deref()
            .map(|url| Self::new(url, config.request_timeout_secs))
            .transpose()
    }

    /// Asks the completion service for outfits built from `products`.
    ///
    /// # Errors
    ///
    /// - [`StylistError::EmptyCatalog`] if `products` is empty; nothing is sent.
    /// - [`StylistError::Http`] on transport failure.
    /// - [`StylistError::UnexpectedStatus`] on a non-2xx status.
    /// - [`StylistError::Service`] when the service reports `success: false`.
    pub async fn recommend(
        &self,
        query: &str,
        products: &[Product],
        budget: Option<Decimal>,
    ) -> Result<OutfitRecommendation, StylistError> {
        if products.is_empty() {
            return Err(StylistError::EmptyCatalog);
        }

        let request = CompletionRequest {
            query,
            products: products.iter().map(ProductSummary::from).collect(),
            budget,
        };
        let response = self.client.post(&self.endpoint).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StylistError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.endpoint.clone(),
            });
        }

        let body = response.text().await?;
        CompletionReply::classify(&body).into_recommendation()
    }
}
