//! Chat answers: the local heuristic, or a forwarded call to an answer
//! service with the heuristic as fallback.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use shopfront_core::{AnswerMode, AppConfig, Product};

use crate::error::StylistError;
use crate::heuristic::best_under_budget;
use crate::language::Language;
use crate::types::ProductSummary;

#[derive(Serialize)]
struct AnswerRequest<'a> {
    prompt: &'a str,
    products: Vec<ProductSummary>,
    lang: Language,
}

#[derive(Deserialize)]
struct AnswerResponse {
    answer: String,
}

/// Client for an external answer service: `{prompt, products, lang}` in,
/// `{answer}` out.
#[derive(Debug, Clone)]
pub struct AnswerClient {
    client: reqwest::Client,
    endpoint: String,
}

impl AnswerClient {
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

    /// # Errors
    ///
    /// - [`StylistError::Http`] on transport failure.
    /// - [`StylistError::UnexpectedStatus`] on a non-2xx status.
    /// - [`StylistError::Deserialize`] if the body has no `answer` string.
    /// - [`StylistError::Service`] if the answer is blank.
    pub async fn answer(
        &self,
        prompt: &str,
        products: &[Product],
        lang: Language,
    ) -> Result<String, StylistError> {
        let request = AnswerRequest {
            prompt,
            products: products.iter().map(ProductSummary::from).collect(),
            lang,
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
        let parsed: AnswerResponse =
            serde_json::from_str(&body).map_err(|e| StylistError::Deserialize {
                context: "answer service response".to_owned(),
                source: e,
            })?;
        let answer = parsed.answer.trim();
        if answer.is_empty() {
            return Err(StylistError::Service("answer service returned an empty answer".to_owned()));
        }
        Ok(answer.to_owned())
    }
}

/// Where an [`Answer`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    Heuristic,
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answer {
    pub text: String,
    pub source: AnswerSource,
    pub lang: Language,
}

/// Answers chat prompts according to the configured [`AnswerMode`].
///
/// Always answers: in remote mode any service failure is logged and the
/// heuristic answer is returned instead.
#[derive(Debug, Clone)]
pub struct Assistant {
    remote: Option<AnswerClient>,
}

impl Assistant {
    #[must_use]
    pub fn heuristic() -> Self {
        Self { remote: None }
    }

    #[must_use]
    pub fn remote(client: AnswerClient) -> Self {
        Self {
            remote: Some(client),
        }
    }

    /// Remote mode needs `answer_url`; without it the heuristic is used.
    ///
    /// # Errors
    ///
    /// Returns [`StylistError::Http`] if the answer client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, StylistError> {
        match (config.answer_mode, config.answer_url.as_deref()) {
            (AnswerMode::Remote, Some(url)) => {
                Ok(Self::remote(AnswerClient::new(url, config.request_timeout_secs)?))
            }
            (AnswerMode::Remote, None) => {
                tracing::warn!("answer mode is remote but no answer URL is set, using heuristic");
                Ok(Self::heuristic())
            }
            (AnswerMode::Heuristic, _) => Ok(Self::heuristic()),
        }
    }

    #[must_use]
    pub fn mode(&self) -> AnswerMode {
        if self.remote.is_some() {
            AnswerMode::Remote
        } else {
            AnswerMode::Heuristic
        }
    }

    pub async fn answer(&self, prompt: &str, products: &[Product], lang: Language) -> Answer {
        if let Some(client) = &self.remote {
            match client.answer(prompt, products, lang).await {
                Ok(text) => {
                    return Answer {
                        text,
                        source: AnswerSource::Remote,
                        lang,
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "answer service failed, falling back to heuristic");
                }
            }
        }
        Answer {
            text: best_under_budget(prompt, products, lang),
            source: AnswerSource::Heuristic,
            lang,
        }
    }
}
