//! Insights Proxy
//!
//! Forwards a free-text question to an external question-answering service
//! and relays the answer. Independent of the report engine.

use crate::config::InsightsConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub const CREDITS_EXHAUSTED_ANSWER: &str = "The credits are over for today.";
pub const NO_ANSWER: &str = "No response from model";

#[derive(Error, Debug)]
pub enum InsightsError {
    #[error("Insights service is not configured")]
    NotConfigured,

    #[error("Failed to create HTTP client: {0}")]
    Client(String),

    #[error("Insights request failed: {0}")]
    Unreachable(String),

    #[error("Insights service returned an unreadable response: {0}")]
    InvalidResponse(String),
}

/// Something that can answer a free-text question
#[async_trait]
pub trait InsightsProvider: Send + Sync {
    async fn ask(&self, question: &str) -> Result<String, InsightsError>;
}

/// Used when no credential is configured
pub struct UnconfiguredInsights;

#[async_trait]
impl InsightsProvider for UnconfiguredInsights {
    async fn ask(&self, _question: &str) -> Result<String, InsightsError> {
        Err(InsightsError::NotConfigured)
    }
}

#[derive(Debug, Serialize)]
struct TriggerRequest<'a> {
    params: TriggerParams<'a>,
    project: &'a str,
}

#[derive(Debug, Serialize)]
struct TriggerParams<'a> {
    long_text: &'a str,
}

/// Client for a Relevance-style "trigger" endpoint
pub struct RelevanceClient {
    client: Client,
    endpoint: String,
    api_key: String,
    project: String,
}

impl RelevanceClient {
    pub fn new(config: &InsightsConfig) -> Result<Self, InsightsError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| InsightsError::Client(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            project: config.project.clone(),
        })
    }
}

#[async_trait]
impl InsightsProvider for RelevanceClient {
    async fn ask(&self, question: &str) -> Result<String, InsightsError> {
        let request = TriggerRequest {
            params: TriggerParams { long_text: question },
            project: &self.project,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| InsightsError::Unreachable(e.to_string()))?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| InsightsError::InvalidResponse(format!("HTTP {}: {}", status, e)))?;

        Ok(answer_from_response(&body))
    }
}

/// Pick the answer text out of an upstream response body
pub fn answer_from_response(body: &Value) -> String {
    if body.get("status").and_then(Value::as_str) == Some("failed") {
        return CREDITS_EXHAUSTED_ANSWER.to_string();
    }

    body.pointer("/output/answer")
        .and_then(Value::as_str)
        .filter(|answer| !answer.is_empty())
        .unwrap_or(NO_ANSWER)
        .to_string()
}

/// Build the provider for the given configuration
pub fn provider_from_config(
    config: Option<&InsightsConfig>,
) -> Result<Box<dyn InsightsProvider>, InsightsError> {
    match config {
        Some(config) => Ok(Box::new(RelevanceClient::new(config)?)),
        None => Ok(Box::new(UnconfiguredInsights)),
    }
}
