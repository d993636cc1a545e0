use super::AnalysisService;
use crate::models::{AnalysisResult, VisualFeature};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const ANALYZE_API_VERSION: &str = "2023-10-01";

/// Error envelope the service wraps failures in.
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: String,
    message: String,
}

pub struct AnalysisClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl AnalysisClient {
    pub fn new(endpoint: String, api_key: String) -> Self {
        Self::new_with_client(endpoint, api_key, Client::new())
    }

    pub fn new_with_client(endpoint: String, api_key: String, client: Client) -> Self {
        Self {
            client,
            endpoint,
            api_key,
        }
    }

    #[cfg(test)]
    pub fn with_endpoint(mut self, endpoint: String) -> Self {
        self.endpoint = endpoint;
        self
    }

    fn analyze_url(&self) -> String {
        // The configured endpoint doubles as a raw REST prefix, so it is
        // expected to end with a slash.
        format!("{}computervision/imageanalysis:analyze", self.endpoint)
    }
}

#[async_trait]
impl AnalysisService for AnalysisClient {
    async fn analyze(
        &self,
        image_data: &[u8],
        features: &[VisualFeature],
    ) -> Result<AnalysisResult> {
        if image_data.is_empty() {
            return Err(Error::InvalidInput(
                "image data is empty; nothing to analyze".to_string(),
            ));
        }

        let feature_list = features
            .iter()
            .map(|f| f.as_query_value())
            .collect::<Vec<_>>()
            .join(",");

        tracing::debug!(
            "Sending analyze request ({} bytes, features: {})",
            image_data.len(),
            feature_list
        );

        let response = self
            .client
            .post(self.analyze_url())
            .timeout(Duration::from_secs(30))
            .query(&[
                ("api-version", ANALYZE_API_VERSION),
                ("features", &feature_list),
            ])
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .header("Content-Type", "application/octet-stream")
            .body(image_data.to_vec())
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send analyze request: {}", e);
                e
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let reason = status.canonical_reason().unwrap_or("unknown").to_string();
            let error_text = response.text().await?;
            tracing::error!("Analyze API error (status {}): {}", status, error_text);

            // Prefer the structured envelope; fall back to the raw body.
            let (code, message) = match serde_json::from_str::<ApiErrorEnvelope>(&error_text) {
                Ok(envelope) => (envelope.error.code, envelope.error.message),
                Err(_) => (reason, error_text),
            };
            return Err(Error::Api {
                status: status.as_u16(),
                code,
                message,
            });
        }

        Ok(response.json().await?)
    }
}
