use super::SegmentationService;
use crate::models::SegmentationMode;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

const SEGMENT_API_VERSION: &str = "2023-02-01-preview";

#[derive(Debug, Serialize)]
struct SegmentRequest<'a> {
    url: &'a str,
}

pub struct SegmentationClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl SegmentationClient {
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

    fn segment_url(&self) -> String {
        format!("{}computervision/imageanalysis:segment", self.endpoint)
    }
}

#[async_trait]
impl SegmentationService for SegmentationClient {
    async fn segment(&self, image_url: &str, mode: SegmentationMode) -> Result<Vec<u8>> {
        tracing::debug!(
            "Sending segment request (mode: {}, url: {})",
            mode.as_query_value(),
            image_url
        );

        let response = self
            .client
            .post(self.segment_url())
            .timeout(Duration::from_secs(60))
            .query(&[
                ("api-version", SEGMENT_API_VERSION),
                ("mode", mode.as_query_value()),
            ])
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .json(&SegmentRequest { url: image_url })
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send segment request: {}", e);
                e
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            tracing::error!("Segment API error (status {}): {}", status, error_text);
            return Err(Error::Segmentation(format!(
                "API error (status {}): {}",
                status, error_text
            )));
        }

        // The service answers with raw image bytes on success. Anything else
        // (an error document with a 200, a proxy page) must not end up on
        // disk masquerading as a PNG.
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !content_type.starts_with("image/") {
            tracing::error!(
                "Segment response has non-image content type: {:?}",
                content_type
            );
            return Err(Error::Segmentation(format!(
                "expected image response, got content type {:?}",
                content_type
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PNG_MAGIC: [u8; 4] = [0x89, 0x50, 0x4E, 0x47];

    fn make_client(server: &MockServer) -> SegmentationClient {
        SegmentationClient::new("unused/".to_string(), "test-key".to_string())
            .with_endpoint(format!("{}/", server.uri()))
    }

    #[tokio::test]
    async fn test_segment_posts_url_body_with_mode_and_version() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/computervision/imageanalysis:segment"))
            .and(query_param("api-version", "2023-02-01-preview"))
            .and(query_param("mode", "foregroundMatting"))
            .and(header("Ocp-Apim-Subscription-Key", "test-key"))
            .and(body_json(serde_json::json!({
                "url": "https://example.com/street.jpg"
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Content-Type", "image/png")
                    .set_body_bytes(PNG_MAGIC.to_vec()),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server);
        let bytes = client
            .segment(
                "https://example.com/street.jpg",
                SegmentationMode::ForegroundMatting,
            )
            .await
            .unwrap();

        assert_eq!(bytes, PNG_MAGIC.to_vec());
    }

    #[tokio::test]
    async fn test_segment_background_removal_mode_value() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/computervision/imageanalysis:segment"))
            .and(query_param("mode", "backgroundRemoval"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Content-Type", "image/png")
                    .set_body_bytes(PNG_MAGIC.to_vec()),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server);
        client
            .segment(
                "https://example.com/street.jpg",
                SegmentationMode::BackgroundRemoval,
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_segment_api_error_is_distinguished() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/computervision/imageanalysis:segment"))
            .respond_with(ResponseTemplate::new(400).set_body_string("InvalidImageUrl"))
            .mount(&server)
            .await;

        let client = make_client(&server);
        let err = client
            .segment("not-a-url", SegmentationMode::ForegroundMatting)
            .await
            .unwrap_err();

        match err {
            Error::Segmentation(message) => {
                assert!(message.contains("status 400"));
                assert!(message.contains("InvalidImageUrl"));
            }
            other => panic!("expected Segmentation error, got: {}", other),
        }
    }

    #[tokio::test]
    async fn test_segment_rejects_non_image_success_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/computervision/imageanalysis:segment"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"error": "quota exceeded"}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let client = make_client(&server);
        let err = client
            .segment(
                "https://example.com/street.jpg",
                SegmentationMode::ForegroundMatting,
            )
            .await
            .unwrap_err();

        match err {
            Error::Segmentation(message) => {
                assert!(message.contains("application/json"));
            }
            other => panic!("expected Segmentation error, got: {}", other),
        }
    }
}
