use super::AnalysisService;
use crate::models::{AnalysisResult, Caption, VisualFeature};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

enum QueuedResponse {
    Result(AnalysisResult),
    ApiFailure { status: u16, message: String },
}

#[derive(Clone)]
pub struct MockAnalysisClient {
    responses: Arc<Mutex<Vec<QueuedResponse>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockAnalysisClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_result(self, result: AnalysisResult) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push(QueuedResponse::Result(result));
        self
    }

    pub fn with_api_failure(self, status: u16, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push(QueuedResponse::ApiFailure {
                status,
                message: message.to_string(),
            });
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for MockAnalysisClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnalysisService for MockAnalysisClient {
    async fn analyze(
        &self,
        _image_data: &[u8],
        _features: &[VisualFeature],
    ) -> Result<AnalysisResult> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            // Default mock response: a caption and nothing else
            return Ok(AnalysisResult {
                caption: Some(Caption {
                    text: "a mock scene".to_string(),
                    confidence: 0.5,
                }),
                ..Default::default()
            });
        }

        let index = (*count - 1) % responses.len();
        match &responses[index] {
            QueuedResponse::Result(result) => Ok(result.clone()),
            QueuedResponse::ApiFailure { status, message } => Err(Error::Api {
                status: *status,
                code: "MockFailure".to_string(),
                message: message.clone(),
            }),
        }
    }
}
