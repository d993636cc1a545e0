use super::SegmentationService;
use crate::models::SegmentationMode;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct MockSegmentationClient {
    responses: Arc<Mutex<Vec<std::result::Result<Vec<u8>, String>>>>,
    call_count: Arc<Mutex<usize>>,
    last_url: Arc<Mutex<Option<String>>>,
    last_mode: Arc<Mutex<Option<SegmentationMode>>>,
}

impl MockSegmentationClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            last_url: Arc::new(Mutex::new(None)),
            last_mode: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_image_response(self, bytes: Vec<u8>) -> Self {
        self.responses.lock().unwrap().push(Ok(bytes));
        self
    }

    pub fn with_failure(self, message: &str) -> Self {
        self.responses.lock().unwrap().push(Err(message.to_string()));
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn last_url(&self) -> Option<String> {
        self.last_url.lock().unwrap().clone()
    }

    pub fn last_mode(&self) -> Option<SegmentationMode> {
        *self.last_mode.lock().unwrap()
    }
}

impl Default for MockSegmentationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SegmentationService for MockSegmentationClient {
    async fn segment(&self, image_url: &str, mode: SegmentationMode) -> Result<Vec<u8>> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        *self.last_url.lock().unwrap() = Some(image_url.to_string());
        *self.last_mode.lock().unwrap() = Some(mode);

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            // Default: a tiny PNG signature stands in for the matte
            return Ok(vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]);
        }

        let index = (*count - 1) % responses.len();
        match &responses[index] {
            Ok(bytes) => Ok(bytes.clone()),
            Err(message) => Err(Error::Segmentation(message.clone())),
        }
    }
}
