//! Segmentation client adapter for background removal / foreground matting
//!
//! Issues a single POST against the segment endpoint with a publicly
//! reachable image URL and returns the resulting image bytes.

pub mod client;
pub mod mock;

pub use client::SegmentationClient;
pub use mock::MockSegmentationClient;

use crate::models::SegmentationMode;
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait SegmentationService: Send + Sync {
    async fn segment(&self, image_url: &str, mode: SegmentationMode) -> Result<Vec<u8>>;
}
