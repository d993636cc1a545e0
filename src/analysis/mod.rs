//! Analysis client adapter for the remote vision API
//!
//! Wraps the analyze endpoint: one synchronous call carrying the image bytes
//! and a fixed feature set, returning the structured result document.

pub mod client;
pub mod mock;

pub use client::AnalysisClient;
pub use mock::MockAnalysisClient;

use crate::models::{AnalysisResult, VisualFeature};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait AnalysisService: Send + Sync {
    async fn analyze(
        &self,
        image_data: &[u8],
        features: &[VisualFeature],
    ) -> Result<AnalysisResult>;
}
