//! Application orchestration: load, analyze, render, segment.

use crate::analysis::{AnalysisClient, AnalysisService};
use crate::models::{Config, SegmentationMode, ANALYZE_FEATURES};
use crate::render::Renderer;
use crate::segment::{SegmentationClient, SegmentationService};
use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const BACKGROUND_FILE: &str = "background.png";
pub const DEFAULT_IMAGE: &str = "images/street.jpg";

/// The sample images live in a public repository; the segment endpoint only
/// accepts a URL it can fetch itself, not raw bytes.
const PUBLIC_IMAGE_URL_PATTERN: &str =
    "https://github.com/MicrosoftLearning/mslearn-ai-vision/blob/main/Labfiles/01-analyze-images/Python/image-analysis/{image}?raw=true";

/// Builds the publicly resolvable URL the segment endpoint fetches the image
/// from.
pub fn public_image_url(image_path: &Path) -> String {
    PUBLIC_IMAGE_URL_PATTERN.replace("{image}", &image_path.to_string_lossy())
}

/// Coordinates the analyze call, result rendering, and the independent
/// segmentation call for one run.
pub struct App {
    analysis: Box<dyn AnalysisService>,
    segmentation: Box<dyn SegmentationService>,
    renderer: Renderer,
    output_dir: PathBuf,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub analysis: Box<dyn AnalysisService>,
    pub segmentation: Box<dyn SegmentationService>,
}

impl App {
    /// Build an app from concrete service dependencies.
    ///
    /// This is primarily useful for integration tests and local harnesses
    /// that need to inject mocks.
    pub fn with_services(services: AppServices, output_dir: PathBuf) -> Self {
        Self {
            analysis: services.analysis,
            segmentation: services.segmentation,
            renderer: Renderer::new(output_dir.clone()),
            output_dir,
        }
    }

    /// Construct an app from environment configuration (`Config::from_env`).
    pub fn new() -> Result<Self> {
        let config = Config::from_env()?;

        // One HTTP connection pool shared across both adapters.
        let http_client = reqwest::Client::new();

        let analysis = Box::new(AnalysisClient::new_with_client(
            config.endpoint.clone(),
            config.key.clone(),
            http_client.clone(),
        ));
        let segmentation = Box::new(SegmentationClient::new_with_client(
            config.endpoint,
            config.key,
            http_client,
        ));

        Ok(Self::with_services(
            AppServices {
                analysis,
                segmentation,
            },
            PathBuf::from("."),
        ))
    }

    /// Runs the full pipeline for one image.
    ///
    /// An analyze failure aborts the run before rendering and segmentation;
    /// a segmentation failure propagates after the annotated images are
    /// already on disk. `background.png` is written only when the segment
    /// call returned image bytes.
    pub async fn run(&self, image_path: &Path) -> Result<()> {
        let image_data = fs::read(image_path)?;
        if image_data.is_empty() {
            return Err(Error::InvalidInput(format!(
                "{} is empty",
                image_path.display()
            )));
        }

        info!("Analyzing image {}...", image_path.display());
        let result = self.analysis.analyze(&image_data, &ANALYZE_FEATURES).await?;
        if let Some(model_version) = &result.model_version {
            info!("Analysis model version: {}", model_version);
        }

        self.renderer.render(&result, image_path)?;

        info!("Removing background from image...");
        let image_url = public_image_url(image_path);
        let matte = self
            .segmentation
            .segment(&image_url, SegmentationMode::ForegroundMatting)
            .await?;

        let background_path = self.output_dir.join(BACKGROUND_FILE);
        fs::write(&background_path, &matte)?;
        info!("Results saved in {}", background_path.display());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::MockAnalysisClient;
    use crate::models::{AnalysisResult, Caption};
    use crate::segment::MockSegmentationClient;
    use image::{Rgb, RgbImage};
    use std::path::Path;
    use tempfile::TempDir;

    fn write_source_image(dir: &Path) -> PathBuf {
        let path = dir.join("street.jpg");
        RgbImage::from_pixel(64, 64, Rgb([0, 0, 0]))
            .save_with_format(&path, image::ImageFormat::Jpeg)
            .unwrap();
        path
    }

    fn caption_only() -> AnalysisResult {
        AnalysisResult {
            caption: Some(Caption {
                text: "a quiet street".to_string(),
                confidence: 0.9,
            }),
            ..Default::default()
        }
    }

    fn build_app(
        dir: &Path,
        analysis: MockAnalysisClient,
        segmentation: MockSegmentationClient,
    ) -> App {
        App::with_services(
            AppServices {
                analysis: Box::new(analysis),
                segmentation: Box::new(segmentation),
            },
            dir.to_path_buf(),
        )
    }

    #[test]
    fn test_public_image_url_pattern() {
        let url = public_image_url(Path::new("images/street.jpg"));
        assert!(url.starts_with("https://github.com/"));
        assert!(url.contains("images/street.jpg"));
        assert!(url.ends_with("?raw=true"));
    }

    #[tokio::test]
    async fn test_run_writes_background_on_success() {
        let dir = TempDir::new().unwrap();
        let image_path = write_source_image(dir.path());

        let matte = vec![0x89, 0x50, 0x4E, 0x47];
        let segmentation = MockSegmentationClient::new().with_image_response(matte.clone());
        let segmentation_probe = segmentation.clone();

        let app = build_app(
            dir.path(),
            MockAnalysisClient::new().with_result(caption_only()),
            segmentation,
        );

        app.run(&image_path).await.unwrap();

        let written = fs::read(dir.path().join(BACKGROUND_FILE)).unwrap();
        assert_eq!(written, matte);
        assert_eq!(
            segmentation_probe.last_mode(),
            Some(SegmentationMode::ForegroundMatting)
        );
        assert!(segmentation_probe
            .last_url()
            .unwrap()
            .ends_with("?raw=true"));
    }

    #[tokio::test]
    async fn test_run_aborts_on_analyze_failure_before_segmentation() {
        let dir = TempDir::new().unwrap();
        let image_path = write_source_image(dir.path());

        let segmentation = MockSegmentationClient::new();
        let segmentation_probe = segmentation.clone();

        let app = build_app(
            dir.path(),
            MockAnalysisClient::new().with_api_failure(500, "backend exploded"),
            segmentation,
        );

        let err = app.run(&image_path).await.unwrap_err();
        assert!(matches!(err, Error::Api { status: 500, .. }));
        assert_eq!(segmentation_probe.get_call_count(), 0);
        assert!(!dir.path().join(BACKGROUND_FILE).exists());
    }

    #[tokio::test]
    async fn test_run_segmentation_failure_leaves_no_background_file() {
        let dir = TempDir::new().unwrap();
        let image_path = write_source_image(dir.path());

        let app = build_app(
            dir.path(),
            MockAnalysisClient::new().with_result(caption_only()),
            MockSegmentationClient::new().with_failure("connection reset"),
        );

        let err = app.run(&image_path).await.unwrap_err();
        assert!(matches!(err, Error::Segmentation(_)));
        assert!(!dir.path().join(BACKGROUND_FILE).exists());
    }

    #[tokio::test]
    async fn test_run_rejects_missing_image() {
        let dir = TempDir::new().unwrap();
        let app = build_app(
            dir.path(),
            MockAnalysisClient::new(),
            MockSegmentationClient::new(),
        );

        let err = app.run(&dir.path().join("missing.jpg")).await.unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[tokio::test]
    async fn test_run_rejects_empty_image_file() {
        let dir = TempDir::new().unwrap();
        let empty = dir.path().join("empty.jpg");
        fs::write(&empty, b"").unwrap();

        let analysis = MockAnalysisClient::new();
        let analysis_probe = analysis.clone();
        let app = build_app(dir.path(), analysis, MockSegmentationClient::new());

        let err = app.run(&empty).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(analysis_probe.get_call_count(), 0);
    }
}
