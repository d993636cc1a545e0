//! Data models and structures
//!
//! Defines the configuration, the visual-feature set requested from the
//! analysis API, and the serde mapping of its response document.

use serde::Deserialize;

/// A capability that can be requested from the analyze endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualFeature {
    Caption,
    DenseCaptions,
    Tags,
    Objects,
    People,
}

impl VisualFeature {
    /// Wire name used in the `features` query parameter.
    pub fn as_query_value(&self) -> &'static str {
        match self {
            VisualFeature::Caption => "caption",
            VisualFeature::DenseCaptions => "denseCaptions",
            VisualFeature::Tags => "tags",
            VisualFeature::Objects => "objects",
            VisualFeature::People => "people",
        }
    }
}

/// The fixed feature set this client always requests.
pub const ANALYZE_FEATURES: [VisualFeature; 5] = [
    VisualFeature::Caption,
    VisualFeature::DenseCaptions,
    VisualFeature::Tags,
    VisualFeature::Objects,
    VisualFeature::People,
];

/// Subject/background separation modes offered by the segment endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentationMode {
    ForegroundMatting,
    BackgroundRemoval,
}

impl SegmentationMode {
    pub fn as_query_value(&self) -> &'static str {
        match self {
            SegmentationMode::ForegroundMatting => "foregroundMatting",
            SegmentationMode::BackgroundRemoval => "backgroundRemoval",
        }
    }
}

/// Axis-aligned rectangle in image pixel space, top-left origin.
///
/// The wire document abbreviates width/height to `w`/`h`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    #[serde(rename = "w")]
    pub width: u32,
    #[serde(rename = "h")]
    pub height: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Caption {
    pub text: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DenseCaption {
    pub text: String,
    pub confidence: f64,
    pub bounding_box: BoundingBox,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DenseCaptions {
    pub values: Vec<DenseCaption>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tag {
    pub name: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tags {
    pub values: Vec<Tag>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedObject {
    pub bounding_box: BoundingBox,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Objects {
    pub values: Vec<DetectedObject>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedPerson {
    pub bounding_box: BoundingBox,
    pub confidence: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct People {
    pub values: Vec<DetectedPerson>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
}

/// Structured analyze response.
///
/// Every category is optional: a sub-result is present only when it was
/// requested and the service returned it. Presence with an empty `values`
/// list is distinct from absence, and the renderer relies on that.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(rename = "captionResult")]
    pub caption: Option<Caption>,
    #[serde(rename = "denseCaptionsResult")]
    pub dense_captions: Option<DenseCaptions>,
    #[serde(rename = "tagsResult")]
    pub tags: Option<Tags>,
    #[serde(rename = "objectsResult")]
    pub objects: Option<Objects>,
    #[serde(rename = "peopleResult")]
    pub people: Option<People>,
    pub metadata: Option<ImageMetadata>,
    pub model_version: Option<String>,
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: String,
    pub key: String,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        let endpoint = std::env::var("AI_SERVICE_ENDPOINT")
            .map_err(|_| crate::Error::Config("AI_SERVICE_ENDPOINT not set".to_string()))?;
        let key = std::env::var("AI_SERVICE_KEY")
            .map_err(|_| crate::Error::Config("AI_SERVICE_KEY not set".to_string()))?;

        if endpoint.trim().is_empty() {
            return Err(crate::Error::Config(
                "AI_SERVICE_ENDPOINT is empty".to_string(),
            ));
        }
        if key.trim().is_empty() {
            return Err(crate::Error::Config("AI_SERVICE_KEY is empty".to_string()));
        }

        Ok(Self { endpoint, key })
    }
}
