//! Result rendering: console summaries and annotated image output
//!
//! Prints human-readable summaries for every category present in an analysis
//! result and, for the spatial categories (objects, people), draws bounding
//! boxes onto fresh copies of the source image.

use crate::models::{AnalysisResult, BoundingBox};
use crate::Result;
use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use std::path::{Path, PathBuf};

pub const OBJECTS_FILE: &str = "objects.jpg";
pub const PEOPLE_FILE: &str = "people.jpg";

const STROKE_WIDTH: u32 = 3;
const HIGHLIGHT: Rgb<u8> = Rgb([0, 255, 255]);
const LABEL_SCALE: f32 = 18.0;

/// Which annotated files a render pass produced.
#[derive(Debug, Default)]
pub struct RenderOutcome {
    pub objects_path: Option<PathBuf>,
    pub people_path: Option<PathBuf>,
}

/// Formats a confidence in [0, 1] as a percentage with two decimals.
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.2}%", confidence * 100.0)
}

/// Builds the console summary for every category present in the result.
///
/// Pure so the textual contract can be asserted in tests; [`Renderer::render`]
/// prints these lines verbatim.
pub fn summary_lines(result: &AnalysisResult) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(caption) = &result.caption {
        lines.push("Caption:".to_string());
        lines.push(format!(
            " Caption: '{}' (confidence: {})",
            caption.text,
            format_confidence(caption.confidence)
        ));
    }

    if let Some(dense_captions) = &result.dense_captions {
        lines.push("Dense Captions:".to_string());
        for caption in &dense_captions.values {
            lines.push(format!(
                " Caption: '{}' (confidence: {})",
                caption.text,
                format_confidence(caption.confidence)
            ));
        }
    }

    if let Some(tags) = &result.tags {
        lines.push("Tags:".to_string());
        for tag in &tags.values {
            lines.push(format!(
                " Tag: '{}' (confidence: {})",
                tag.name,
                format_confidence(tag.confidence)
            ));
        }
    }

    if let Some(objects) = &result.objects {
        lines.push("Objects in image:".to_string());
        for object in &objects.values {
            // Only the first tag per object is reported
            if let Some(tag) = object.tags.first() {
                lines.push(format!(
                    " {} (confidence: {})",
                    tag.name,
                    format_confidence(tag.confidence)
                ));
            }
        }
    }

    if let Some(people) = &result.people {
        lines.push("People in image:".to_string());
        lines.push(format!(" {} detected", people.values.len()));
    }

    lines
}

/// Draws a hollow rectangle with inclusive corners at the bounding box
/// extents. The stroke is inset so the outer edge stays exactly on the box:
/// corners land on (x, y) and (x + width, y + height).
fn draw_bounding_box(image: &mut RgbImage, bb: &BoundingBox) {
    for i in 0..STROKE_WIDTH {
        if bb.width + 1 <= 2 * i || bb.height + 1 <= 2 * i {
            break;
        }
        let rect = Rect::at((bb.x + i) as i32, (bb.y + i) as i32)
            .of_size(bb.width + 1 - 2 * i, bb.height + 1 - 2 * i);
        draw_hollow_rect_mut(image, rect, HIGHLIGHT);
    }
}

pub struct Renderer {
    output_dir: PathBuf,
    label_font: Option<FontVec>,
}

impl Renderer {
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            label_font: load_label_font(),
        }
    }

    /// Prints summaries and writes annotated copies for spatial categories.
    ///
    /// Each annotation pass decodes the source image fresh, so the objects
    /// and people passes never share a mutable buffer. A present-but-empty
    /// spatial category still writes its file.
    pub fn render(&self, result: &AnalysisResult, image_path: &Path) -> Result<RenderOutcome> {
        for line in summary_lines(result) {
            println!("{}", line);
        }

        let mut outcome = RenderOutcome::default();

        if let Some(objects) = &result.objects {
            let mut image = image::open(image_path)?.to_rgb8();
            for object in &objects.values {
                draw_bounding_box(&mut image, &object.bounding_box);
                if let (Some(font), Some(tag)) = (&self.label_font, object.tags.first()) {
                    draw_text_mut(
                        &mut image,
                        HIGHLIGHT,
                        object.bounding_box.x as i32,
                        object.bounding_box.y as i32,
                        PxScale::from(LABEL_SCALE),
                        font,
                        &tag.name,
                    );
                }
            }
            let path = self.output_dir.join(OBJECTS_FILE);
            image.save(&path)?;
            tracing::info!("Results saved in {}", path.display());
            outcome.objects_path = Some(path);
        }

        if let Some(people) = &result.people {
            let mut image = image::open(image_path)?.to_rgb8();
            for person in &people.values {
                draw_bounding_box(&mut image, &person.bounding_box);
            }
            let path = self.output_dir.join(PEOPLE_FILE);
            image.save(&path)?;
            tracing::info!("Results saved in {}", path.display());
            outcome.people_path = Some(path);
        }

        Ok(outcome)
    }
}

/// Loads an optional TTF/OTF font for object labels from `VISION_LABEL_FONT`.
/// Boxes are drawn unlabeled when no usable font is configured.
fn load_label_font() -> Option<FontVec> {
    let path = std::env::var("VISION_LABEL_FONT").ok()?;
    match std::fs::read(&path) {
        Ok(data) => match FontVec::try_from_vec(data) {
            Ok(font) => Some(font),
            Err(e) => {
                tracing::warn!("Could not parse label font {}: {}", path, e);
                None
            }
        },
        Err(e) => {
            tracing::warn!("Could not read label font {}: {}", path, e);
            None
        }
    }
}
