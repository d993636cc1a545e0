//! Demonstration client for a cloud image-analysis service
//!
//! Loads a local image, sends it to a remote vision API for captioning,
//! tagging, and object/person detection, draws bounding boxes on copies of
//! the image, and requests a separate background-removal pass.

pub mod analysis;
pub mod app;
pub mod error;
pub mod models;
pub mod render;
pub mod segment;

pub use error::{Error, Result};
