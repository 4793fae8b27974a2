//! Visage Computer Vision Library
//!
//! OpenCV-backed cascade detection. The multi-scale sliding-window search
//! itself lives inside `objdetect::CascadeClassifier`; this crate wraps it
//! behind a frame-level API with preprocessing, an optional nested stage,
//! and annotation helpers.

pub mod annotate;
pub mod detection;
pub mod error;
pub mod source;
pub mod utils;

// Re-export commonly used types
pub use detection::{CascadeDetector, FrameReport};
pub use error::CvError;
pub use source::FrameSource;
pub use utils::ImageUtils;

// Error handling
pub type Result<T> = anyhow::Result<T>;
