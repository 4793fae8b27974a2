//! Detection configuration

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Knobs forwarded to the library's multi-scale search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectParams {
    /// Pyramid step between scanned scales.
    pub scale_factor: f64,
    /// Candidate windows required to retain a hit.
    pub min_neighbors: i32,
    /// Smallest window scanned, (width, height).
    pub min_object_size: (i32, i32),
    /// Largest window scanned; (0, 0) leaves the upper bound to the library.
    pub max_object_size: (i32, i32),
}

impl Default for DetectParams {
    fn default() -> Self {
        Self {
            scale_factor: 1.1,
            min_neighbors: 2,
            min_object_size: (30, 30),
            max_object_size: (0, 0),
        }
    }
}

impl DetectParams {
    /// Defaults for the nested stage, which searches inside primary hits
    /// and therefore needs a finer minimum window.
    pub fn nested() -> Self {
        Self {
            min_object_size: (15, 15),
            ..Self::default()
        }
    }
}

/// Annotation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotateConfig {
    pub draw_boxes: bool,
    pub draw_labels: bool,
    pub box_thickness: i32,
}

impl Default for AnnotateConfig {
    fn default() -> Self {
        Self {
            draw_boxes: true,
            draw_labels: true,
            box_thickness: 2,
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Frames are downscaled by `1 / shrink` before detection; must be >= 1.
    pub shrink: f64,
    /// Also detect on a horizontally mirrored copy of each frame.
    pub try_flip: bool,
    /// IoU threshold for merging the direct and mirrored passes.
    pub merge_threshold: f64,
    pub primary: DetectParams,
    pub nested: DetectParams,
    pub annotate: AnnotateConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            shrink: 1.0,
            try_flip: false,
            merge_threshold: 0.3,
            primary: DetectParams::default(),
            nested: DetectParams::nested(),
            annotate: AnnotateConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file. Missing fields fall back to the
    /// defaults, so partial files are fine.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("failed to read config {:?}", path.as_ref()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config {:?}", path.as_ref()))
    }
}
