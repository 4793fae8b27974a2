//! Typed failures surfaced through the crate-wide `anyhow::Result`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CvError {
    #[error("could not load classifier cascade from {path:?}")]
    CascadeLoad { path: PathBuf },

    #[error("capture from camera {index} didn't work")]
    CameraOpen { index: i32 },

    #[error("could not open video {path:?}")]
    VideoOpen { path: PathBuf },

    #[error("couldn't read image {path:?}")]
    ImageRead { path: PathBuf },
}
