//! Frame sources: camera streams and video files behind one interface.

use crate::Result;
use crate::error::CvError;
use anyhow::Context;
use opencv::{
    core::Mat,
    prelude::*,
    videoio::{self, VideoCapture},
};
use std::path::Path;

/// A stream of BGR frames from a camera or a video file.
pub struct FrameSource {
    capture: VideoCapture,
    label: String,
}

impl FrameSource {
    /// Open a live camera by index.
    pub fn open_camera(index: i32) -> Result<Self> {
        let capture = VideoCapture::new(index, videoio::CAP_ANY)
            .with_context(|| format!("opening camera {index}"))?;
        if !capture.is_opened()? {
            return Err(CvError::CameraOpen { index }.into());
        }
        Ok(Self {
            capture,
            label: format!("camera {index}"),
        })
    }

    /// Open a video file.
    pub fn open_video<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let capture = VideoCapture::from_file(&path.to_string_lossy(), videoio::CAP_ANY)
            .with_context(|| format!("opening video {path:?}"))?;
        if !capture.is_opened()? {
            return Err(CvError::VideoOpen {
                path: path.to_path_buf(),
            }
            .into());
        }
        Ok(Self {
            capture,
            label: path.display().to_string(),
        })
    }

    /// Human-readable name of the source, for logs.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn fps(&self) -> Result<f64> {
        Ok(self.capture.get(videoio::CAP_PROP_FPS)?)
    }

    pub fn frame_size(&self) -> Result<(i32, i32)> {
        let width = self.capture.get(videoio::CAP_PROP_FRAME_WIDTH)? as i32;
        let height = self.capture.get(videoio::CAP_PROP_FRAME_HEIGHT)? as i32;
        Ok((width, height))
    }

    /// Next frame, or `None` once the stream is exhausted.
    pub fn read_frame(&mut self) -> Result<Option<Mat>> {
        let mut frame = Mat::default();
        if !self.capture.read(&mut frame)? {
            return Ok(None);
        }
        if frame.size()?.width == 0 {
            return Ok(None);
        }
        Ok(Some(frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_video_file_is_an_error() {
        assert!(FrameSource::open_video("/no/such/clip.avi").is_err());
    }
}
