//! Still-image loading and saving through `imgcodecs`.

use crate::Result;
use crate::error::CvError;
use anyhow::{Context, bail};
use opencv::{
    core::{Mat, Vector},
    imgcodecs::{self, IMREAD_COLOR},
    prelude::*,
};
use std::path::Path;

pub struct ImageUtils;

impl ImageUtils {
    /// Load a color (BGR) image; errors if the file is missing or does not
    /// decode.
    pub fn load_color<P: AsRef<Path>>(path: P) -> Result<Mat> {
        let path = path.as_ref();
        match Self::try_load_color(path)? {
            Some(mat) => Ok(mat),
            None => Err(CvError::ImageRead {
                path: path.to_path_buf(),
            }
            .into()),
        }
    }

    /// Probe variant used by the input dispatcher: `None` when the file
    /// does not decode as an image (it may still be a video).
    pub fn try_load_color<P: AsRef<Path>>(path: P) -> Result<Option<Mat>> {
        let path = path.as_ref();
        let mat = imgcodecs::imread(&path.to_string_lossy(), IMREAD_COLOR)
            .with_context(|| format!("reading image {path:?}"))?;
        if mat.size()?.width == 0 {
            return Ok(None);
        }
        Ok(Some(mat))
    }

    /// Save a Mat as an image, format chosen from the extension.
    pub fn save<P: AsRef<Path>>(mat: &Mat, path: P) -> Result<()> {
        let path = path.as_ref();
        let written = imgcodecs::imwrite(&path.to_string_lossy(), mat, &Vector::new())
            .with_context(|| format!("saving image {path:?}"))?;
        if !written {
            bail!("image writer refused {path:?}");
        }
        Ok(())
    }
}
