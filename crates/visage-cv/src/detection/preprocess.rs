//! Frame preprocessing ahead of the cascade search.

use crate::Result;
use anyhow::Context;
use opencv::{
    core::{self, Mat, Size},
    imgproc,
    prelude::*,
};

/// Shrunken single-channel work image, plus the factor needed to map
/// detections on it back to original-frame coordinates.
pub struct WorkImage {
    pub gray: Mat,
    pub shrink: f64,
}

/// Grayscale, downscale by `1 / shrink`, equalize histogram.
pub fn prepare(frame: &Mat, shrink: f64) -> Result<WorkImage> {
    let mut gray = Mat::default();
    imgproc::cvt_color(frame, &mut gray, imgproc::COLOR_BGR2GRAY, 0)
        .context("grayscale conversion failed")?;

    let gray = if (shrink - 1.0).abs() > f64::EPSILON {
        let size = gray.size()?;
        let target = Size::new(
            (size.width as f64 / shrink).round() as i32,
            (size.height as f64 / shrink).round() as i32,
        );
        let mut small = Mat::default();
        imgproc::resize(&gray, &mut small, target, 0.0, 0.0, imgproc::INTER_LINEAR)
            .context("downscale failed")?;
        small
    } else {
        gray
    };

    let mut equalized = Mat::default();
    imgproc::equalize_hist(&gray, &mut equalized).context("histogram equalization failed")?;

    Ok(WorkImage {
        gray: equalized,
        shrink,
    })
}

/// Horizontally mirrored copy, for the optional second detection pass.
pub fn mirrored(image: &Mat) -> Result<Mat> {
    let mut flipped = Mat::default();
    core::flip(image, &mut flipped, 1).context("horizontal flip failed")?;
    Ok(flipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use opencv::core::{CV_8UC3, Scalar};

    fn test_frame(width: i32, height: i32) -> Mat {
        Mat::new_rows_cols_with_default(height, width, CV_8UC3, Scalar::all(128.0)).unwrap()
    }

    #[test]
    fn test_prepare_keeps_size_without_shrink() -> Result<()> {
        let frame = test_frame(64, 48);
        let work = prepare(&frame, 1.0)?;
        let size = work.gray.size()?;
        assert_eq!((size.width, size.height), (64, 48));
        Ok(())
    }

    #[test]
    fn test_prepare_downscales() -> Result<()> {
        let frame = test_frame(64, 48);
        let work = prepare(&frame, 2.0)?;
        let size = work.gray.size()?;
        assert_eq!((size.width, size.height), (32, 24));
        assert_eq!(work.shrink, 2.0);
        Ok(())
    }

    #[test]
    fn test_mirrored_keeps_dimensions() -> Result<()> {
        let frame = test_frame(20, 10);
        let work = prepare(&frame, 1.0)?;
        let flipped = mirrored(&work.gray)?;
        let size = flipped.size()?;
        assert_eq!((size.width, size.height), (20, 10));
        Ok(())
    }
}
