//! Drawing detection results onto frames.

use crate::Result;
use crate::detection::FrameReport;
use anyhow::Context;
use opencv::{
    core::{Mat, Point, Rect, Scalar},
    imgproc::{self, FONT_HERSHEY_SIMPLEX, LINE_8},
};
use visage_core::{AnnotateConfig, Detection};

// BGR
const OBJECT_COLOR: (f64, f64, f64) = (0.0, 0.0, 255.0);
const NESTED_COLOR: (f64, f64, f64) = (0.0, 255.0, 0.0);

/// Draw primary and nested boxes plus a count label on a BGR frame.
pub fn draw_report(frame: &mut Mat, report: &FrameReport, config: &AnnotateConfig) -> Result<()> {
    if config.draw_boxes {
        for det in report.objects.iter() {
            draw_box(frame, det, OBJECT_COLOR, config.box_thickness)?;
        }
        for set in &report.nested {
            for det in set.iter() {
                draw_box(frame, det, NESTED_COLOR, 1)?;
            }
        }
    }

    if config.draw_labels {
        let label = format!("detections: {}", report.count());
        imgproc::put_text(
            frame,
            &label,
            Point::new(10, 30),
            FONT_HERSHEY_SIMPLEX,
            0.8,
            scalar(OBJECT_COLOR),
            2,
            LINE_8,
            false,
        )
        .context("drawing label failed")?;
    }

    Ok(())
}

fn draw_box(frame: &mut Mat, det: &Detection, color: (f64, f64, f64), thickness: i32) -> Result<()> {
    imgproc::rectangle(
        frame,
        Rect::new(det.x, det.y, det.width, det.height),
        scalar(color),
        thickness,
        LINE_8,
        0,
    )
    .context("drawing rectangle failed")?;
    Ok(())
}

fn scalar((b, g, r): (f64, f64, f64)) -> Scalar {
    Scalar::new(b, g, r, 0.0)
}
