//! Two-stage cascade detector: a primary classifier over the whole frame,
//! plus an optional nested classifier inside each primary hit.

use super::preprocess;
use crate::Result;
use crate::error::CvError;
use anyhow::Context;
use opencv::{
    core::{Mat, Rect, Size, Vector},
    objdetect::{self, CascadeClassifier},
    prelude::*,
};
use serde::Serialize;
use std::path::Path;
use std::time::Instant;
use visage_core::{AppConfig, DetectParams, Detection, DetectionSet};

/// Per-frame detection result, in original-frame coordinates.
#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    pub objects: DetectionSet,
    /// One set of sub-feature boxes per primary object, in frame coordinates.
    /// Empty when no nested cascade is loaded.
    pub nested: Vec<DetectionSet>,
    pub processing_ms: u64,
}

impl FrameReport {
    pub fn count(&self) -> usize {
        self.objects.len()
    }
}

/// Main detector owning the loaded classifiers and the run configuration.
pub struct CascadeDetector {
    primary: CascadeClassifier,
    nested: Option<CascadeClassifier>,
    config: AppConfig,
}

impl CascadeDetector {
    /// Load the primary cascade, and the nested one if given. A primary
    /// load failure is fatal; a nested failure degrades to a warning with
    /// the nested stage disabled.
    pub fn new<P: AsRef<Path>>(
        cascade_path: P,
        nested_path: Option<P>,
        config: AppConfig,
    ) -> Result<Self> {
        let primary = load_cascade(cascade_path.as_ref())?;

        let nested = match nested_path {
            Some(path) => match load_cascade(path.as_ref()) {
                Ok(cascade) => Some(cascade),
                Err(error) => {
                    tracing::warn!("could not load cascade for nested objects: {error}");
                    None
                }
            },
            None => None,
        };

        Ok(Self {
            primary,
            nested,
            config,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn has_nested(&self) -> bool {
        self.nested.is_some()
    }

    /// Run the detector over one BGR frame.
    pub fn detect(&mut self, frame: &Mat) -> Result<FrameReport> {
        let started = Instant::now();
        let work = preprocess::prepare(frame, self.config.shrink)?;

        let mut objects = run_cascade(&mut self.primary, &work.gray, &self.config.primary)?;

        if self.config.try_flip {
            let flipped_image = preprocess::mirrored(&work.gray)?;
            let width = flipped_image.size()?.width;
            let flipped = run_cascade(&mut self.primary, &flipped_image, &self.config.primary)?;
            objects.extend(flipped.into_iter().map(|det| det.mirror_x(width)));
            objects = objects.merge_overlapping(self.config.merge_threshold);
        }

        let mut nested_sets = Vec::new();
        if let Some(nested) = self.nested.as_mut() {
            for object in objects.iter() {
                let roi = Mat::roi(&work.gray, to_rect(object))?.try_clone()?;
                let inner = run_cascade(nested, &roi, &self.config.nested)?;
                nested_sets.push(inner.offset(object.x, object.y));
            }
        }

        // Everything above operated on the shrunken work image.
        let objects = objects.scaled(work.shrink);
        let nested_sets = nested_sets
            .into_iter()
            .map(|set| set.scaled(work.shrink))
            .collect();

        let report = FrameReport {
            objects,
            nested: nested_sets,
            processing_ms: started.elapsed().as_millis() as u64,
        };
        tracing::debug!(
            objects = report.objects.len(),
            ms = report.processing_ms,
            "frame processed"
        );
        Ok(report)
    }
}

fn load_cascade(path: &Path) -> Result<CascadeClassifier> {
    let mut cascade = CascadeClassifier::default().context("cascade allocation failed")?;
    let loaded = cascade
        .load(&path.to_string_lossy())
        .with_context(|| format!("loading cascade {path:?}"))?;
    if !loaded {
        return Err(CvError::CascadeLoad {
            path: path.to_path_buf(),
        }
        .into());
    }
    Ok(cascade)
}

fn run_cascade(
    cascade: &mut CascadeClassifier,
    gray: &Mat,
    params: &DetectParams,
) -> Result<DetectionSet> {
    let mut hits: Vector<Rect> = Vector::new();
    cascade
        .detect_multi_scale(
            gray,
            &mut hits,
            params.scale_factor,
            params.min_neighbors,
            objdetect::CASCADE_SCALE_IMAGE,
            to_size(params.min_object_size),
            to_size(params.max_object_size),
        )
        .context("detect_multi_scale failed")?;

    Ok(hits
        .iter()
        .map(|r| Detection::new(r.x, r.y, r.width, r.height))
        .collect())
}

fn to_rect(det: &Detection) -> Rect {
    Rect::new(det.x, det.y, det.width, det.height)
}

fn to_size((width, height): (i32, i32)) -> Size {
    Size::new(width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_primary_cascade_is_fatal() {
        let result = CascadeDetector::new(
            Path::new("/no/such/cascade.xml"),
            None,
            AppConfig::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_nested_cascade_degrades() {
        // A bad nested path must not fail construction, but without a valid
        // primary cascade we can't build a detector at all, so only the
        // error text is checked here.
        let error = match load_cascade(Path::new("/no/such/cascade.xml")) {
            Err(error) => error,
            Ok(_) => panic!("bogus cascade path loaded"),
        };
        assert!(error.to_string().contains("could not load classifier cascade"));
    }
}
