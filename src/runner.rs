//! Input dispatch and the three run modes: capture stream, single image,
//! directory walk.

use crate::cli::Input;
use anyhow::Context;
use opencv::{core::Mat, highgui};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use visage_core::RunStats;
use visage_cv::{CascadeDetector, FrameReport, FrameSource, ImageUtils, annotate};

const WINDOW: &str = "visage";
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp"];

pub struct RunOptions {
    pub headless: bool,
    pub output: Option<PathBuf>,
    pub json: Option<PathBuf>,
}

/// One directory-walk result, for JSON export.
#[derive(Debug, Serialize)]
struct FileReport {
    path: PathBuf,
    #[serde(flatten)]
    report: FrameReport,
}

pub fn run(input: &Input, detector: &mut CascadeDetector, opts: &RunOptions) -> anyhow::Result<()> {
    match input {
        Input::Camera(index) => stream(FrameSource::open_camera(*index)?, detector, opts),
        Input::Path(path) if path.is_dir() => directory(path, detector, opts),
        Input::Path(path) => match ImageUtils::try_load_color(path)? {
            Some(image) => single_image(path, image, detector, opts),
            None => {
                tracing::info!(
                    "{} does not decode as an image, trying video capture",
                    path.display()
                );
                stream(FrameSource::open_video(path)?, detector, opts)
            }
        },
    }
}

/// Camera or video loop: read, detect, annotate, display. Any keypress
/// quits; `--headless` drops the display and just logs.
fn stream(
    mut source: FrameSource,
    detector: &mut CascadeDetector,
    opts: &RunOptions,
) -> anyhow::Result<()> {
    let started = Instant::now();
    let mut stats = RunStats::new();
    let mut reports: Option<Vec<FrameReport>> = opts.json.as_ref().map(|_| Vec::new());

    if !opts.headless {
        highgui::named_window(WINDOW, highgui::WINDOW_AUTOSIZE)?;
    }
    let (width, height) = source.frame_size()?;
    tracing::info!(
        "capturing from {} ({}x{} @ {:.0} fps)",
        source.label(),
        width,
        height,
        source.fps()?
    );

    while let Some(mut frame) = source.read_frame()? {
        let report = detector.detect(&frame)?;
        stats.record(report.count());

        if !opts.headless {
            annotate::draw_report(&mut frame, &report, &detector.config().annotate)?;
            highgui::imshow(WINDOW, &frame)?;
            let key = highgui::wait_key(10)?;
            if key > 0 && key != 255 {
                break;
            }
        }

        if let Some(list) = reports.as_mut() {
            list.push(report);
        }
    }

    stats.elapsed_ms = started.elapsed().as_millis() as u64;
    if let (Some(path), Some(list)) = (&opts.json, reports) {
        write_json(path, &list)?;
    }
    tracing::info!(
        frames = stats.frames,
        detections = stats.detections,
        elapsed_ms = stats.elapsed_ms,
        per_frame = stats.per_frame(),
        "capture finished"
    );
    Ok(())
}

fn single_image(
    path: &Path,
    mut image: Mat,
    detector: &mut CascadeDetector,
    opts: &RunOptions,
) -> anyhow::Result<()> {
    let report = detector.detect(&image)?;
    println!("{}, detections: {}", path.display(), report.count());

    let stats = report.objects.stats();
    if let Some(largest) = stats.largest {
        tracing::debug!(
            total = stats.total,
            avg_area = stats.avg_area,
            ?largest,
            "detection summary"
        );
    }

    annotate::draw_report(&mut image, &report, &detector.config().annotate)?;
    if let Some(out) = &opts.output {
        ImageUtils::save(&image, out)?;
        tracing::info!("annotated copy saved to {}", out.display());
    }
    if let Some(json) = &opts.json {
        write_json(json, &[report])?;
    }

    if !opts.headless {
        highgui::named_window(WINDOW, highgui::WINDOW_AUTOSIZE)?;
        highgui::imshow(WINDOW, &image)?;
        highgui::wait_key(0)?;
    }
    Ok(())
}

/// Recursive walk: images in a directory are processed before its
/// subdirectories, matching the order a reader of the stdout report
/// expects.
fn directory(
    root: &Path,
    detector: &mut CascadeDetector,
    opts: &RunOptions,
) -> anyhow::Result<()> {
    let mut reports = Vec::new();
    walk(root, detector, &mut reports)?;

    if let Some(json) = &opts.json {
        write_json(json, &reports)?;
    }

    let total: usize = reports.iter().map(|r| r.report.count()).sum();
    tracing::info!(
        images = reports.len(),
        detections = total,
        "finished scanning {}",
        root.display()
    );
    Ok(())
}

fn walk(
    dir: &Path,
    detector: &mut CascadeDetector,
    out: &mut Vec<FileReport>,
) -> anyhow::Result<()> {
    let mut files = Vec::new();
    let mut subdirs = Vec::new();

    let entries = fs::read_dir(dir)
        .with_context(|| format!("could not open directory {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            subdirs.push(path);
        } else if has_image_extension(&path) {
            files.push(path);
        }
    }
    files.sort();
    subdirs.sort();

    for path in files {
        match ImageUtils::load_color(&path) {
            Ok(image) => {
                let report = detector.detect(&image)?;
                println!("{}, detections: {}", path.display(), report.count());
                out.push(FileReport { path, report });
            }
            Err(error) => tracing::warn!("couldn't read image {}: {error:#}", path.display()),
        }
    }

    for sub in subdirs {
        walk(&sub, detector, out)?;
    }
    Ok(())
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize reports")?;
    fs::write(path, json).with_context(|| format!("failed to write JSON to {}", path.display()))?;
    tracing::info!("reports written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_extension_filter() {
        assert!(has_image_extension(Path::new("a/b/photo.jpg")));
        assert!(has_image_extension(Path::new("photo.JPG")));
        assert!(has_image_extension(Path::new("scan.png")));
        assert!(!has_image_extension(Path::new("clip.avi")));
        assert!(!has_image_extension(Path::new("README")));
    }
}
