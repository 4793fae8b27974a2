//! Command-line surface and input classification.

use clap::Parser;
use std::path::{Path, PathBuf};
use visage_core::AppConfig;

const DEFAULT_CASCADE: &str = "data/haarcascades/haarcascade_frontalface_alt.xml";
const DEFAULT_NESTED_CASCADE: &str = "data/haarcascades/haarcascade_eye_tree_eyeglasses.xml";

/// Cascade-classifier detection demo. Point it at an image, a video, a
/// directory of images, or a camera index; it reports detection counts and
/// draws the boxes it finds.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Image file, video file, directory, or camera index (defaults to camera 0)
    pub input: Option<String>,

    /// Primary trained classifier, e.g. a frontal-face cascade
    #[arg(long, default_value = DEFAULT_CASCADE)]
    pub cascade: PathBuf,

    /// Optional secondary classifier run inside each primary hit, e.g. eyes
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = DEFAULT_NESTED_CASCADE
    )]
    pub nested_cascade: Option<PathBuf>,

    /// Downscale factor applied before detection (>= 1, try 1.3)
    #[arg(long)]
    pub scale: Option<f64>,

    /// Also detect on a horizontally mirrored copy of each frame
    #[arg(long)]
    pub try_flip: bool,

    /// JSON configuration file; command-line flags override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Save an annotated copy of the input (single-image mode)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Write detection reports as JSON
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Never open display windows
    #[arg(long)]
    pub headless: bool,
}

/// Where frames come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Camera(i32),
    Path(PathBuf),
}

impl Args {
    pub fn input(&self) -> Input {
        classify_input(self.input.as_deref())
    }

    /// Assemble the run configuration: config file first, flags on top.
    pub fn app_config(&self) -> anyhow::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };

        if let Some(scale) = self.scale {
            config.shrink = scale;
        }
        if self.try_flip {
            config.try_flip = true;
        }
        if config.shrink < 1.0 {
            tracing::warn!("scale {} is below 1, clamping to 1", config.shrink);
            config.shrink = 1.0;
        }

        Ok(config)
    }
}

fn classify_input(input: Option<&str>) -> Input {
    let Some(token) = input else {
        return Input::Camera(0);
    };

    // Bare digits with no matching file mean a camera index.
    let path = Path::new(token);
    if !path.exists() && !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()) {
        return Input::Camera(token.parse().unwrap_or(0));
    }

    Input::Path(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_input_means_default_camera() {
        assert_eq!(classify_input(None), Input::Camera(0));
    }

    #[test]
    fn test_digits_mean_camera_index() {
        assert_eq!(classify_input(Some("0")), Input::Camera(0));
        assert_eq!(classify_input(Some("7")), Input::Camera(7));
    }

    #[test]
    fn test_filenames_stay_paths() {
        assert_eq!(
            classify_input(Some("group_photo.jpg")),
            Input::Path(PathBuf::from("group_photo.jpg"))
        );
    }

    #[test]
    fn test_nested_cascade_defaults_when_bare() {
        let args = Args::try_parse_from(["visage", "--nested-cascade"]).unwrap();
        assert_eq!(
            args.nested_cascade,
            Some(PathBuf::from(DEFAULT_NESTED_CASCADE))
        );

        let args =
            Args::try_parse_from(["visage", "--nested-cascade=eyes.xml", "in.jpg"]).unwrap();
        assert_eq!(args.nested_cascade, Some(PathBuf::from("eyes.xml")));
        assert_eq!(args.input.as_deref(), Some("in.jpg"));
    }

    #[test]
    fn test_flags_override_config_defaults() {
        let args =
            Args::try_parse_from(["visage", "--scale", "1.3", "--try-flip"]).unwrap();
        let config = args.app_config().unwrap();
        assert_eq!(config.shrink, 1.3);
        assert!(config.try_flip);
    }

    #[test]
    fn test_undersized_scale_is_clamped() {
        let args = Args::try_parse_from(["visage", "--scale", "0.5"]).unwrap();
        let config = args.app_config().unwrap();
        assert_eq!(config.shrink, 1.0);
    }
}
