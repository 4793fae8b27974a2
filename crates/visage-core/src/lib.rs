//! Core types for the visage detector.
//!
//! Boxes, configuration, and run statistics, kept free of OpenCV types so
//! the coordinate logic stays testable without a native toolchain.

pub mod bbox;
pub mod config;
pub mod stats;

pub use bbox::{Detection, DetectionSet, SetStats};
pub use config::{AnnotateConfig, AppConfig, DetectParams};
pub use stats::RunStats;
