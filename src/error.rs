use std::path::PathBuf;
use thiserror::Error;

use crate::image::Shape;

#[derive(Error, Debug)]
pub enum HarmonicsError {
    #[error("Failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode image {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: Shape, actual: Shape },

    #[error("Metric {metric} is missing required input `{input}`")]
    MissingInput { metric: String, input: String },

    #[error("Metric {metric} expected input `{input}` to be {expected}, got {actual}")]
    TypeMismatch {
        metric: String,
        input: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("The analyzer has already computed its results")]
    AlreadyComputed,

    #[error("The reference image is not set")]
    MissingReference,

    #[error("A reference image is already set ({0})")]
    ReferenceAlreadySet(String),

    #[error("There is no candidate image to compare")]
    NoCandidates,

    #[error("There is no metric to calculate")]
    NoMetrics,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid preprocessing step: {0}")]
    InvalidPreprocess(String),

    #[error("Region {height}x{width} at ({row}, {col}) exceeds {extent}")]
    RegionOutOfBounds {
        row: usize,
        col: usize,
        height: usize,
        width: usize,
        extent: Shape,
    },

    #[error("Image buffer is empty")]
    EmptyImage,
}

pub type Result<T> = std::result::Result<T, HarmonicsError>;
