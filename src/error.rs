//! # Error Handling
//!
//! This module defines the error type for the `ddtag` library.
//!
//! `EvalError` covers the two argument checks performed before any I/O and
//! wraps the failures coming out of the filesystem, the image decoder, the
//! tag file parsers, and ONNX Runtime. The checks are the only errors the
//! library raises on its own; everything else is passed through unchanged.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for evaluation.
#[derive(Error, Debug)]
pub enum EvalError {
    /// Neither a project directory nor a model file was given.
    #[error("You must provide project path or model path.")]
    MissingModelSource,

    /// Neither a project directory nor a tags file was given.
    #[error("You must provide project path or tags path.")]
    MissingTagsSource,

    /// An image could not be opened or decoded.
    #[error("Failed to load image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// ONNX Runtime rejected the model or the run.
    #[error("ONNX Runtime error: {0}")]
    Ort(String),

    /// The model input is not `[batch, height, width, channels]` with known spatial axes.
    #[error("Unsupported model input shape {0:?}, expected [batch, height, width, channels]")]
    InputShape(Vec<i64>),

    /// The model output row does not line up with the vocabulary.
    #[error("Tags ({tags}) and probabilities ({scores}) length mismatch")]
    TagMismatch { tags: usize, scores: usize },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EvalError {
    /// Wraps an ONNX Runtime error, whose concrete type varies between builder and session calls.
    pub(crate) fn ort<E: std::fmt::Display>(err: E) -> Self {
        Self::Ort(err.to_string())
    }
}

pub type Result<T, E = EvalError> = std::result::Result<T, E>;
