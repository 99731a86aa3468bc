//! This module provides a high-level `TaggingPipeline` for processing images and generating tags.
//!
//! The pipeline combines a `Predictor` (normally a `TaggerModel`) with an
//! `ImagePreprocessor` sized to the model input and the tag vocabulary. Results
//! keep the vocabulary order and hold only the tags at or above the threshold.
//! A name listed twice in the vocabulary is reported twice.

use image::DynamicImage;
use indexmap::IndexMap;
use ndarray::Array4;
use std::path::{Path, PathBuf};

use crate::{
    error::{EvalError, Result},
    processor::{ImagePreprocessor, ImageProcessor},
    tagger::{Predictor, TaggerModel},
    tags::LabelTags,
};

/// A type alias for a map of tag predictions, from tag name to confidence score.
pub type Prediction = IndexMap<String, f32>;

/// Tag names with their scores, one entry per vocabulary line.
pub type TagScores = Vec<(String, f32)>;

/// The tags of one image that met the threshold, in vocabulary order.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggingResult {
    pub path: PathBuf,
    pub tags: TagScores,
}

/// An end-to-end pipeline for image tagging.
#[derive(Debug)]
pub struct TaggingPipeline<M = TaggerModel> {
    /// The underlying model for tagging.
    pub model: M,
    /// The preprocessor for preparing images.
    pub preprocessor: ImagePreprocessor,
    /// The set of labels the model can predict.
    pub tags: LabelTags,
    /// The confidence threshold for including a tag in the results.
    pub threshold: f32,
}

/// Walks `names` in order and keeps those whose score in `pairs` is at or
/// above `threshold`.
///
/// Every occurrence of a repeated name is kept, each with the score stored
/// for that name. NaN scores never qualify.
pub fn select_tags(names: &[String], pairs: &Prediction, threshold: f32) -> TagScores {
    names
        .iter()
        .filter_map(|name| {
            pairs
                .get(name)
                .filter(|&&prob| prob >= threshold)
                .map(|&prob| (name.clone(), prob))
        })
        .collect()
}

impl<M: Predictor> TaggingPipeline<M> {
    /// Creates a new `TaggingPipeline`.
    ///
    /// The input size comes from the model; `fallback_size` (`(width, height)`)
    /// is used when the model leaves its spatial axes dynamic.
    pub fn new(
        model: M,
        tags: LabelTags,
        threshold: f32,
        fallback_size: Option<(u32, u32)>,
    ) -> Result<Self> {
        let (width, height) = model
            .input_size()
            .or(fallback_size)
            .ok_or_else(|| EvalError::InputShape(model.input_shape().to_vec()))?;

        Ok(Self {
            model,
            preprocessor: ImagePreprocessor::new(width, height),
            tags,
            threshold,
        })
    }

    /// Scores every tag for a single image, in vocabulary order.
    pub fn predict(&mut self, image: &DynamicImage) -> Result<Prediction> {
        let tensor = self.preprocessor.process(image)?;
        self.score(tensor)
    }

    /// Opens, scores, and filters the image at `path`.
    pub fn tag_path(&mut self, path: &Path) -> Result<TaggingResult> {
        let tensor = self.preprocessor.process_path(path)?;
        let pairs = self.score(tensor)?;
        Ok(TaggingResult {
            path: path.to_path_buf(),
            tags: select_tags(self.tags.names(), &pairs, self.threshold),
        })
    }

    fn score(&mut self, tensor: Array4<f32>) -> Result<Prediction> {
        let probs = self.model.predict(tensor)?;
        // One image in, one row out.
        self.tags
            .create_probability_pairs(probs)?
            .into_iter()
            .next()
            .ok_or(EvalError::TagMismatch {
                tags: self.tags.len(),
                scores: 0,
            })
    }
}
