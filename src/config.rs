use crate::{
    error::{EvalError, Result},
    file::{ProjectConfigFile, DEFAULT_IMAGE_EXTENSIONS},
};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// The `project.json` of a project directory.
///
/// Only the keys needed for evaluation are read; the training settings that
/// usually live next to them are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub image_width: u32,
    pub image_height: u32,
    /// Model type name, used to find `model-{model}.onnx`.
    pub model: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            image_width: 512,
            image_height: 512,
            model: "resnet_custom_v2".to_string(),
        }
    }
}

impl ProjectConfig {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let json = fs::read_to_string(config_path)?;
        let config: ProjectConfig = serde_json::from_str(&json)?;
        Ok(config)
    }

    pub fn from_project<P: AsRef<Path>>(project_path: P) -> Result<Self> {
        Self::load(ProjectConfigFile::new(project_path).path())
    }

    /// Input size as `(width, height)`.
    pub fn image_size(&self) -> (u32, u32) {
        (self.image_width, self.image_height)
    }
}

/// Where the model comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    File(PathBuf),
    Project(PathBuf),
}

/// Where the tag vocabulary comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagsSource {
    File(PathBuf),
    Project(PathBuf),
}

/// Everything one evaluation run needs.
#[derive(Debug, Clone)]
pub struct EvaluateOptions {
    /// Image files or directories to expand.
    pub target_paths: Vec<PathBuf>,
    pub project_path: Option<PathBuf>,
    pub model_path: Option<PathBuf>,
    pub tags_path: Option<PathBuf>,
    /// Minimum score for a tag to be reported.
    pub threshold: f32,
    pub allow_gpu: bool,
    /// Run full graph optimization when building the session.
    pub compile_model: bool,
    pub verbose: bool,
    /// Write the qualifying tags of each image to a `.txt` file.
    pub save_txt: bool,
    /// Directory for the `.txt` files; next to each image when unset.
    pub save_path: Option<PathBuf>,
    /// Extensions picked up when expanding directories.
    pub extensions: Vec<String>,
}

impl Default for EvaluateOptions {
    fn default() -> Self {
        Self {
            target_paths: Vec::new(),
            project_path: None,
            model_path: None,
            tags_path: None,
            threshold: 0.5,
            allow_gpu: false,
            compile_model: false,
            verbose: false,
            save_txt: false,
            save_path: None,
            extensions: DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

impl EvaluateOptions {
    /// Picks the model source. An explicit model file wins over the project.
    pub fn model_source(&self) -> Result<ModelSource> {
        match (&self.model_path, &self.project_path) {
            (Some(model_path), _) => Ok(ModelSource::File(model_path.clone())),
            (None, Some(project_path)) => Ok(ModelSource::Project(project_path.clone())),
            (None, None) => Err(EvalError::MissingModelSource),
        }
    }

    /// Picks the tags source. An explicit tags file wins over the project.
    pub fn tags_source(&self) -> Result<TagsSource> {
        match (&self.tags_path, &self.project_path) {
            (Some(tags_path), _) => Ok(TagsSource::File(tags_path.clone())),
            (None, Some(project_path)) => Ok(TagsSource::Project(project_path.clone())),
            (None, None) => Err(EvalError::MissingTagsSource),
        }
    }

    /// Checks both sources without touching the filesystem.
    pub fn validate(&self) -> Result<(ModelSource, TagsSource)> {
        Ok((self.model_source()?, self.tags_source()?))
    }
}
