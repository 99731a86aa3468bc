pub use crate::config::{EvaluateOptions, ModelSource, ProjectConfig, TagsSource};
pub use crate::error::{EvalError, Result};
pub use crate::evaluate::{evaluate, evaluate_images};
pub use crate::file::{collect_target_images, DEFAULT_IMAGE_EXTENSIONS};
pub use crate::pipeline::{Prediction, TagScores, TaggingPipeline, TaggingResult};
pub use crate::processor::{ImagePreprocessor, ImageProcessor};
pub use crate::tagger::{Device, LoadOptions, Predictor, TaggerModel};
pub use crate::tags::LabelTags;
