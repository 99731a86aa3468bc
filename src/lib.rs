//! # ddtag
//!
//! ddtag tags images with a pretrained ONNX tagging model. It expands files and
//! directories into a naturally ordered list of images, runs each one through
//! the model, and reports the tags whose confidence meets a threshold.
//!
//! ## Features
//!
//! - **Evaluate**: `evaluate::evaluate` runs the whole command end to end.
//! - **Projects**: loads the model and vocabulary from a project directory
//!   (`project.json`, `model-<type>.onnx`, `tags.txt`) or from explicit files.
//! - **ONNX Runtime**: Powered by `ort`, with CPU, CUDA, TensorRT, and CoreML providers.
//! - **Extensible**: the pipeline runs against the `Predictor` and `ImageProcessor` traits.
//!
//! ## Modules
//!
//! - `evaluate`: The main entry point for the tagging command.
//! - `pipeline`: Ties model, preprocessor, and tags together for one image.
//! - `tagger`: Handles the ONNX model and session management.
//! - `processor`: Provides tools for image preprocessing.
//! - `tags`: Loads the tag vocabulary.
//! - `file`: Project file conventions and image discovery.
//! - `natural`: Natural ordering of paths.
//! - `report`: Console and sidecar-file output.
//! - `config`: Project configuration and evaluation options.
//! - `error`: Contains the error types for the library.
//! - `prelude`: A collection of the most commonly used types.

pub mod config;
pub mod error;
pub mod evaluate;
pub mod file;
pub mod natural;
pub mod pipeline;
pub mod prelude;
pub mod processor;
pub mod report;
pub mod tagger;
pub mod tags;
