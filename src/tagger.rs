//! This module provides the `TaggerModel` struct for running ONNX-based image tagging models.
//!
//! It includes functionality for:
//! - Loading models from a local file or from a project directory.
//! - Selecting execution providers (e.g., CPU, CUDA).
//! - Reading the expected input size from the model's input shape.
//! - Running predictions on preprocessed image tensors.
//!
//! The `Predictor` trait is the seam the pipeline is written against, so
//! anything that maps an NHWC tensor to score rows can stand in for the model.

use std::{path::Path, thread};

use ndarray::{Array, Axis, Ix4};
use ort::{
    execution_providers::{CPUExecutionProvider, ExecutionProviderDispatch},
    session::{builder::GraphOptimizationLevel, Session},
    value::{Tensor, ValueType},
};
use tracing::debug;

#[cfg(feature = "cuda")]
use ort::execution_providers::CUDAExecutionProvider;

#[cfg(feature = "tensorrt")]
use ort::execution_providers::TensorRTExecutionProvider;

#[cfg(feature = "coreml")]
use ort::execution_providers::CoreMLExecutionProvider;

use crate::{
    config::ProjectConfig,
    error::{EvalError, Result},
    file::ProjectModelFile,
};

/// Represents the execution device for the ONNX model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Device {
    /// Use the CPU for inference.
    Cpu,
    /// Use the CUDA execution provider.
    #[cfg(feature = "cuda")]
    Cuda(i32),
    /// Use the TensorRT execution provider.
    #[cfg(feature = "tensorrt")]
    TensorRT(i32),
    /// Use the CoreML execution provider (for macOS).
    #[cfg(feature = "coreml")]
    CoreML,
}

impl Device {
    /// Creates a list of `Device` instances for CPU execution.
    pub fn cpu() -> Vec<Self> {
        vec![Self::Cpu]
    }

    /// The devices to try when GPU use is allowed, best first, CPU last.
    #[allow(clippy::vec_init_then_push)]
    pub fn gpu_preferred() -> Vec<Self> {
        let mut devices = Vec::new();
        #[cfg(feature = "tensorrt")]
        devices.push(Self::TensorRT(0));
        #[cfg(feature = "cuda")]
        devices.push(Self::Cuda(0));
        #[cfg(feature = "coreml")]
        devices.push(Self::CoreML);
        devices.push(Self::Cpu);
        devices
    }

    fn provider(&self) -> ExecutionProviderDispatch {
        match self {
            Device::Cpu => CPUExecutionProvider::default().build(),
            #[cfg(feature = "cuda")]
            Device::Cuda(device_id) => CUDAExecutionProvider::default()
                .with_device_id(*device_id)
                .build(),
            #[cfg(feature = "tensorrt")]
            Device::TensorRT(device_id) => TensorRTExecutionProvider::default()
                .with_device_id(*device_id)
                .build(),
            #[cfg(feature = "coreml")]
            Device::CoreML => CoreMLExecutionProvider::default().build(),
        }
    }
}

/// Session settings for loading a model.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub devices: Vec<Device>,
    /// Full graph optimization instead of the basic level.
    pub compile: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            devices: Device::cpu(),
            compile: false,
        }
    }
}

/// Anything that turns an NHWC image batch into per-tag score rows.
pub trait Predictor {
    /// Expected input size as `(width, height)`, when the model pins it.
    fn input_size(&self) -> Option<(u32, u32)>;

    /// The raw input shape, `-1` marking dynamic axes. Empty when unknown.
    fn input_shape(&self) -> &[i64] {
        &[]
    }

    /// Runs prediction on `[batch, height, width, channels]` and returns one row per image.
    fn predict(&mut self, input_tensor: Array<f32, Ix4>) -> Result<Vec<Vec<f32>>>;
}

/// A wrapper around an ONNX Runtime session for image tagging.
#[derive(Debug)]
pub struct TaggerModel {
    session: Session,
    input_name: String,
    output_name: String,
    input_shape: Vec<i64>,
}

impl TaggerModel {
    /// Loads a model from a local file path.
    ///
    /// The path should point to a valid `.onnx` model file whose first input is NHWC.
    pub fn load<P: AsRef<Path>>(model_path: P, options: &LoadOptions) -> Result<Self> {
        let threads = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let level = if options.compile {
            GraphOptimizationLevel::Level3
        } else {
            GraphOptimizationLevel::Level1
        };
        let providers: Vec<_> = options.devices.iter().map(Device::provider).collect();

        let builder = Session::builder().map_err(EvalError::ort)?;
        let builder = builder
            .with_execution_providers(providers)
            .map_err(EvalError::ort)?;
        let builder = builder
            .with_optimization_level(level)
            .map_err(EvalError::ort)?;
        let builder = builder
            .with_intra_threads(threads)
            .map_err(EvalError::ort)?;
        let session = builder
            .commit_from_file(model_path.as_ref())
            .map_err(EvalError::ort)?;

        let input = session
            .inputs
            .first()
            .ok_or_else(|| EvalError::Ort("Model has no inputs".to_string()))?;
        let input_name = input.name.clone();
        let input_shape = match &input.input_type {
            ValueType::Tensor { shape, .. } => shape.iter().copied().collect::<Vec<i64>>(),
            _ => Vec::new(),
        };
        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| EvalError::Ort("Model has no outputs".to_string()))?;

        debug!(
            "Loaded {} (input {} {:?}, output {})",
            model_path.as_ref().display(),
            input_name,
            input_shape,
            output_name
        );

        Ok(Self {
            session,
            input_name,
            output_name,
            input_shape,
        })
    }

    /// Loads `model-{model}.onnx` from a project directory.
    ///
    /// Also returns the project's configuration, whose image size backs up
    /// models with dynamic spatial axes.
    pub fn from_project<P: AsRef<Path>>(
        project_path: P,
        options: &LoadOptions,
    ) -> Result<(Self, ProjectConfig)> {
        let config = ProjectConfig::from_project(&project_path)?;
        let model_path = ProjectModelFile::new(&project_path, &config.model).path();
        let model = Self::load(model_path, options)?;
        Ok((model, config))
    }
}

/// Reads `(width, height)` from a `[batch, height, width, channels]` shape.
pub fn input_size_from_shape(shape: &[i64]) -> Option<(u32, u32)> {
    match shape {
        [_, height, width, _] if *height > 0 && *width > 0 => {
            Some((u32::try_from(*width).ok()?, u32::try_from(*height).ok()?))
        }
        _ => None,
    }
}

impl Predictor for TaggerModel {
    fn input_size(&self) -> Option<(u32, u32)> {
        input_size_from_shape(&self.input_shape)
    }

    fn input_shape(&self) -> &[i64] {
        &self.input_shape
    }

    fn predict(&mut self, input_tensor: Array<f32, Ix4>) -> Result<Vec<Vec<f32>>> {
        let input_tensor = Tensor::from_array(input_tensor).map_err(EvalError::ort)?;

        let outputs = self
            .session
            .run(ort::inputs![self.input_name.as_str() => input_tensor])
            .map_err(EvalError::ort)?;

        let preds = outputs[self.output_name.as_str()]
            .try_extract_array::<f32>()
            .map_err(EvalError::ort)?;

        let preds_vec = preds
            .axis_iter(Axis(0))
            .map(|row| row.iter().copied().collect::<Vec<_>>())
            .collect();

        Ok(preds_vec)
    }
}
