//! The evaluate command: resolve sources, expand targets, load the model and
//! tags, and report the tags of every image.
//!
//! The first image that fails aborts the run.

use std::{collections::HashSet, env, io::Write, path::PathBuf};

use tracing::{debug, info, warn};

use crate::{
    config::{EvaluateOptions, ModelSource, TagsSource},
    error::Result,
    file,
    pipeline::{TaggingPipeline, TaggingResult},
    report,
    tagger::{Device, LoadOptions, Predictor, TaggerModel},
    tags::LabelTags,
};

/// Hides every CUDA device from this process and anything it loads.
pub fn disable_gpu() {
    env::set_var("CUDA_VISIBLE_DEVICES", "-1");
}

/// Loads the model, preferring an explicit file over the project.
///
/// Returns the project's image size too, when a project was read.
fn load_model(
    source: &ModelSource,
    load_options: &LoadOptions,
    verbose: bool,
) -> Result<(TaggerModel, Option<(u32, u32)>)> {
    match source {
        ModelSource::File(model_path) => {
            if verbose {
                info!("Loading model from {} ...", model_path.display());
            }
            Ok((TaggerModel::load(model_path, load_options)?, None))
        }
        ModelSource::Project(project_path) => {
            if verbose {
                info!("Loading model from project {} ...", project_path.display());
            }
            let (model, config) = TaggerModel::from_project(project_path, load_options)?;
            Ok((model, Some(config.image_size())))
        }
    }
}

fn load_tags(source: &TagsSource, verbose: bool) -> Result<LabelTags> {
    match source {
        TagsSource::File(tags_path) => {
            if verbose {
                info!("Loading tags from {} ...", tags_path.display());
            }
            LabelTags::load(tags_path)
        }
        TagsSource::Project(project_path) => {
            if verbose {
                info!("Loading tags from project {} ...", project_path.display());
            }
            LabelTags::from_project(project_path)
        }
    }
}

/// Runs the pipeline over `images` in order, writing one block per image to `out`.
///
/// A sidecar path written twice in one run is overwritten and warned about.
pub fn evaluate_images<M, W>(
    pipeline: &mut TaggingPipeline<M>,
    images: &[PathBuf],
    options: &EvaluateOptions,
    out: &mut W,
) -> Result<Vec<TaggingResult>>
where
    M: Predictor,
    W: Write,
{
    let mut results = Vec::with_capacity(images.len());
    let mut written = HashSet::new();
    for image_path in images {
        debug!("Evaluating {}", image_path.display());
        let result = pipeline.tag_path(image_path)?;
        report::write_result(out, &result)?;

        if options.save_txt {
            let txt_path = report::write_tag_file(&result, options.save_path.as_deref())?;
            debug!("Wrote {}", txt_path.display());
            if !written.insert(txt_path.clone()) {
                warn!(
                    "Overwrote {} with the tags of {}",
                    txt_path.display(),
                    image_path.display()
                );
            }
        }
        results.push(result);
    }
    out.flush()?;
    Ok(results)
}

/// Evaluates every target image and writes its tags to `out`.
///
/// Fails before touching the filesystem when no model or tags source is given.
pub fn evaluate<W: Write>(options: &EvaluateOptions, out: &mut W) -> Result<Vec<TaggingResult>> {
    if !options.allow_gpu {
        disable_gpu();
    }

    let (model_source, tags_source) = options.validate()?;

    let images = file::collect_target_images(&options.target_paths, &options.extensions);
    if options.verbose {
        info!("Found {} image(s)", images.len());
    }

    let load_options = LoadOptions {
        devices: if options.allow_gpu {
            Device::gpu_preferred()
        } else {
            Device::cpu()
        },
        compile: options.compile_model,
    };
    let (model, project_size) = load_model(&model_source, &load_options, options.verbose)?;
    let tags = load_tags(&tags_source, options.verbose)?;

    let mut pipeline = TaggingPipeline::new(model, tags, options.threshold, project_size)?;
    evaluate_images(&mut pipeline, &images, options, out)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::EvalError;

    // The only test here that leaves GPU use disallowed, so the only writer
    // of `CUDA_VISIBLE_DEVICES` in this binary.
    #[test]
    fn test_gpu_visibility() {
        env::remove_var("CUDA_VISIBLE_DEVICES");

        let options = EvaluateOptions {
            allow_gpu: true,
            ..Default::default()
        };
        let mut out: Vec<u8> = Vec::new();
        assert!(evaluate(&options, &mut out).is_err());
        assert!(env::var("CUDA_VISIBLE_DEVICES").is_err());

        let result = evaluate(&EvaluateOptions::default(), &mut out);
        assert!(matches!(result, Err(EvalError::MissingModelSource)));
        assert_eq!(env::var("CUDA_VISIBLE_DEVICES").unwrap(), "-1");
    }

    #[test]
    fn test_evaluate_requires_model_source() {
        let options = EvaluateOptions {
            target_paths: vec![PathBuf::from("does/not/exist")],
            allow_gpu: true,
            tags_path: Some(PathBuf::from("does/not/exist/tags.txt")),
            ..Default::default()
        };
        let mut out: Vec<u8> = Vec::new();
        let result = evaluate(&options, &mut out);
        assert!(matches!(result, Err(EvalError::MissingModelSource)));
        assert!(out.is_empty());
    }

    #[test]
    fn test_evaluate_requires_tags_source() {
        let options = EvaluateOptions {
            target_paths: vec![PathBuf::from("does/not/exist")],
            model_path: Some(PathBuf::from("does/not/exist/model.onnx")),
            allow_gpu: true,
            ..Default::default()
        };
        let mut out: Vec<u8> = Vec::new();
        let result = evaluate(&options, &mut out);
        assert!(matches!(result, Err(EvalError::MissingTagsSource)));
        assert_eq!(
            result.unwrap_err().to_string(),
            "You must provide project path or tags path."
        );
        assert!(out.is_empty());
    }
}
