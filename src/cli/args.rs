use clap::Parser;
use ddtag::config::EvaluateOptions;
use std::path::PathBuf;

/// Tag images with a pretrained model and print the tags above a threshold.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Image files or directories to evaluate. Directories are searched recursively.
    #[arg(required = true)]
    pub target_paths: Vec<PathBuf>,

    /// Project directory holding project.json, the model, and tags.txt
    #[arg(long)]
    pub project_path: Option<PathBuf>,

    /// Model file, overrides the project's model
    #[arg(long)]
    pub model_path: Option<PathBuf>,

    /// Tags file (one tag per line, or a CSV with a `name` column), overrides the project's tags
    #[arg(long)]
    pub tags_path: Option<PathBuf>,

    /// The confidence threshold for reporting a tag
    #[arg(long, default_value_t = 0.5)]
    pub threshold: f32,

    /// Allow running on the GPU
    #[arg(long)]
    pub allow_gpu: bool,

    /// Fully optimize the model graph before running
    #[arg(long, overrides_with = "no_compile")]
    pub compile: bool,

    /// Skip full graph optimization (default)
    #[arg(long)]
    pub no_compile: bool,

    /// Write the tags of each image to a .txt file
    #[arg(long)]
    pub save_txt: bool,

    /// Directory for the .txt files, next to each image by default
    #[arg(long, requires = "save_txt")]
    pub save_path: Option<PathBuf>,

    /// Image extensions picked up from directories
    #[arg(long, value_delimiter = ',', default_values = ["png", "jpg", "jpeg", "gif"])]
    pub extensions: Vec<String>,

    /// Log what is being loaded
    #[arg(short, long)]
    pub verbose: bool,
}

impl From<Args> for EvaluateOptions {
    fn from(args: Args) -> Self {
        Self {
            target_paths: args.target_paths,
            project_path: args.project_path,
            model_path: args.model_path,
            tags_path: args.tags_path,
            threshold: args.threshold,
            allow_gpu: args.allow_gpu,
            compile_model: args.compile && !args.no_compile,
            verbose: args.verbose,
            save_txt: args.save_txt,
            save_path: args.save_path,
            extensions: args.extensions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["ddtag", "images"]).unwrap();
        let options = EvaluateOptions::from(args);
        assert_eq!(options.target_paths, vec![PathBuf::from("images")]);
        assert_eq!(options.threshold, 0.5);
        assert!(!options.allow_gpu);
        assert!(!options.compile_model);
        assert!(!options.save_txt);
        assert_eq!(options.extensions, vec!["png", "jpg", "jpeg", "gif"]);
    }

    #[test]
    fn test_full_command_line() {
        let args = Args::try_parse_from([
            "ddtag",
            "a.png",
            "dir",
            "--project-path",
            "project",
            "--threshold",
            "0.35",
            "--allow-gpu",
            "--compile",
            "--save-txt",
            "--save-path",
            "out",
            "--extensions",
            "png,webp",
            "-v",
        ])
        .unwrap();
        let options = EvaluateOptions::from(args);
        assert_eq!(
            options.target_paths,
            vec![PathBuf::from("a.png"), PathBuf::from("dir")]
        );
        assert_eq!(options.project_path, Some(PathBuf::from("project")));
        assert_eq!(options.threshold, 0.35);
        assert!(options.allow_gpu);
        assert!(options.compile_model);
        assert!(options.verbose);
        assert_eq!(options.save_path, Some(PathBuf::from("out")));
        assert_eq!(options.extensions, vec!["png", "webp"]);
    }

    #[test]
    fn test_no_compile_wins_when_last() {
        let args = Args::try_parse_from(["ddtag", "x", "--compile", "--no-compile"]).unwrap();
        assert!(!EvaluateOptions::from(args).compile_model);
    }

    #[test]
    fn test_targets_required() {
        assert!(Args::try_parse_from(["ddtag"]).is_err());
    }
}
