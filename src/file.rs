use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

use crate::natural;

/// Extensions picked up when a directory is expanded.
pub const DEFAULT_IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

const PROJECT_CONFIG_FILE: &str = "project.json";
const PROJECT_TAGS_FILE: &str = "tags.txt";

/// `project.json` inside a project directory.
pub struct ProjectConfigFile {
    project_path: PathBuf,
}

impl ProjectConfigFile {
    pub fn new<P: AsRef<Path>>(project_path: P) -> Self {
        Self {
            project_path: project_path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.project_path.join(PROJECT_CONFIG_FILE)
    }
}

/// Model for the project, named after the model type in `project.json`.
pub struct ProjectModelFile {
    project_path: PathBuf,
    model_type: String,
}

impl ProjectModelFile {
    pub fn new<P: AsRef<Path>>(project_path: P, model_type: &str) -> Self {
        Self {
            project_path: project_path.as_ref().to_path_buf(),
            model_type: model_type.to_string(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.project_path
            .join(format!("model-{}.onnx", self.model_type))
    }
}

/// Plain text file that has the list of tags, one per line.
pub struct ProjectTagsFile {
    project_path: PathBuf,
}

impl ProjectTagsFile {
    pub fn new<P: AsRef<Path>>(project_path: P) -> Self {
        Self {
            project_path: project_path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.project_path.join(PROJECT_TAGS_FILE)
    }
}

/// Check if the path has one of the given extensions, ignoring case.
pub fn has_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            extensions
                .iter()
                .any(|candidate| candidate.as_ref().eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
}

/// Get image files beneath a directory, recursively.
///
/// Hidden files and directories are skipped. The result is in walk order.
pub fn get_image_files_recursive<S: AsRef<str>>(dir: &Path, extensions: &[S]) -> Vec<PathBuf> {
    if !dir.exists() {
        warn!("Target path {} does not exist", dir.display());
        return Vec::new();
    }

    WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry))
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && has_extension(entry.path(), extensions))
        .map(|entry| entry.into_path())
        .collect()
}

/// Expands the targets into the naturally sorted list of images to evaluate.
///
/// Files are taken as given; anything else is treated as a directory.
pub fn collect_target_images<P, S>(targets: &[P], extensions: &[S]) -> Vec<PathBuf>
where
    P: AsRef<Path>,
    S: AsRef<str>,
{
    let mut images = Vec::new();
    for target in targets {
        let target = target.as_ref();
        if target.is_file() {
            images.push(target.to_path_buf());
        } else {
            images.extend(get_image_files_recursive(target, extensions));
        }
    }

    natural::natural_sort_paths(&mut images);
    images
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_project_files() {
        let project = Path::new("projects/v3");
        assert_eq!(
            ProjectConfigFile::new(project).path(),
            PathBuf::from("projects/v3/project.json")
        );
        assert_eq!(
            ProjectModelFile::new(project, "resnet_custom_v3").path(),
            PathBuf::from("projects/v3/model-resnet_custom_v3.onnx")
        );
        assert_eq!(
            ProjectTagsFile::new(project).path(),
            PathBuf::from("projects/v3/tags.txt")
        );
    }

    #[test]
    fn test_has_extension() {
        let exts = DEFAULT_IMAGE_EXTENSIONS;
        assert!(has_extension(Path::new("a.png"), &exts));
        assert!(has_extension(Path::new("a.JPG"), &exts));
        assert!(has_extension(Path::new("dir/a.Jpeg"), &exts));
        assert!(has_extension(Path::new("a.gif"), &exts));
        assert!(!has_extension(Path::new("a.webp"), &exts));
        assert!(!has_extension(Path::new("a.txt"), &exts));
        assert!(!has_extension(Path::new("png"), &exts));
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let files = get_image_files_recursive(
            Path::new("does/not/exist/anywhere"),
            &DEFAULT_IMAGE_EXTENSIONS,
        );
        assert!(files.is_empty());
    }
}
