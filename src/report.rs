//! Console and sidecar-file output for tagging results.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use crate::{error::Result, pipeline::TaggingResult};

/// Formats one `(score) tag` line, the score zero padded to three decimals.
pub fn format_tag_line(tag: &str, score: f32) -> String {
    format!("({:05.3}) {}", score, tag)
}

/// Writes the block for one image: header, one line per tag, blank line.
pub fn write_result<W: Write>(out: &mut W, result: &TaggingResult) -> io::Result<()> {
    writeln!(out, "Tags of {}:", result.path.display())?;
    for (tag, score) in &result.tags {
        writeln!(out, "{}", format_tag_line(tag, *score))?;
    }
    writeln!(out)?;
    Ok(())
}

/// The tags joined by `", "`, as written to sidecar files.
pub fn tag_string(result: &TaggingResult) -> String {
    result
        .tags
        .iter()
        .map(|(tag, _)| tag.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Where the sidecar file for `image_path` goes.
///
/// Next to the image with a `.txt` extension, or `<save_path>/<stem>.txt`.
/// Under `save_path` only the stem counts, so `a/1.png` and `b/1.png` share
/// `<save_path>/1.txt` and the later image wins.
pub fn sidecar_path(image_path: &Path, save_path: Option<&Path>) -> PathBuf {
    match save_path {
        Some(dir) => {
            let stem = image_path.file_stem().unwrap_or(image_path.as_os_str());
            let mut name = stem.to_os_string();
            name.push(".txt");
            dir.join(name)
        }
        None => image_path.with_extension("txt"),
    }
}

/// Writes the sidecar file for `result` and returns its path.
pub fn write_tag_file(result: &TaggingResult, save_path: Option<&Path>) -> Result<PathBuf> {
    let path = sidecar_path(&result.path, save_path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, tag_string(result))?;
    Ok(path)
}
