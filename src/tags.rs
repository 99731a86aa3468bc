use crate::{
    error::{EvalError, Result},
    file::ProjectTagsFile,
};
use indexmap::IndexMap;
use serde::Deserialize;
use std::{fs, path::Path};

/// A row of a `selected_tags.csv` style file. Other columns are ignored.
#[derive(Debug, Deserialize)]
struct TagRecord {
    name: String,
}

/// The tag vocabulary, positionally aligned with the model output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTags {
    names: Vec<String>,
}

impl LabelTags {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Load from a local tags file.
    ///
    /// `.csv` files are read by their `name` column; anything else is read as
    /// one tag per line, with blank lines skipped.
    pub fn load<P: AsRef<Path>>(tags_path: P) -> Result<Self> {
        let tags_path = tags_path.as_ref();
        let is_csv = tags_path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

        if is_csv {
            Self::load_csv(tags_path)
        } else {
            Self::load_text(tags_path)
        }
    }

    fn load_text(tags_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(tags_path)?;
        Ok(Self::parse_lines(&content))
    }

    fn load_csv(tags_path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(tags_path)?;
        let names = reader
            .deserialize::<TagRecord>()
            .map(|record| record.map(|r| r.name))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(names))
    }

    /// One tag per line, trimmed. Blank lines are dropped.
    pub fn parse_lines(content: &str) -> Self {
        let names = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self::new(names)
    }

    /// Load `tags.txt` from a project directory.
    pub fn from_project<P: AsRef<Path>>(project_path: P) -> Result<Self> {
        Self::load(ProjectTagsFile::new(project_path).path())
    }

    /// Create pairs of tag and probability with given tensor, one map per row.
    pub fn create_probability_pairs(
        &self,
        tensor: Vec<Vec<f32>>,
    ) -> Result<Vec<IndexMap<String, f32>>> {
        tensor
            .into_iter()
            .map(|probs| {
                if probs.len() != self.names.len() {
                    return Err(EvalError::TagMismatch {
                        tags: self.names.len(),
                        scores: probs.len(),
                    });
                }
                Ok(self.names.iter().cloned().zip(probs).collect())
            })
            .collect()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
