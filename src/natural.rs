//! Natural ("human") ordering for file names.
//!
//! Strings are split into runs of ASCII digits and runs of everything else.
//! Digit runs compare by numeric value, text runs compare case-insensitively,
//! so `img2.png` sorts before `img10.png`.

use itertools::Itertools;
use std::{cmp::Ordering, path::PathBuf};

#[derive(Debug, PartialEq, Eq)]
enum Chunk<'a> {
    Text(String),
    Number(&'a str),
}

fn chunks(s: &str) -> Vec<Chunk<'_>> {
    let chunks: Vec<_> = s
        .char_indices()
        .chunk_by(|(_, c)| c.is_ascii_digit())
        .into_iter()
        .map(|(is_digit, mut group)| {
            let start = group.next().map(|(i, _)| i).unwrap_or(0);
            let end = group
                .last()
                .map(|(i, c)| i + c.len_utf8())
                .unwrap_or_else(|| start + s[start..].chars().next().map_or(0, |c| c.len_utf8()));
            let run = &s[start..end];
            if is_digit {
                Chunk::Number(run)
            } else {
                Chunk::Text(run.to_lowercase())
            }
        })
        .collect();
    chunks
}

/// Compares digit runs by value without parsing, so any length works.
fn compare_numbers(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn compare_chunks(a: &Chunk<'_>, b: &Chunk<'_>) -> Ordering {
    match (a, b) {
        (Chunk::Number(a), Chunk::Number(b)) => compare_numbers(a, b),
        (Chunk::Text(a), Chunk::Text(b)) => a.cmp(b),
        // A number run sorts before a text run at the same position.
        (Chunk::Number(_), Chunk::Text(_)) => Ordering::Less,
        (Chunk::Text(_), Chunk::Number(_)) => Ordering::Greater,
    }
}

/// Natural comparison of two strings.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let a = chunks(a);
    let b = chunks(b);
    for (x, y) in a.iter().zip(b.iter()) {
        match compare_chunks(x, y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    a.len().cmp(&b.len())
}

/// Sorts strings in natural order. Equal keys keep their relative order.
pub fn natural_sort<S: AsRef<str>>(items: &mut [S]) {
    items.sort_by(|a, b| natural_cmp(a.as_ref(), b.as_ref()));
}

/// Sorts paths by the natural order of their string form.
pub fn natural_sort_paths(paths: &mut [PathBuf]) {
    paths.sort_by(|a, b| natural_cmp(&a.to_string_lossy(), &b.to_string_lossy()));
}
