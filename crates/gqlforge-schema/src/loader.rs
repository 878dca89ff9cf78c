//! Type-definition loading and merging.
//!
//! The loader resolves glob-style path patterns (`*`, `?`, `**`) to SDL
//! files, reads them, and returns the contents as discrete fragments.
//! Matches within one pattern are sorted lexicographically so builds are
//! reproducible regardless of file-system enumeration order. Fragments are
//! not merged or deduplicated here; that happens during schema assembly.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::SchemaError;

/// Directly supplied textual type definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDefs {
    One(String),
    Many(Vec<String>),
}

impl TypeDefs {
    /// Returns the definitions as a list of fragments.
    #[must_use]
    pub fn fragments(&self) -> Vec<String> {
        match self {
            Self::One(fragment) => vec![fragment.clone()],
            Self::Many(fragments) => fragments.clone(),
        }
    }
}

impl From<&str> for TypeDefs {
    fn from(fragment: &str) -> Self {
        Self::One(fragment.to_string())
    }
}

impl From<String> for TypeDefs {
    fn from(fragment: String) -> Self {
        Self::One(fragment)
    }
}

impl From<Vec<String>> for TypeDefs {
    fn from(fragments: Vec<String>) -> Self {
        Self::Many(fragments)
    }
}

/// Concatenates loader output with directly supplied definitions.
///
/// Path-loaded fragments come first, then the direct ones, so the merged
/// sequence is stable for a given configuration.
#[must_use]
pub fn merge_type_defs(loaded: Vec<String>, direct: Option<&TypeDefs>) -> Vec<String> {
    let mut merged = loaded;
    if let Some(direct) = direct {
        merged.extend(direct.fragments());
    }
    merged
}

/// Loads SDL fragments from file-path patterns.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeDefsLoader;

impl TypeDefsLoader {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Resolves each pattern to files and returns their contents in order.
    ///
    /// An empty or absent pattern list yields an empty sequence; callers
    /// treat this as "no textual definitions", not an error. Patterns that
    /// match nothing contribute nothing.
    ///
    /// # Errors
    ///
    /// Returns an error when a matched file cannot be read.
    pub async fn merge_types_by_paths(
        &self,
        patterns: Option<&[String]>,
    ) -> Result<Vec<String>, SchemaError> {
        let Some(patterns) = patterns else {
            return Ok(Vec::new());
        };

        let mut fragments = Vec::new();
        for pattern in patterns {
            let matches = resolve_pattern(pattern).await?;
            debug!(pattern = %pattern, files = matches.len(), "resolved type definition pattern");
            for path in matches {
                fragments.push(tokio::fs::read_to_string(&path).await?);
            }
        }
        Ok(fragments)
    }
}

/// Resolves one pattern to a sorted list of matching files.
async fn resolve_pattern(pattern: &str) -> Result<Vec<PathBuf>, SchemaError> {
    let (base, segments) = split_pattern(pattern);

    // A pattern without wildcards is a literal file path.
    if segments.is_empty() {
        return match tokio::fs::metadata(&base).await {
            Ok(meta) if meta.is_file() => Ok(vec![base]),
            _ => Ok(Vec::new()),
        };
    }

    let mut matches = Vec::new();
    let mut stack = vec![base.clone()];
    while let Some(dir) = stack.pop() {
        let Ok(mut entries) = tokio::fs::read_dir(&dir).await else {
            continue;
        };
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let file_type = entry.file_type().await?;
            if file_type.is_dir() {
                stack.push(path);
            } else if file_type.is_file() && relative_path_matches(&base, &path, &segments) {
                matches.push(path);
            }
        }
    }

    matches.sort();
    Ok(matches)
}

/// Splits a pattern into its literal base directory and wildcard segments.
fn split_pattern(pattern: &str) -> (PathBuf, Vec<String>) {
    let mut base = if pattern.starts_with('/') {
        PathBuf::from("/")
    } else {
        PathBuf::new()
    };
    let mut segments: Vec<String> = Vec::new();

    for segment in pattern.split('/').filter(|s| !s.is_empty()) {
        if segments.is_empty() && !segment.contains(['*', '?']) {
            base.push(segment);
        } else {
            segments.push(segment.to_string());
        }
    }

    if base.as_os_str().is_empty() {
        base = PathBuf::from(".");
    }
    (base, segments)
}

fn relative_path_matches(base: &Path, path: &Path, segments: &[String]) -> bool {
    let Ok(relative) = path.strip_prefix(base) else {
        return false;
    };
    let Some(parts) = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<&str>>>()
    else {
        return false;
    };
    segments_match(&parts, segments)
}

fn segments_match(path: &[&str], pattern: &[String]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        // `**` matches zero or more path segments.
        Some((first, rest)) if first == "**" => {
            (0..=path.len()).any(|skip| segments_match(&path[skip..], rest))
        }
        Some((first, rest)) => match path.split_first() {
            Some((segment, path_rest)) => {
                segment_match(segment, first) && segments_match(path_rest, rest)
            }
            None => false,
        },
    }
}

/// Matches one path segment against a pattern segment with `*` and `?`.
fn segment_match(segment: &str, pattern: &str) -> bool {
    fn go(s: &[char], p: &[char]) -> bool {
        match p.split_first() {
            None => s.is_empty(),
            Some(('*', rest)) => (0..=s.len()).any(|skip| go(&s[skip..], rest)),
            Some(('?', rest)) => s.split_first().is_some_and(|(_, s_rest)| go(s_rest, rest)),
            Some((c, rest)) => s
                .split_first()
                .is_some_and(|(s_first, s_rest)| s_first == c && go(s_rest, rest)),
        }
    }
    let s: Vec<char> = segment.chars().collect();
    let p: Vec<char> = pattern.chars().collect();
    go(&s, &p)
}
