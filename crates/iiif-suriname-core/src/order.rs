//! Processing order for raw HTR result files.
//!
//! The HTR pipeline names its output after canvas position: `c1.json`,
//! `c2.json`, ..., `c10.json`. A plain name sort would put `c10` before `c2`,
//! so files are ordered by the numeric suffix instead.
//!
//! # Ordering
//!
//! 1. `c<digits>` stems, by numeric value (`c2` < `c10`)
//! 2. every other stem, alphabetically (`c1a`, `cover`, ...)
//! 3. ties (`c01` vs `c1`) broken by file name

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use crate::IiifError;

/// Sort key for one raw file stem.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum RawFileKey {
    Numbered(u64),
    Named(String),
}

/// Classify a file stem (file name without `.json`).
pub fn raw_file_key(stem: &str) -> RawFileKey {
    let digits = stem.strip_prefix('c').unwrap_or("");
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(n) = digits.parse() {
            return RawFileKey::Numbered(n);
        }
    }
    RawFileKey::Named(stem.to_string())
}

fn is_raw_file_name(name: &str) -> bool {
    name.starts_with('c') && name.ends_with(".json") && name.len() > ".json".len()
}

fn stem_of(path: &Path) -> &str {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("")
}

fn compare_paths(a: &Path, b: &Path) -> Ordering {
    raw_file_key(stem_of(a))
        .cmp(&raw_file_key(stem_of(b)))
        .then_with(|| a.file_name().cmp(&b.file_name()))
}

/// List the `c*.json` files in `dir` in processing order.
///
/// Subdirectories and non-UTF-8 names are ignored.
pub fn list_raw_files(dir: &Path) -> Result<Vec<PathBuf>, IiifError> {
    let entries = fs::read_dir(dir).map_err(|e| IiifError::io(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| IiifError::io(dir, e))?;
        let path = entry.path();
        let matches = entry
            .file_name()
            .to_str()
            .is_some_and(is_raw_file_name);
        if matches && path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| compare_paths(a, b));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: assert a list of stems produces keys in strictly ascending order.
    fn assert_sorted_order(stems: &[&str]) {
        let keys: Vec<RawFileKey> = stems.iter().map(|s| raw_file_key(s)).collect();
        for i in 1..keys.len() {
            assert!(
                keys[i - 1] < keys[i],
                "Expected {:?} ({:?}) < {:?} ({:?})",
                stems[i - 1],
                keys[i - 1],
                stems[i],
                keys[i],
            );
        }
    }

    #[test]
    fn numeric_suffix_sequence() {
        assert_sorted_order(&["c1", "c2", "c3", "c9", "c10", "c11", "c100"]);
    }

    #[test]
    fn named_files_sort_after_numbered() {
        assert_sorted_order(&["c2", "c10", "c1a", "c_extra", "cover"]);
    }

    #[test]
    fn bare_c_is_named() {
        assert_eq!(raw_file_key("c"), RawFileKey::Named("c".into()));
    }

    #[test]
    fn leading_zeros_compare_numerically() {
        assert_eq!(raw_file_key("c007"), RawFileKey::Numbered(7));
    }

    #[test]
    fn overflowing_number_is_named() {
        let stem = "c99999999999999999999999";
        assert_eq!(raw_file_key(stem), RawFileKey::Named(stem.into()));
    }

    #[test]
    fn lists_only_raw_json_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["c10.json", "c2.json", "c1.json", "cover.json", "p1.json", "c3.txt"] {
            fs::write(dir.path().join(name), "{}").unwrap();
        }
        fs::create_dir(dir.path().join("c4.json")).unwrap();

        let names: Vec<String> = list_raw_files(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["c1.json", "c2.json", "c10.json", "cover.json"]);
    }

    #[test]
    fn ties_break_on_file_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("c1.json"), "{}").unwrap();
        fs::write(dir.path().join("c01.json"), "{}").unwrap();
        let files = list_raw_files(dir.path()).unwrap();
        assert!(files[0].ends_with("c01.json"));
        assert!(files[1].ends_with("c1.json"));
    }

    #[test]
    fn missing_dir_is_io_error() {
        let err = list_raw_files(Path::new("/nonexistent/raw")).unwrap_err();
        assert!(matches!(err, IiifError::Io { .. }));
    }
}
