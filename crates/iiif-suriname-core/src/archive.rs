//! Dated manifest snapshots, at most one per UTC day.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use crate::IiifError;

/// Location of the snapshot for `date`: `<dir>/manifest-YYYY-MM-DD.json`.
pub fn archive_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("manifest-{}.json", date.format("%Y-%m-%d")))
}

/// Today's date in UTC, which keys the archive.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Store `manifest_text` verbatim as the snapshot for `date`.
///
/// An existing snapshot for the same date is never overwritten. Returns
/// `true` if a new snapshot was written.
pub fn archive_manifest(
    manifest_text: &str,
    dir: &Path,
    date: NaiveDate,
) -> Result<bool, IiifError> {
    fs::create_dir_all(dir).map_err(|e| IiifError::io(dir, e))?;
    let path = archive_path(dir, date);
    if path.exists() {
        debug!(path = %path.display(), "archive for today already exists");
        return Ok(false);
    }
    fs::write(&path, manifest_text).map_err(|e| IiifError::io(&path, e))?;
    info!(path = %path.display(), "archived manifest");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn path_is_keyed_by_date() {
        let path = archive_path(Path::new("archive"), date(2024, 3, 7));
        assert_eq!(path, Path::new("archive/manifest-2024-03-07.json"));
    }

    #[test]
    fn writes_snapshot_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let archive_dir = dir.path().join("archive");
        let text = "{\n    \"id\": \"kept exactly\"\n}";

        assert!(archive_manifest(text, &archive_dir, date(2024, 3, 7)).unwrap());
        let stored = fs::read_to_string(archive_path(&archive_dir, date(2024, 3, 7))).unwrap();
        assert_eq!(stored, text);
    }

    #[test]
    fn second_snapshot_same_day_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let day = date(2024, 3, 7);

        assert!(archive_manifest("first", dir.path(), day).unwrap());
        assert!(!archive_manifest("second", dir.path(), day).unwrap());
        let stored = fs::read_to_string(archive_path(dir.path(), day)).unwrap();
        assert_eq!(stored, "first");
    }

    #[test]
    fn next_day_gets_its_own_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        assert!(archive_manifest("a", dir.path(), date(2024, 3, 7)).unwrap());
        assert!(archive_manifest("b", dir.path(), date(2024, 3, 8)).unwrap());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }
}
