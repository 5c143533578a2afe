//! Reading and writing the JSON documents the tools operate on.
//!
//! Output is UTF-8 with 2-space indentation, non-ASCII characters left as-is
//! and a trailing newline, matching what the hosting repository commits.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::IiifError;

/// Read and parse a JSON file.
pub fn read_json(path: &Path) -> Result<Value, IiifError> {
    let text = fs::read_to_string(path).map_err(|e| IiifError::io(path, e))?;
    parse_json(path, &text)
}

/// Parse JSON text that was read from `path`.
pub fn parse_json(path: &Path, text: &str) -> Result<Value, IiifError> {
    serde_json::from_str(text).map_err(|e| IiifError::json(path, e))
}

/// Unwrap a document whose root must be a JSON object.
pub fn into_object(path: &Path, value: Value) -> Result<Map<String, Value>, IiifError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(IiifError::NotAnObject {
            path: path.to_path_buf(),
        }),
    }
}

/// Render a document the way it is written to disk.
pub fn to_pretty_string<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let mut out = serde_json::to_string_pretty(value)?;
    out.push('\n');
    Ok(out)
}

/// Write a document, creating parent directories as needed.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), IiifError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| IiifError::io(parent, e))?;
    }
    let text = to_pretty_string(value).map_err(|e| IiifError::json(path, e))?;
    fs::write(path, text).map_err(|e| IiifError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pretty_output_uses_two_spaces_and_trailing_newline() {
        let text = to_pretty_string(&json!({"a": [1]})).unwrap();
        assert_eq!(text, "{\n  \"a\": [\n    1\n  ]\n}\n");
    }

    #[test]
    fn non_ascii_is_not_escaped() {
        let text = to_pretty_string(&json!({"label": "Paramaribo – Suriname"})).unwrap();
        assert!(text.contains("Paramaribo – Suriname"));
        assert!(!text.contains("\\u"));
    }

    #[test]
    fn key_order_survives_a_rewrite() {
        let input = r#"{"z": 1, "@context": "x", "id": "y", "a": 2}"#;
        let value = parse_json(Path::new("m.json"), input).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "@context", "id", "a"]);
    }

    #[test]
    fn write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("out.json");
        write_json(&path, &json!({"ok": true})).unwrap();
        assert_eq!(read_json(&path).unwrap(), json!({"ok": true}));
    }

    #[test]
    fn array_root_is_not_an_object() {
        let err = into_object(Path::new("m.json"), json!([1, 2])).unwrap_err();
        assert!(matches!(err, IiifError::NotAnObject { .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_json(Path::new("/nonexistent/manifest.json")).unwrap_err();
        assert!(matches!(err, IiifError::Io { .. }));
    }

    #[test]
    fn malformed_json_names_the_file() {
        let err = parse_json(Path::new("broken.json"), "{not json").unwrap_err();
        assert!(matches!(err, IiifError::Json { .. }));
        assert!(err.to_string().contains("broken.json"));
    }
}
