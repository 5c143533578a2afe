//! The slice of the IIIF Presentation 3 data model the tools rely on.
//!
//! Manifests are handled as [`serde_json::Value`] trees so that every field
//! the tools do not touch is written back unchanged. The helpers here only
//! know how to find canvases, annotation pages and annotations in that tree.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reference to an annotation page, as listed in a canvas's `annotations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationPageRef {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl AnnotationPageRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: "AnnotationPage".to_string(),
        }
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("id".into(), Value::String(self.id.clone()));
        map.insert("type".into(), Value::String(self.kind.clone()));
        Value::Object(map)
    }
}

/// Final path segment of a canvas id.
pub fn canvas_slug(canvas_id: &str) -> &str {
    canvas_id.rsplit('/').next().unwrap_or(canvas_id)
}

/// Non-empty string `id` of a JSON object, if it has one.
pub fn object_id(value: &Value) -> Option<&str> {
    value
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
}

/// Whether a JSON value is an object with `"type": "Annotation"`.
pub fn is_annotation(value: &Value) -> bool {
    value.get("type").and_then(Value::as_str) == Some("Annotation")
}

/// Object elements of the `items` array of `container`. Missing or
/// non-array `items` yields nothing.
pub fn items_mut(
    container: &mut Map<String, Value>,
) -> impl Iterator<Item = &mut Map<String, Value>> {
    container
        .get_mut("items")
        .and_then(Value::as_array_mut)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object_mut)
}

/// Lookup from canvas slug to full canvas id.
#[derive(Debug, Default, Clone)]
pub struct CanvasIndex {
    by_slug: HashMap<String, String>,
}

impl CanvasIndex {
    /// Index the canvases in a manifest's `items`.
    ///
    /// Entries that are not objects or have no string id are skipped. If two
    /// canvases share a slug the later one wins.
    pub fn from_manifest(manifest: &Map<String, Value>) -> Self {
        let by_slug = manifest
            .get("items")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(object_id)
            .map(|id| (canvas_slug(id).to_string(), id.to_string()))
            .collect();
        Self { by_slug }
    }

    pub fn get(&self, slug: &str) -> Option<&str> {
        self.by_slug.get(slug).map(String::as_str)
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.by_slug.contains_key(slug)
    }

    pub fn len(&self) -> usize {
        self.by_slug.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_slug.is_empty()
    }

    /// Resolve an annotation `target.source` to the canonical canvas id.
    ///
    /// Accepted forms are `canvas:<slug>`, any URI or path containing
    /// `/canvas/` (the last segment is the slug), and a bare known slug.
    /// Returns `None` when the slug is not a canvas of this manifest.
    pub fn resolve_source(&self, source: &str) -> Option<&str> {
        let slug = if let Some(rest) = source.strip_prefix("canvas:") {
            rest
        } else if source.contains("/canvas/") {
            canvas_slug(source)
        } else {
            source
        };
        if slug.is_empty() {
            return None;
        }
        self.get(slug)
    }
}
