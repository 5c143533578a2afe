//! Manifest Fixer: one-shot repair of base URLs and painting targets.
//!
//! Safe to re-run. Once a manifest has been fixed every rewrite below is a
//! no-op and the file is written back byte-for-byte identical.

use std::path::Path;

use serde_json::{Map, Value};
use tracing::info;

use crate::config::{CANONICAL_BASE, LEGACY_BASES, PRESENTATION_3_CONTEXT};
use crate::json_io::{into_object, read_json, write_json};
use crate::model::items_mut;
use crate::IiifError;

/// What a fixer run changed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FixReport {
    pub context_updated: bool,
    pub strings_rewritten: usize,
    pub targets_repaired: usize,
}

impl FixReport {
    pub fn is_noop(&self) -> bool {
        !self.context_updated && self.strings_rewritten == 0 && self.targets_repaired == 0
    }
}

fn rewrite_string(s: &mut String) -> bool {
    let mut changed = false;
    for legacy in LEGACY_BASES {
        if s.contains(legacy) {
            *s = s.replace(legacy, CANONICAL_BASE);
            changed = true;
        }
    }
    changed
}

/// Replace legacy base URLs with [`CANONICAL_BASE`] in every string value of
/// the tree. Object keys are left alone. Returns the number of strings changed.
pub fn rewrite_base_urls(value: &mut Value) -> usize {
    match value {
        Value::String(s) => usize::from(rewrite_string(s)),
        Value::Array(items) => items.iter_mut().map(rewrite_base_urls).sum(),
        Value::Object(map) => map.values_mut().map(rewrite_base_urls).sum(),
        Value::Null | Value::Bool(_) | Value::Number(_) => 0,
    }
}

/// Point every painting annotation at the canvas that contains it.
///
/// Walks canvas → annotation page → annotation and replaces `target`
/// (string or object) with the canvas id string. Returns how many targets
/// actually changed.
pub fn fix_painting_targets(manifest: &mut Map<String, Value>) -> usize {
    let mut repaired = 0;
    for canvas in items_mut(manifest) {
        let Some(canvas_id) = canvas
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(str::to_owned)
        else {
            continue;
        };
        for page in items_mut(canvas) {
            for anno in items_mut(page) {
                let painting = anno.get("motivation").and_then(Value::as_str) == Some("painting");
                if !painting || anno.get("type").and_then(Value::as_str) != Some("Annotation") {
                    continue;
                }
                if anno.get("target").and_then(Value::as_str) != Some(canvas_id.as_str()) {
                    anno.insert("target".into(), Value::String(canvas_id.clone()));
                    repaired += 1;
                }
            }
        }
    }
    repaired
}

/// Apply every repair to an in-memory manifest.
pub fn fix_manifest(manifest: &mut Map<String, Value>) -> FixReport {
    let context = Value::String(PRESENTATION_3_CONTEXT.into());
    let context_updated = manifest.get("@context") != Some(&context);
    manifest.insert("@context".into(), context);

    let strings_rewritten: usize = manifest.values_mut().map(rewrite_base_urls).sum();
    let targets_repaired = fix_painting_targets(manifest);

    FixReport {
        context_updated,
        strings_rewritten,
        targets_repaired,
    }
}

/// Repair the manifest at `path` in place.
pub fn fix_manifest_file(path: &Path) -> Result<FixReport, IiifError> {
    let mut manifest = into_object(path, read_json(path)?)?;
    let report = fix_manifest(&mut manifest);
    write_json(path, &manifest)?;
    info!(
        path = %path.display(),
        context_updated = report.context_updated,
        strings_rewritten = report.strings_rewritten,
        targets_repaired = report.targets_repaired,
        "fixed manifest"
    );
    Ok(report)
}
