//! Annotation Attacher: publish raw HTR results as IIIF annotation pages and
//! link them into the manifest.
//!
//! Each raw `c<N>.json` file is normalised into an `AnnotationPage` with a
//! deterministic id under the published base URL, written to the output
//! folder under the same name, and referenced from the matching canvas's
//! `annotations` list. The manifest is written last, so a failure while
//! processing raw files never leaves a half-updated manifest behind.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::archive::archive_manifest;
use crate::config::{PRESENTATION_3_CONTEXT, annotation_page_id, normalize_base};
use crate::json_io::{into_object, parse_json, read_json, write_json};
use crate::model::{AnnotationPageRef, CanvasIndex, is_annotation, items_mut};
use crate::order::list_raw_files;
use crate::IiifError;

/// Where to snapshot the manifest before it is modified.
#[derive(Debug, Clone)]
pub struct ArchiveOptions {
    pub dir: PathBuf,
    pub date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct AttachOptions {
    /// Folder holding the raw `c*.json` HTR results.
    pub results_dir: PathBuf,
    /// Folder the normalised annotation pages are written to.
    pub output_dir: PathBuf,
    pub manifest_path: PathBuf,
    /// Base URL the annotation pages are published under.
    pub base_url: String,
    pub archive: Option<ArchiveOptions>,
}

/// Outcome of one attacher run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AttachReport {
    pub pages_written: usize,
    pub canvases_linked: usize,
    /// References appended to `annotations` lists; zero on a repeat run.
    pub links_added: usize,
    /// Raw files that matched no canvas.
    pub unmatched: Vec<String>,
    pub archived: bool,
}

/// Normalise a raw annotation page in place.
///
/// Sets `@context`, `id` and `type`, and rewrites every annotation
/// `target.source` that resolves to a known canvas to that canvas's full id.
/// Unresolvable sources are left untouched. Returns the distinct canvas ids
/// the page's annotations target, in first-seen order.
pub fn normalize_page(
    page: &mut Map<String, Value>,
    page_id: &str,
    index: &CanvasIndex,
) -> Vec<String> {
    page.insert("@context".into(), Value::String(PRESENTATION_3_CONTEXT.into()));
    page.insert("id".into(), Value::String(page_id.into()));
    page.insert("type".into(), Value::String("AnnotationPage".into()));

    let mut targeted: Vec<String> = Vec::new();
    let Some(items) = page.get_mut("items").and_then(Value::as_array_mut) else {
        return targeted;
    };
    for item in items.iter_mut().filter(|item| is_annotation(item)) {
        let Some(target) = item.get_mut("target").and_then(Value::as_object_mut) else {
            continue;
        };
        let Some(source) = target.get("source").and_then(Value::as_str) else {
            continue;
        };
        if let Some(canvas_id) = index.resolve_source(source) {
            let canvas_id = canvas_id.to_string();
            target.insert("source".into(), Value::String(canvas_id.clone()));
            if !targeted.contains(&canvas_id) {
                targeted.push(canvas_id);
            }
        }
    }
    targeted
}

/// Add a reference to `page_id` to a canvas's `annotations` list.
///
/// A missing or non-list `annotations` is replaced by a one-entry list.
/// Returns `false` if the canvas already references the page.
pub fn link_page(canvas: &mut Map<String, Value>, page_id: &str) -> bool {
    let entry = AnnotationPageRef::new(page_id).to_value();
    match canvas.get_mut("annotations").and_then(Value::as_array_mut) {
        Some(existing) => {
            let present = existing
                .iter()
                .any(|e| e.get("id").and_then(Value::as_str) == Some(page_id));
            if present {
                return false;
            }
            existing.push(entry);
        }
        None => {
            canvas.insert("annotations".into(), Value::Array(vec![entry]));
        }
    }
    true
}

/// Canvases a raw file belongs to.
///
/// The file stem is tried as a canvas slug, then as `c<slug>`. Files named
/// only by position (`c1.json` for canvas `p1`) fall back to the canvases
/// their annotations target.
fn match_canvases(stem: &str, targeted: Vec<String>, index: &CanvasIndex) -> Vec<String> {
    let by_name = index
        .get(stem)
        .or_else(|| stem.strip_prefix('c').and_then(|slug| index.get(slug)));
    match by_name {
        Some(id) => vec![id.to_string()],
        None => targeted,
    }
}

/// Run the attacher end to end.
pub fn attach_annotations(opts: &AttachOptions) -> Result<AttachReport, IiifError> {
    let manifest_text = fs::read_to_string(&opts.manifest_path)
        .map_err(|e| IiifError::io(&opts.manifest_path, e))?;
    let manifest = parse_json(&opts.manifest_path, &manifest_text)?;
    let mut manifest = into_object(&opts.manifest_path, manifest)?;

    let mut report = AttachReport::default();
    if let Some(archive) = &opts.archive {
        report.archived = archive_manifest(&manifest_text, &archive.dir, archive.date)?;
    }

    let index = CanvasIndex::from_manifest(&manifest);
    debug!(canvases = index.len(), "indexed manifest canvases");

    fs::create_dir_all(&opts.output_dir).map_err(|e| IiifError::io(&opts.output_dir, e))?;
    let base = normalize_base(&opts.base_url);

    let mut pages_by_canvas: HashMap<String, Vec<String>> = HashMap::new();
    for path in list_raw_files(&opts.results_dir)? {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut page = read_json(&path)?;
        let Some(page_map) = page.as_object_mut() else {
            return Err(IiifError::NotAnObject { path });
        };
        let page_id = annotation_page_id(&base, &file_name);
        let targeted = normalize_page(page_map, &page_id, &index);
        write_json(&opts.output_dir.join(&file_name), &page)?;
        report.pages_written += 1;

        let canvases = match_canvases(&stem, targeted, &index);
        debug!(file = %file_name, page_id = %page_id, canvases = canvases.len(), "normalised page");
        if canvases.is_empty() {
            report.unmatched.push(file_name);
            continue;
        }
        for canvas_id in canvases {
            pages_by_canvas
                .entry(canvas_id)
                .or_default()
                .push(page_id.clone());
        }
    }

    for canvas in items_mut(&mut manifest) {
        let Some(canvas_id) = canvas
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(str::to_owned)
        else {
            continue;
        };
        let Some(page_ids) = pages_by_canvas.get(&canvas_id) else {
            continue;
        };
        for page_id in page_ids {
            if link_page(canvas, page_id) {
                report.links_added += 1;
            }
        }
        report.canvases_linked += 1;
    }

    write_json(&opts.manifest_path, &manifest)?;
    info!(
        pages = report.pages_written,
        canvases = report.canvases_linked,
        links_added = report.links_added,
        unmatched = report.unmatched.len(),
        manifest = %opts.manifest_path.display(),
        "attached annotation pages"
    );
    Ok(report)
}
