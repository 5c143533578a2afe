//! Published locations and the default repository layout.

use std::path::{Path, PathBuf};

/// `@context` every manifest and annotation page is normalised to.
pub const PRESENTATION_3_CONTEXT: &str = "https://iiif.io/api/presentation/3/context.json";

/// Base URL the manifest and annotation pages are served from.
pub const CANONICAL_BASE: &str = "https://surinametimemachine.github.io/iiif-suriname/";

/// Base URLs found in older manifests. Replaced in this order.
pub const LEGACY_BASES: [&str; 2] = [
    "https://example.org/iiif/suriname-maps/",
    "https://surinameTimeMachine.github.io/iiif-suriname/",
];

/// Path under the base URL that normalised annotation pages are published at.
pub const ANNOTATION_PAGE_PATH: &str = "annotations/iiif/";

/// Default file locations relative to a checkout of the manifest repository.
#[derive(Debug, Clone)]
pub struct RepoLayout {
    root: PathBuf,
}

impl RepoLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Raw HTR output, one `c<N>.json` per canvas.
    pub fn raw_annotations(&self) -> PathBuf {
        self.root.join("annotations").join("raw")
    }

    pub fn iiif_annotations(&self) -> PathBuf {
        self.root.join("annotations").join("iiif")
    }

    pub fn manifest(&self) -> PathBuf {
        self.root.join("manifest.json")
    }

    pub fn archive(&self) -> PathBuf {
        self.root.join("archive")
    }
}

/// Ensure a base URL ends with exactly one trailing `/` so ids can be
/// built by plain concatenation.
pub fn normalize_base(base: &str) -> String {
    format!("{}/", base.trim_end_matches('/'))
}

/// Deterministic id of the annotation page published for `file_name`.
pub fn annotation_page_id(base: &str, file_name: &str) -> String {
    format!("{base}{ANNOTATION_PAGE_PATH}{file_name}")
}
