//! Maintenance transformations for the Suriname Time Machine IIIF manifest.
//!
//! Two independent jobs share this crate: [`attach`] publishes HTR output as
//! IIIF annotation pages and links them into the manifest, and [`fix`]
//! repairs legacy base URLs and painting targets in an existing manifest.

pub mod archive;
pub mod attach;
pub mod config;
mod error;
pub mod fix;
pub mod json_io;
pub mod model;
pub mod order;

pub use attach::{ArchiveOptions, AttachOptions, AttachReport, attach_annotations};
pub use config::RepoLayout;
pub use error::IiifError;
pub use fix::{FixReport, fix_manifest, fix_manifest_file};
pub use model::{AnnotationPageRef, CanvasIndex, canvas_slug};
