use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use iiif_suriname_core::config::CANONICAL_BASE;
use iiif_suriname_core::{ArchiveOptions, AttachOptions, RepoLayout, archive, attach_annotations};

/// Attach HTR annotation pages to the manifest and normalize their targets.
#[derive(Parser)]
#[command(name = "add-annotations", version)]
struct Args {
    /// Repository checkout the default paths are resolved against
    #[arg(long, env = "IIIF_REPO_ROOT", default_value = ".")]
    repo_root: PathBuf,

    /// Folder with raw annotation JSON files (c1.json, c2.json, ...)
    /// [default: <repo-root>/annotations/raw]
    #[arg(long)]
    results: Option<PathBuf>,

    /// Folder to write normalized IIIF AnnotationPages
    /// [default: <repo-root>/annotations/iiif]
    #[arg(long)]
    output: Option<PathBuf>,

    /// Path to the IIIF manifest to update [default: <repo-root>/manifest.json]
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Archive the current manifest before updating
    #[arg(long)]
    archive: bool,

    /// Folder to store archived manifests [default: <repo-root>/archive]
    #[arg(long)]
    archive_dir: Option<PathBuf>,

    /// Base URL the annotation pages are published under
    #[arg(long, default_value = CANONICAL_BASE)]
    base_url: String,
}

fn main() -> anyhow::Result<()> {
    iiif_suriname_cli::init_tracing();
    let args = Args::parse();
    let layout = RepoLayout::new(&args.repo_root);

    let archive_opts = args.archive.then(|| ArchiveOptions {
        dir: args.archive_dir.clone().unwrap_or_else(|| layout.archive()),
        date: archive::today_utc(),
    });
    let opts = AttachOptions {
        results_dir: args.results.unwrap_or_else(|| layout.raw_annotations()),
        output_dir: args.output.unwrap_or_else(|| layout.iiif_annotations()),
        manifest_path: args.manifest.unwrap_or_else(|| layout.manifest()),
        base_url: args.base_url,
        archive: archive_opts,
    };

    let report = attach_annotations(&opts)
        .with_context(|| format!("attaching annotations to {}", opts.manifest_path.display()))?;
    if !report.unmatched.is_empty() {
        tracing::debug!(files = ?report.unmatched, "raw files without a matching canvas");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn archive_flag_and_paths_parse() {
        let args = Args::try_parse_from([
            "add-annotations",
            "--results",
            "r",
            "--output",
            "o",
            "--manifest",
            "m.json",
            "--archive",
            "--archive-dir",
            "a",
        ])
        .unwrap();
        assert!(args.archive);
        assert_eq!(args.results, Some(PathBuf::from("r")));
        assert_eq!(args.output, Some(PathBuf::from("o")));
        assert_eq!(args.manifest, Some(PathBuf::from("m.json")));
        assert_eq!(args.archive_dir, Some(PathBuf::from("a")));
        assert_eq!(args.base_url, CANONICAL_BASE);
    }
}
