use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use iiif_suriname_core::{RepoLayout, fix_manifest_file};

/// Rewrite legacy base URLs and repair painting targets in the manifest, in place.
#[derive(Parser)]
#[command(name = "fix-manifest", version)]
struct Args {
    /// Repository checkout holding manifest.json
    #[arg(long, env = "IIIF_REPO_ROOT", default_value = ".")]
    repo_root: PathBuf,

    /// Manifest to repair instead of <repo-root>/manifest.json
    #[arg(long)]
    manifest: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    iiif_suriname_cli::init_tracing();
    let args = Args::parse();
    let path = args
        .manifest
        .unwrap_or_else(|| RepoLayout::new(&args.repo_root).manifest());

    let report = fix_manifest_file(&path).with_context(|| format!("fixing {}", path.display()))?;
    if report.is_noop() {
        tracing::info!("manifest already up to date");
    }
    Ok(())
}
