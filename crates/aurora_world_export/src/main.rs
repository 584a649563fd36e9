// SPDX-License-Identifier: MIT OR Apache-2.0
//! World shader export tool.
//!
//! Loads a RON project file describing worlds and build settings, runs
//! the export pipeline and reports per-world outcomes. The image
//! conversion tool defaults to `magick` and can be overridden with the
//! `AURORA_IMAGE_ENCODER` environment variable.

use aurora_world_export::encode::CommandEncoder;
use aurora_world_export::probes::IrradianceBaker;
use aurora_world_export::{build_worlds, AssetTracker, BuildPaths, BuildSettings, ExportError, World};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// On-disk project description consumed by the tool.
#[derive(Debug, Serialize, Deserialize)]
struct ProjectFile {
    /// Build-wide export settings
    #[serde(default)]
    settings: BuildSettings,
    /// Worlds to export
    worlds: Vec<World>,
}

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("aurora_world_export=debug".parse().expect("static directive"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Aurora world export v{}", env!("CARGO_PKG_VERSION"));

    let Some(project_path) = std::env::args().nth(1) else {
        eprintln!("usage: aurora_world_export <project.ron>");
        std::process::exit(2);
    };

    match run(Path::new(&project_path)) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            tracing::error!("world export failed: {e}");
            std::process::exit(1);
        }
    }
}

/// Run the export; returns whether every world succeeded.
fn run(project_path: &Path) -> Result<bool, ExportError> {
    let text = std::fs::read_to_string(project_path)
        .map_err(|e| ExportError::io(project_path, e))?;
    let project: ProjectFile = ron::from_str(&text).map_err(|e| ExportError::Project {
        path: project_path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let project_root = project_path
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let paths = BuildPaths::new(project_root);

    let mut assets = AssetTracker::new();
    let mut probes = IrradianceBaker::new(paths.envmaps_dir());
    let encoder_program =
        std::env::var("AURORA_IMAGE_ENCODER").unwrap_or_else(|_| "magick".to_string());
    let encoder = CommandEncoder::new(encoder_program);

    let mut worlds = project.worlds;
    let report = build_worlds(
        &mut worlds,
        &project.settings,
        &paths,
        &mut assets,
        &mut probes,
        &encoder,
    )?;

    for outcome in &report.outcomes {
        for warning in &outcome.warnings {
            tracing::warn!(world = %outcome.world, "{warning}");
        }
        match (&outcome.document, &outcome.error) {
            (Some(path), _) => {
                tracing::info!(world = %outcome.world, path = %path.display(), "exported");
            }
            (None, Some(error)) => {
                tracing::error!(world = %outcome.world, %error, "export failed");
            }
            (None, None) => {}
        }
    }
    tracing::info!(
        assets = assets.assets().len(),
        shader_variants = assets.shader_variants().len(),
        "asset registries populated"
    );

    Ok(!report.has_failures())
}
