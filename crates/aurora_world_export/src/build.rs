// SPDX-License-Identifier: MIT OR Apache-2.0
//! Build orchestration for world exports.
//!
//! Owns the per-build feature accumulator, traverses every world,
//! applies global defines and the flat-color fallback, then writes the
//! material documents once the feature set can no longer change.

use crate::assets::AssetTracker;
use crate::encode::ImageEncoder;
use crate::error::ExportError;
use crate::features::{self, FeatureSet};
use crate::material;
use crate::probes::ProbeGenerator;
use crate::world::{World, WorldExport, WorldTraversal};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Procedural sky radiance preset.
///
/// Both presets currently reference the same placeholder radiance data;
/// the choice is a policy knob, not a computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkyModel {
    /// Hosek-Wilkie preset
    Hosek,
    /// Approximate placeholder preset
    Fake,
}

impl SkyModel {
    /// Asset directory holding this preset's radiance maps.
    pub fn asset_dir(self) -> &'static str {
        match self {
            Self::Hosek => "hosek",
            Self::Fake => "hosek_fake",
        }
    }
}

/// Build-wide export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildSettings {
    /// Generate irradiance data for environments
    pub generate_irradiance: bool,
    /// Generate radiance mip chains for environments
    pub generate_radiance: bool,
    /// Generate radiance for procedural skies
    pub generate_radiance_sky: bool,
    /// Sky radiance preset
    pub sky_model: SkyModel,
    /// Mip count requested for worlds that have not been exported before
    pub default_mip_count: u32,
    /// Enable volumetric clouds
    pub generate_clouds: bool,
    /// Enable voxel global illumination
    pub voxel_gi: bool,
    /// Render-path defines appended to the shader variant name
    pub render_path_defs: Vec<String>,
    /// Directory holding the sky radiance preset assets
    pub sky_assets_dir: PathBuf,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            generate_irradiance: true,
            generate_radiance: true,
            generate_radiance_sky: true,
            sky_model: SkyModel::Hosek,
            default_mip_count: 8,
            generate_clouds: false,
            voxel_gi: false,
            render_path_defs: Vec::new(),
            sky_assets_dir: PathBuf::from("assets/sky"),
        }
    }
}

/// Deterministic output locations of one build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildPaths {
    /// Project root directory
    pub project_root: PathBuf,
    /// Compiled build output directory
    pub build_dir: PathBuf,
}

impl BuildPaths {
    /// Standard layout under a project root.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        let build_dir = project_root.join("build/compiled");
        Self {
            project_root,
            build_dir,
        }
    }

    /// Directory for unpacked and converted images.
    pub fn unpacked_dir(&self) -> PathBuf {
        self.build_dir.join("Assets/unpacked")
    }

    /// Directory for material documents.
    pub fn materials_dir(&self) -> PathBuf {
        self.build_dir.join("Assets/materials")
    }

    /// Directory for generated environment probe data.
    pub fn envmaps_dir(&self) -> PathBuf {
        self.build_dir.join("Assets/envmaps")
    }
}

/// Per-world result of a build.
#[derive(Debug)]
pub struct WorldOutcome {
    /// World name
    pub world: String,
    /// Written material document, when the world succeeded
    pub document: Option<PathBuf>,
    /// Non-fatal problems encountered while exporting this world
    pub warnings: Vec<String>,
    /// Hard failure, when the world could not be exported
    pub error: Option<ExportError>,
}

impl WorldOutcome {
    /// Whether the world exported without a hard failure.
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Result of one build invocation.
#[derive(Debug)]
pub struct BuildReport {
    /// Per-world outcomes, in input order
    pub outcomes: Vec<WorldOutcome>,
    /// Final accumulated feature set
    pub features: FeatureSet,
}

impl BuildReport {
    /// Whether any world failed hard.
    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|o| !o.succeeded())
    }
}

/// Export every world of a build.
///
/// Worlds are exported independently: a hard failure in one world is
/// recorded in its outcome and does not abort its siblings. Updated
/// export caches are merged back into the worlds that succeeded.
pub fn build_worlds(
    worlds: &mut [World],
    settings: &BuildSettings,
    paths: &BuildPaths,
    assets: &mut AssetTracker,
    probes: &mut dyn ProbeGenerator,
    encoder: &dyn ImageEncoder,
) -> Result<BuildReport, ExportError> {
    let start = std::time::Instant::now();
    tracing::info!(worlds = worlds.len(), "exporting world shaders");

    let materials_dir = paths.materials_dir();
    fs::create_dir_all(&materials_dir).map_err(|e| ExportError::io(&materials_dir, e))?;

    // Fresh accumulator per build; the variant name is a function of
    // every token appended below.
    let mut features = FeatureSet::new();

    let mut outcomes = Vec::with_capacity(worlds.len());
    let mut exports: Vec<Option<WorldExport>> = Vec::with_capacity(worlds.len());

    for world in worlds.iter() {
        let result = {
            let mut traversal =
                WorldTraversal::new(settings, paths, assets, probes, encoder, &mut features);
            traversal.export(world)
        }
        .and_then(|mut export| {
            color_fallback(world, &mut export, &mut features, probes)?;
            Ok(export)
        });

        match result {
            Ok(export) => {
                outcomes.push(WorldOutcome {
                    world: world.name.clone(),
                    document: None,
                    warnings: export.warnings.clone(),
                    error: None,
                });
                exports.push(Some(export));
            }
            Err(error) => {
                tracing::error!(world = %world.name, %error, "world export failed");
                outcomes.push(WorldOutcome {
                    world: world.name.clone(),
                    document: None,
                    warnings: Vec::new(),
                    error: Some(error),
                });
                exports.push(None);
            }
        }
    }

    apply_global_defines(&mut features, settings, assets);

    // All feature mutation is done; documents may now reference the
    // variant name.
    for (index, export) in exports.into_iter().enumerate() {
        let Some(export) = export else { continue };
        match material::write_world_document(&export, &features, settings, paths, assets) {
            Ok(path) => {
                outcomes[index].document = Some(path);
                worlds[index].cache = export.cache;
            }
            Err(error) => {
                tracing::error!(world = %export.world_name, %error, "failed to write material document");
                outcomes[index].error = Some(error);
            }
        }
    }

    let report = BuildReport { outcomes, features };
    tracing::info!(
        elapsed = ?start.elapsed(),
        failures = report.outcomes.iter().filter(|o| !o.succeeded()).count(),
        variant_tokens = %report.features.concat(),
        "world export finished"
    );
    Ok(report)
}

/// Clear-to-color fallback when a world contributed no texture or sky.
///
/// Checked against the build-wide accumulator, so tokens contributed by
/// earlier worlds in the same build suppress the fallback; this mirrors
/// the shared variant name the runtime will look up.
fn color_fallback(
    world: &World,
    export: &mut WorldExport,
    features: &mut FeatureSet,
    probes: &mut dyn ProbeGenerator,
) -> Result<(), ExportError> {
    if features.contains(features::ENV_SKY) || features.contains(features::ENV_TEX) {
        return Ok(());
    }

    if !features.contains(features::ENV_IMG) {
        features.push(features::ENV_COL);
    }

    export.cache.texture_name = Some(world.name.clone());
    export.cache.irradiance_name = Some(world.name.clone());
    probes.generate_from_color(&world.name, export.cache.color)
}

/// Defines contributed by build-wide settings rather than any world.
fn apply_global_defines(
    features: &mut FeatureSet,
    settings: &BuildSettings,
    assets: &mut AssetTracker,
) {
    if settings.generate_clouds {
        features.push(features::ENV_CLOUDS);
    }

    if settings.voxel_gi {
        assets.add_build_define("aurora_voxelgi");
        features.push(features::VOXEL_GI);
        // Voxel cones sample both probe sets.
        features.push(features::RADIANCE);
        features.push(features::IRRADIANCE);
    }
}
