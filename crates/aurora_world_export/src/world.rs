// SPDX-License-Identifier: MIT OR Apache-2.0
//! World graph traversal.
//!
//! Walks from the world output node down through the background surface
//! to a terminal color source, flattening the graph into constant and
//! texture bindings. Recursion follows linked producers only; socket
//! defaults are never traversed, since an unlinked socket means "no
//! override".

use crate::assets::AssetTracker;
use crate::build::{BuildPaths, BuildSettings};
use crate::encode::ImageEncoder;
use crate::error::ExportError;
use crate::features::{self, FeatureSet};
use crate::material::{ConstantBinding, ShaderContext, TextureBinding};
use crate::probes::ProbeGenerator;
use crate::resolver::{self, ImageOutcome};
use crate::util::split_extension;
use aurora_world_graph::{Node, NodeGraph, NodeKind, SocketValue};
use serde::{Deserialize, Serialize};

/// A top-level scene entity owning one shading node graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    /// World name; keys output documents and probe lookups
    pub name: String,
    /// The world's shading graph
    pub graph: NodeGraph,
    /// State cached from the previous export of this world
    #[serde(default)]
    pub cache: WorldExportCache,
}

impl World {
    /// Create a world around a graph.
    pub fn new(name: impl Into<String>, graph: NodeGraph) -> Self {
        Self {
            name: name.into(),
            graph,
            cache: WorldExportCache::default(),
        }
    }
}

/// State written back onto the world after an export.
///
/// Later build stages (and later builds) read these instead of
/// re-traversing the graph, e.g. the clear-to-flat-color path. The
/// traversal engine returns this value; the orchestrator merges it into
/// the world.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldExportCache {
    /// Resolved environment texture name
    pub texture_name: Option<String>,
    /// Irradiance document lookup name
    pub irradiance_name: Option<String>,
    /// Radiance mip chain length
    pub mip_count: u32,
    /// Raw background color default
    pub color: [f32; 4],
    /// Resolved environment strength
    pub strength: f32,
    /// Sun direction, coordinate-corrected
    pub sun_direction: Option<[f32; 3]>,
    /// Sky turbidity
    pub turbidity: Option<f32>,
    /// Sky ground albedo
    pub ground_albedo: Option<f32>,
}

/// One world's traversal output.
#[derive(Debug, Clone)]
pub struct WorldExport {
    /// Name of the exported world
    pub world_name: String,
    /// Flattened shader bindings
    pub context: ShaderContext,
    /// Updated cached state
    pub cache: WorldExportCache,
    /// Non-fatal problems encountered (e.g. missing images)
    pub warnings: Vec<String>,
}

/// Recursive resolver for one build's worlds.
///
/// Borrows the build-wide accumulators (feature set, asset tracker) so
/// every world of a build contributes to the same shader variant name.
pub struct WorldTraversal<'a> {
    settings: &'a BuildSettings,
    paths: &'a BuildPaths,
    assets: &'a mut AssetTracker,
    probes: &'a mut dyn ProbeGenerator,
    encoder: &'a dyn ImageEncoder,
    features: &'a mut FeatureSet,
}

impl<'a> WorldTraversal<'a> {
    /// Create a traversal over the build's shared state.
    pub fn new(
        settings: &'a BuildSettings,
        paths: &'a BuildPaths,
        assets: &'a mut AssetTracker,
        probes: &'a mut dyn ProbeGenerator,
        encoder: &'a dyn ImageEncoder,
        features: &'a mut FeatureSet,
    ) -> Self {
        Self {
            settings,
            paths,
            assets,
            probes,
            encoder,
            features,
        }
    }

    /// Resolve one world into flattened bindings.
    ///
    /// A graph without an output node, or with an unlinked output socket,
    /// yields an empty binding set; that is not an error.
    pub fn export(&mut self, world: &World) -> Result<WorldExport, ExportError> {
        let mut export = WorldExport {
            world_name: world.name.clone(),
            context: ShaderContext::world(),
            cache: world.cache.clone(),
            warnings: Vec::new(),
        };

        if let Some(output) = world.graph.output_node() {
            self.parse_world_output(world, output, &mut export)?;
        }
        Ok(export)
    }

    fn parse_world_output(
        &mut self,
        world: &World,
        node: &Node,
        export: &mut WorldExport,
    ) -> Result<(), ExportError> {
        if let Some(surface) = world.graph.linked_producer(node.id, 0) {
            self.parse_surface(world, surface, export)?;
        }
        Ok(())
    }

    fn parse_surface(
        &mut self,
        world: &World,
        node: &Node,
        export: &mut WorldExport,
    ) -> Result<(), ExportError> {
        if !matches!(node.kind, NodeKind::Background) {
            tracing::debug!(world = %world.name, kind = node.kind.tag(), "skipping surface node");
            return Ok(());
        }

        if self.settings.generate_irradiance {
            self.features.push(features::IRRADIANCE);
        }

        // Strength is always read as the socket default; a link on this
        // socket is not dereferenced.
        let strength = node
            .input_value(1)
            .and_then(SocketValue::as_float)
            .unwrap_or(1.0);
        export
            .context
            .bind_constants
            .push(ConstantBinding::float("envmapStrength", strength));
        let strength_index = export.context.bind_constants.len() - 1;

        if let Some(color_node) = world.graph.linked_producer(node.id, 0) {
            self.parse_color(world, color_node, export, strength_index)?;
        }

        // Cache the raw color default plus the resolved strength (a sky
        // color source rescales the constant, so read it back).
        export.cache.color = node
            .input_value(0)
            .and_then(SocketValue::as_color)
            .unwrap_or([0.0, 0.0, 0.0, 1.0]);
        export.cache.strength = export
            .context
            .bind_constants
            .get(strength_index)
            .and_then(|c| c.float)
            .unwrap_or(strength);
        Ok(())
    }

    fn parse_color(
        &mut self,
        world: &World,
        node: &Node,
        export: &mut WorldExport,
        strength_index: usize,
    ) -> Result<(), ExportError> {
        match &node.kind {
            NodeKind::EnvironmentTexture { image } => {
                let Some(image) = image else { return Ok(()) };
                let outcome =
                    resolver::resolve(image, true, self.paths, self.assets, self.encoder)?;
                let resolved = match outcome {
                    ImageOutcome::Resolved(resolved) => resolved,
                    ImageOutcome::Missing { path } => {
                        tracing::warn!(
                            world = %world.name,
                            path = %path.display(),
                            "unable to open environment texture"
                        );
                        export.warnings.push(format!(
                            "{} - unable to open {}",
                            world.name,
                            path.display()
                        ));
                        return Ok(());
                    }
                };

                export
                    .context
                    .bind_textures
                    .push(TextureBinding::envmap(&resolved.file));

                export.cache.texture_name = Some(resolved.file.clone());
                let (stem, _) = split_extension(&resolved.file);
                export.cache.irradiance_name = Some(stem.to_string());

                let force_ldr = resolved.format.is_ldr();
                let requested = if export.cache.mip_count == 0 {
                    self.settings.default_mip_count
                } else {
                    export.cache.mip_count
                };
                export.cache.mip_count = self.probes.generate_from_file(
                    &resolved.path,
                    force_ldr,
                    requested,
                    self.settings.generate_radiance,
                )?;

                self.features.push(features::ENV_TEX);
                if force_ldr {
                    self.features.push(features::ENV_LDR);
                }
                if self.settings.generate_irradiance && self.settings.generate_radiance {
                    self.features.push(features::RADIANCE);
                }
            }

            NodeKind::ImageTexture { image } => {
                let Some(image) = image else { return Ok(()) };
                self.features.push(features::ENV_IMG);

                // Unlike the environment texture path, the source is not
                // checked for existence here.
                let outcome =
                    resolver::resolve(image, false, self.paths, self.assets, self.encoder)?;
                if let ImageOutcome::Resolved(resolved) = outcome {
                    export
                        .context
                        .bind_textures
                        .push(TextureBinding::envmap(&resolved.file));
                }
            }

            NodeKind::SkyTexture {
                sun_direction,
                turbidity,
                ground_albedo,
            } => {
                // Match the reference renderer's sky normalization.
                if let Some(constant) = export.context.bind_constants.get_mut(strength_index) {
                    if let Some(value) = constant.float.as_mut() {
                        *value *= 0.1;
                    }
                }

                self.features.push(features::ENV_SKY);

                let mut sun = *sun_direction;
                sun[1] = -sun[1]; // fix Y orientation
                export
                    .context
                    .bind_constants
                    .push(ConstantBinding::vec3("sunDirection", sun));

                export.cache.sun_direction = Some(sun);
                export.cache.turbidity = Some(*turbidity);
                export.cache.ground_albedo = Some(*ground_albedo);
                export.cache.irradiance_name = Some(world.name.clone());
                self.probes.generate_sky(&world.name)?;

                if self.settings.generate_radiance_sky
                    && self.settings.generate_radiance
                    && self.settings.generate_irradiance
                {
                    self.features.push(features::RADIANCE);

                    let preset_dir = self
                        .settings
                        .sky_assets_dir
                        .join(self.settings.sky_model.asset_dir());
                    self.assets.add(preset_dir.join("hosek_radiance.hdr"));
                    for i in 0..8 {
                        self.assets
                            .add(preset_dir.join(format!("hosek_radiance_{i}.hdr")));
                    }

                    export.cache.texture_name = Some("hosek".to_string());
                    export.cache.mip_count = 8;
                }
            }

            // Anything else is not a color source this pipeline knows;
            // ignore it rather than failing the world.
            NodeKind::WorldOutput | NodeKind::Background | NodeKind::Unknown(_) => {
                tracing::debug!(
                    world = %world.name,
                    kind = node.kind.tag(),
                    "ignoring unrecognized color source"
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{temp_project, RecordingProbes, StubEncoder, TempProject};
    use aurora_world_graph::ImageReference;
    use std::fs;

    struct Fixture {
        project: TempProject,
        settings: BuildSettings,
        assets: AssetTracker,
        probes: RecordingProbes,
        encoder: StubEncoder,
        features: FeatureSet,
    }

    impl Fixture {
        fn new(tag: &str) -> Self {
            let project = temp_project(tag);
            let mut settings = BuildSettings::default();
            settings.sky_assets_dir = project.root.join("sky_assets");
            Self {
                project,
                settings,
                assets: AssetTracker::new(),
                probes: RecordingProbes::new(6),
                encoder: StubEncoder::new(),
                features: FeatureSet::new(),
            }
        }

        fn export(&mut self, world: &World) -> WorldExport {
            let mut traversal = WorldTraversal::new(
                &self.settings,
                &self.project.paths,
                &mut self.assets,
                &mut self.probes,
                &self.encoder,
                &mut self.features,
            );
            traversal.export(world).unwrap()
        }
    }

    fn world_with_background(name: &str, strength: f32) -> (World, aurora_world_graph::NodeId) {
        let mut graph = NodeGraph::new(name);
        let output = graph.add_node(Node::world_output());
        let background = graph.add_node(Node::background([0.2, 0.3, 0.4, 1.0], strength));
        graph.connect(background, 0, output, 0).unwrap();
        (World::new(name, graph), background)
    }

    fn attach_color_source(world: &mut World, background: aurora_world_graph::NodeId, node: Node) {
        let source = world.graph.add_node(node);
        world.graph.connect(source, 0, background, 0).unwrap();
    }

    #[test]
    fn test_unlinked_output_yields_empty_export() {
        let mut graph = NodeGraph::new("Void");
        graph.add_node(Node::world_output());
        let world = World::new("Void", graph);

        let mut fx = Fixture::new("unlinked_output");
        let export = fx.export(&world);
        assert!(export.context.bind_constants.is_empty());
        assert!(export.context.bind_textures.is_empty());
        assert!(fx.features.is_empty());
    }

    #[test]
    fn test_strength_constant_without_color_source() {
        let (world, _) = world_with_background("Plain", 1.5);
        let mut fx = Fixture::new("strength_only");
        let export = fx.export(&world);

        assert_eq!(
            export.context.bind_constants,
            vec![ConstantBinding::float("envmapStrength", 1.5)]
        );
        assert!(export.context.bind_textures.is_empty());
        assert_eq!(export.cache.color, [0.2, 0.3, 0.4, 1.0]);
        assert_eq!(export.cache.strength, 1.5);
        // Irradiance define is appended even without a color source.
        assert_eq!(fx.features.tokens(), &["_Irr".to_string()]);
    }

    #[test]
    fn test_environment_texture_end_to_end() {
        let (mut world, background) = world_with_background("Outdoor", 1.0);
        let mut fx = Fixture::new("envtex_hdr");
        let src = fx.project.root.join("sky.hdr");
        fs::write(&src, b"radiance").unwrap();
        attach_color_source(
            &mut world,
            background,
            Node::environment_texture(Some(ImageReference::file(&src))),
        );

        let export = fx.export(&world);

        assert_eq!(
            export.context.bind_textures,
            vec![TextureBinding::envmap("sky.hdr")]
        );
        assert_eq!(export.cache.texture_name.as_deref(), Some("sky.hdr"));
        assert_eq!(export.cache.irradiance_name.as_deref(), Some("sky"));
        // No conversion for an hdr source.
        assert_eq!(fx.encoder.calls(), 0);
        // Probe requested the settings default, world persisted the result.
        assert_eq!(fx.probes.files.len(), 1);
        let (path, force_ldr, requested, want_radiance) = fx.probes.files[0].clone();
        assert_eq!(path, src);
        assert!(!force_ldr);
        assert_eq!(requested, BuildSettings::default().default_mip_count);
        assert!(want_radiance);
        assert_eq!(export.cache.mip_count, 6);
        // Token order is a contract: _Irr, _EnvTex, _Rad.
        assert_eq!(
            fx.features.tokens(),
            &["_Irr".to_string(), "_EnvTex".to_string(), "_Rad".to_string()]
        );
    }

    #[test]
    fn test_jpg_environment_is_ldr() {
        let (mut world, background) = world_with_background("Ldr", 1.0);
        let mut fx = Fixture::new("envtex_jpg");
        let src = fx.project.root.join("sky.jpg");
        fs::write(&src, b"jfif").unwrap();
        attach_color_source(
            &mut world,
            background,
            Node::environment_texture(Some(ImageReference::file(&src))),
        );

        fx.export(&world);
        assert!(fx.probes.files[0].1, "probe should be forced to LDR");
        assert_eq!(
            fx.features.tokens(),
            &[
                "_Irr".to_string(),
                "_EnvTex".to_string(),
                "_EnvLDR".to_string(),
                "_Rad".to_string()
            ]
        );
    }

    #[test]
    fn test_cached_mip_count_is_rerequested() {
        let (mut world, background) = world_with_background("Mips", 1.0);
        let mut fx = Fixture::new("envtex_mips");
        let src = fx.project.root.join("sky.hdr");
        fs::write(&src, b"radiance").unwrap();
        attach_color_source(
            &mut world,
            background,
            Node::environment_texture(Some(ImageReference::file(&src))),
        );
        world.cache.mip_count = 4;

        let export = fx.export(&world);
        assert_eq!(fx.probes.files[0].2, 4);
        assert_eq!(export.cache.mip_count, 6);
    }

    #[test]
    fn test_missing_environment_texture_warns_and_keeps_strength() {
        let (mut world, background) = world_with_background("Broken", 2.0);
        let mut fx = Fixture::new("envtex_missing");
        attach_color_source(
            &mut world,
            background,
            Node::environment_texture(Some(ImageReference::file(
                fx.project.root.join("gone.hdr"),
            ))),
        );

        let export = fx.export(&world);
        assert_eq!(export.warnings.len(), 1);
        assert!(export.context.bind_textures.is_empty());
        // The strength constant from the surface stage still stands.
        assert_eq!(
            export.context.bind_constants,
            vec![ConstantBinding::float("envmapStrength", 2.0)]
        );
        assert!(!fx.features.contains(features::ENV_TEX));
        assert!(fx.probes.files.is_empty());
    }

    #[test]
    fn test_static_image_skips_validation_and_conversion() {
        let (mut world, background) = world_with_background("Billboard", 1.0);
        let mut fx = Fixture::new("static_image");
        // Deliberately nonexistent: the static image path performs no
        // existence validation.
        attach_color_source(
            &mut world,
            background,
            Node::image_texture(Some(ImageReference::file(
                fx.project.root.join("city.png"),
            ))),
        );

        let export = fx.export(&world);
        assert_eq!(
            export.context.bind_textures,
            vec![TextureBinding::envmap("city.png")]
        );
        assert!(fx.features.contains(features::ENV_IMG));
        assert_eq!(fx.encoder.calls(), 0);
        assert!(fx.probes.files.is_empty());
    }

    #[test]
    fn test_sky_scales_strength_and_flips_sun_y() {
        let (mut world, background) = world_with_background("Dawn", 2.0);
        let mut fx = Fixture::new("sky");
        attach_color_source(
            &mut world,
            background,
            Node::sky([0.3, 0.5, 0.8], 2.4, 0.3),
        );

        let export = fx.export(&world);
        assert_eq!(
            export.context.bind_constants[0],
            ConstantBinding::float("envmapStrength", 2.0 * 0.1)
        );
        assert_eq!(
            export.context.bind_constants[1],
            ConstantBinding::vec3("sunDirection", [0.3, -0.5, 0.8])
        );
        assert_eq!(export.cache.strength, 2.0 * 0.1);
        assert_eq!(export.cache.sun_direction, Some([0.3, -0.5, 0.8]));
        assert_eq!(export.cache.turbidity, Some(2.4));
        assert_eq!(export.cache.ground_albedo, Some(0.3));
        assert_eq!(export.cache.irradiance_name.as_deref(), Some("Dawn"));
        assert_eq!(fx.probes.skies, vec!["Dawn".to_string()]);

        // Radiance preset assets: one base plus 8 indexed faces.
        assert_eq!(export.cache.texture_name.as_deref(), Some("hosek"));
        assert_eq!(export.cache.mip_count, 8);
        let preset: Vec<_> = fx
            .assets
            .assets()
            .iter()
            .filter(|p| p.to_string_lossy().contains("hosek"))
            .collect();
        assert_eq!(preset.len(), 9);
        assert!(preset[0].ends_with("hosek/hosek_radiance.hdr"));
        assert_eq!(
            fx.features.tokens(),
            &["_Irr".to_string(), "_EnvSky".to_string(), "_Rad".to_string()]
        );
    }

    #[test]
    fn test_sky_without_radiance_keeps_mip_count() {
        let (mut world, background) = world_with_background("Flat Sky", 1.0);
        let mut fx = Fixture::new("sky_no_rad");
        fx.settings.generate_radiance_sky = false;
        attach_color_source(&mut world, background, Node::sky([0.0, 1.0, 0.0], 2.0, 0.1));

        let export = fx.export(&world);
        assert_eq!(export.cache.texture_name, None);
        assert_eq!(export.cache.mip_count, 0);
        assert!(!fx.features.contains(features::RADIANCE));
    }

    #[test]
    fn test_unknown_color_source_is_ignored() {
        let (mut world, background) = world_with_background("Odd", 1.0);
        let mut fx = Fixture::new("unknown_source");
        attach_color_source(
            &mut world,
            background,
            Node::unknown(
                "gradient_texture",
                vec![],
                vec![aurora_world_graph::Socket::color(
                    "Color",
                    [1.0, 0.0, 0.0, 1.0],
                )],
            ),
        );

        let export = fx.export(&world);
        assert!(export.context.bind_textures.is_empty());
        assert_eq!(fx.features.tokens(), &["_Irr".to_string()]);
    }

    #[test]
    fn test_non_background_surface_is_skipped() {
        let mut graph = NodeGraph::new("Odd Surface");
        let output = graph.add_node(Node::world_output());
        let surface = graph.add_node(Node::unknown(
            "emission",
            vec![],
            vec![aurora_world_graph::Socket::color(
                "Emission",
                [1.0, 1.0, 1.0, 1.0],
            )],
        ));
        graph.connect(surface, 0, output, 0).unwrap();
        let world = World::new("Odd Surface", graph);

        let mut fx = Fixture::new("odd_surface");
        let export = fx.export(&world);
        assert!(export.context.bind_constants.is_empty());
        assert!(fx.features.is_empty());
    }
}
