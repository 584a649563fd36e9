// SPDX-License-Identifier: MIT OR Apache-2.0
//! World-shader export pipeline.
//!
//! Resolves a world's shading node graph into a flattened material
//! document plus derived assets: converted textures, prefiltered
//! environment maps and irradiance data. Runs at build time only; the
//! output is static data consumed by the runtime.
//!
//! ## Pipeline
//!
//! 1. [`world::WorldTraversal`] walks the graph from the world output
//!    node down to a terminal color source, accumulating shader feature
//!    tokens ([`features::FeatureSet`]) and constant/texture bindings.
//! 2. [`resolver`] materializes image references (unpacking packed
//!    payloads, converting formats through an [`encode::ImageEncoder`]).
//! 3. A [`probes::ProbeGenerator`] produces irradiance/radiance data for
//!    the resolved environment source.
//! 4. [`build::build_worlds`] orchestrates all worlds of a build, applies
//!    global defines and fallbacks, and has [`material`] persist one
//!    document per world once the feature set is final. The shader
//!    variant name embeds every accumulated token, so documents are
//!    written only after all feature mutation has completed.

pub mod assets;
pub mod build;
pub mod encode;
pub mod error;
pub mod features;
pub mod material;
pub mod probes;
pub mod resolver;
pub mod util;
pub mod world;

pub use assets::AssetTracker;
pub use build::{build_worlds, BuildPaths, BuildReport, BuildSettings, SkyModel, WorldOutcome};
pub use error::ExportError;
pub use features::FeatureSet;
pub use material::{ConstantBinding, MaterialDocument, ShaderContext, TextureBinding};
pub use world::{World, WorldExport, WorldExportCache, WorldTraversal};

#[cfg(test)]
pub(crate) mod testutil;
