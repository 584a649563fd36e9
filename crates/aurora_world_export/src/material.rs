// SPDX-License-Identifier: MIT OR Apache-2.0
//! Persisted material documents.
//!
//! One document is written per world once the build's feature set is
//! final: the shader variant name embeds every accumulated token, so a
//! document written earlier would reference a variant that is never
//! compiled.

use crate::assets::AssetTracker;
use crate::build::{BuildPaths, BuildSettings};
use crate::error::ExportError;
use crate::features::FeatureSet;
use crate::util::safe_filename;
use crate::world::WorldExport;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Root of the persisted material document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialDocument {
    /// Material data entries (one per world document)
    pub material_datas: Vec<MaterialData>,
}

/// One material data entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialData {
    /// Material name, derived from the sanitized world name
    pub name: String,
    /// Shader contexts
    pub contexts: Vec<ShaderContext>,
    /// Shader variant reference, `<variant>/<variant>`
    pub shader: String,
}

/// Flattened bindings for one shader context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShaderContext {
    /// Context name
    pub name: String,
    /// Ordered constant bindings
    pub bind_constants: Vec<ConstantBinding>,
    /// Ordered texture bindings
    pub bind_textures: Vec<TextureBinding>,
}

impl ShaderContext {
    /// The world shading context.
    pub fn world() -> Self {
        Self {
            name: "world".to_string(),
            bind_constants: Vec::new(),
            bind_textures: Vec::new(),
        }
    }
}

/// A named constant binding; exactly one of the value fields is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantBinding {
    /// Uniform name
    pub name: String,
    /// Scalar value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub float: Option<f32>,
    /// 3-component vector value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vec3: Option<[f32; 3]>,
}

impl ConstantBinding {
    /// A scalar constant.
    pub fn float(name: impl Into<String>, value: f32) -> Self {
        Self {
            name: name.into(),
            float: Some(value),
            vec3: None,
        }
    }

    /// A vec3 constant.
    pub fn vec3(name: impl Into<String>, value: [f32; 3]) -> Self {
        Self {
            name: name.into(),
            float: None,
            vec3: Some(value),
        }
    }
}

/// A named texture binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureBinding {
    /// Sampler name
    pub name: String,
    /// Horizontal addressing mode
    pub u_addressing: String,
    /// Vertical addressing mode
    pub v_addressing: String,
    /// Resolved file reference
    pub file: String,
}

impl TextureBinding {
    /// The environment map binding, clamped on both axes.
    pub fn envmap(file: impl Into<String>) -> Self {
        Self {
            name: "envmap".to_string(),
            u_addressing: "clamp".to_string(),
            v_addressing: "clamp".to_string(),
            file: file.into(),
        }
    }
}

/// Shader variant name for the accumulated feature set.
///
/// Must only be computed after all feature mutation for the build has
/// completed across all worlds.
pub fn shader_variant_name(features: &FeatureSet, settings: &BuildSettings) -> String {
    format!(
        "world{}{}",
        features.concat(),
        settings.render_path_defs.concat()
    )
}

/// Persist one world's export as a material document.
///
/// Registers the document with the asset tracker and records a shader
/// compile request for the variant name. Returns the document path.
pub fn write_world_document(
    export: &WorldExport,
    features: &FeatureSet,
    settings: &BuildSettings,
    paths: &BuildPaths,
    assets: &mut AssetTracker,
) -> Result<PathBuf, ExportError> {
    let variant = shader_variant_name(features, settings);
    let document = MaterialDocument {
        material_datas: vec![MaterialData {
            name: format!("{}_material", safe_filename(&export.world_name)),
            contexts: vec![export.context.clone()],
            shader: format!("{variant}/{variant}"),
        }],
    };
    assets.add_shader_variant("world", &variant);

    let dir = paths.materials_dir();
    fs::create_dir_all(&dir).map_err(|e| ExportError::io(&dir, e))?;
    let path = dir.join(format!("{}.json", document.material_datas[0].name));
    let text = serde_json::to_string_pretty(&document)?;
    fs::write(&path, text).map_err(|e| ExportError::io(&path, e))?;
    assets.add(&path);

    tracing::info!(
        world = %export.world_name,
        variant = %variant,
        path = %path.display(),
        "wrote world material document"
    );
    Ok(path)
}
