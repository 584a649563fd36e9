// SPDX-License-Identifier: MIT OR Apache-2.0
//! Accumulated shader feature tokens.
//!
//! The concatenation of all tokens forms part of the shader variant name,
//! so token order is an observable contract of the build, not an
//! implementation detail.

use serde::{Deserialize, Serialize};

/// Environment texture bound
pub const ENV_TEX: &str = "_EnvTex";
/// Environment texture was down-converted to a non-HDR format
pub const ENV_LDR: &str = "_EnvLDR";
/// Static image background bound
pub const ENV_IMG: &str = "_EnvImg";
/// Procedural sky present
pub const ENV_SKY: &str = "_EnvSky";
/// Flat environment color fallback
pub const ENV_COL: &str = "_EnvCol";
/// Volumetric clouds enabled
pub const ENV_CLOUDS: &str = "_EnvClouds";
/// Irradiance data generated
pub const IRRADIANCE: &str = "_Irr";
/// Radiance mip chain generated
pub const RADIANCE: &str = "_Rad";
/// Voxel global illumination enabled
pub const VOXEL_GI: &str = "_VoxelGI";

/// Ordered, append-only collection of shader feature tokens.
///
/// One accumulator is owned by the build orchestrator and threaded
/// through every world's traversal; it is created fresh at build start.
/// Tokens are not deduplicated — each enabling condition must guard
/// against appending twice within one build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    tokens: Vec<String>,
}

impl FeatureSet {
    /// Create an empty feature set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a token.
    pub fn push(&mut self, token: &str) {
        self.tokens.push(token.to_string());
    }

    /// Whether a token has been appended.
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Tokens in append order.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Whether no tokens have been appended.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Deterministic concatenation of all tokens, used in variant names.
    pub fn concat(&self) -> String {
        self.tokens.concat()
    }
}
