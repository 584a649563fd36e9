// SPDX-License-Identifier: MIT OR Apache-2.0
//! Build-wide asset registries.

use std::path::{Path, PathBuf};

/// Append-only registries consumed by the packager at the end of a build.
///
/// The export pipeline only writes to these; nothing here is read back
/// during traversal. `add` suppresses duplicate paths so an asset shared
/// by several worlds is packaged once; the other registries preserve
/// whatever the callers append.
#[derive(Debug, Default)]
pub struct AssetTracker {
    assets: Vec<PathBuf>,
    embedded: Vec<String>,
    shader_variants: Vec<(String, String)>,
    build_defines: Vec<String>,
}

impl AssetTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file to be packaged.
    pub fn add(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !self.assets.contains(&path) {
            self.assets.push(path);
        }
    }

    /// Register a name to be embedded directly into the runtime binary.
    pub fn add_embedded(&mut self, name: impl Into<String>) {
        self.embedded.push(name.into());
    }

    /// Request compilation of a shader variant in the given directory.
    pub fn add_shader_variant(&mut self, dir: impl Into<String>, name: impl Into<String>) {
        self.shader_variants.push((dir.into(), name.into()));
    }

    /// Register a define for the runtime build.
    pub fn add_build_define(&mut self, name: impl Into<String>) {
        self.build_defines.push(name.into());
    }

    /// Registered files, in registration order.
    pub fn assets(&self) -> &[PathBuf] {
        &self.assets
    }

    /// Whether a file has been registered.
    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.assets.iter().any(|p| p == path.as_ref())
    }

    /// Registered embedded names.
    pub fn embedded(&self) -> &[String] {
        &self.embedded
    }

    /// Requested shader variants as `(dir, name)` pairs.
    pub fn shader_variants(&self) -> &[(String, String)] {
        &self.shader_variants
    }

    /// Registered build defines.
    pub fn build_defines(&self) -> &[String] {
        &self.build_defines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_deduplicates() {
        let mut tracker = AssetTracker::new();
        tracker.add("a/sky.hdr");
        tracker.add("b/ground.jpg");
        tracker.add("a/sky.hdr");
        assert_eq!(tracker.assets().len(), 2);
        assert!(tracker.contains("a/sky.hdr"));
    }

    #[test]
    fn test_registries_preserve_order() {
        let mut tracker = AssetTracker::new();
        tracker.add_shader_variant("world", "world_EnvTex");
        tracker.add_shader_variant("world", "world_EnvCol");
        tracker.add_build_define("aurora_voxelgi");
        assert_eq!(
            tracker.shader_variants(),
            &[
                ("world".to_string(), "world_EnvTex".to_string()),
                ("world".to_string(), "world_EnvCol".to_string()),
            ]
        );
        assert_eq!(tracker.build_defines(), &["aurora_voxelgi".to_string()]);
    }
}
