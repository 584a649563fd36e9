// SPDX-License-Identifier: MIT OR Apache-2.0
//! Environment probe generation.
//!
//! The traversal engine hands a resolved environment source (a color, a
//! file or a procedural sky) to a [`ProbeGenerator`] and persists whatever
//! mip count comes back: the generator may reduce the requested count when
//! the source resolution cannot support it.

use crate::error::ExportError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Produces irradiance and radiance data for a world's environment.
pub trait ProbeGenerator {
    /// Generate irradiance for a flat environment color.
    fn generate_from_color(&mut self, world_name: &str, color: [f32; 4]) -> Result<(), ExportError>;

    /// Generate irradiance (and optionally a radiance mip chain) from a
    /// resolved environment file. Returns the mip count actually produced,
    /// which may be lower than requested.
    fn generate_from_file(
        &mut self,
        path: &Path,
        force_ldr: bool,
        requested_mips: u32,
        want_radiance: bool,
    ) -> Result<u32, ExportError>;

    /// Generate irradiance for a procedural sky.
    fn generate_sky(&mut self, world_name: &str) -> Result<(), ExportError>;
}

/// Persisted irradiance document: 9 spherical-harmonic coefficients, RGB
/// interleaved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IrradianceDocument {
    /// 27 floats, band 0 first
    pub irradiance: Vec<f32>,
}

/// Minimal probe generator.
///
/// Reads the source with the `image` crate to cap the mip chain at what
/// the resolution supports and to derive a flat irradiance estimate from
/// the mean source color. Proper prefiltering is a concern of heavier
/// tooling; documents written here share the on-disk shape the runtime
/// expects.
#[derive(Debug, Clone)]
pub struct IrradianceBaker {
    out_dir: PathBuf,
}

impl IrradianceBaker {
    /// Bake irradiance documents into the given directory.
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    fn write_document(&self, name: &str, band0: [f32; 3]) -> Result<(), ExportError> {
        let mut coefficients = vec![0.0f32; 27];
        coefficients[..3].copy_from_slice(&band0);
        let doc = IrradianceDocument {
            irradiance: coefficients,
        };

        fs::create_dir_all(&self.out_dir).map_err(|e| ExportError::io(&self.out_dir, e))?;
        let path = self
            .out_dir
            .join(format!("{}_irradiance.json", crate::util::safe_filename(name)));
        let text = serde_json::to_string(&doc)?;
        fs::write(&path, text).map_err(|e| ExportError::io(&path, e))?;
        tracing::debug!(path = %path.display(), "wrote irradiance document");
        Ok(())
    }
}

/// Largest mip chain a source of the given dimensions supports.
fn supported_mips(width: u32, height: u32) -> u32 {
    let extent = width.max(height).max(1);
    // floor(log2(extent)) + 1 levels down to 1x1
    u32::BITS - extent.leading_zeros()
}

impl ProbeGenerator for IrradianceBaker {
    fn generate_from_color(&mut self, world_name: &str, color: [f32; 4]) -> Result<(), ExportError> {
        self.write_document(world_name, [color[0], color[1], color[2]])
    }

    fn generate_from_file(
        &mut self,
        path: &Path,
        force_ldr: bool,
        requested_mips: u32,
        want_radiance: bool,
    ) -> Result<u32, ExportError> {
        let img = image::open(path).map_err(|e| ExportError::Probe {
            target: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let rgb = img.to_rgb32f();
        let (width, height) = rgb.dimensions();

        let mips = requested_mips.min(supported_mips(width, height));
        tracing::debug!(
            path = %path.display(),
            force_ldr,
            requested_mips,
            want_radiance,
            mips,
            "prefiltering environment"
        );

        let mut mean = [0.0f32; 3];
        for pixel in rgb.pixels() {
            mean[0] += pixel.0[0];
            mean[1] += pixel.0[1];
            mean[2] += pixel.0[2];
        }
        let count = (width as f32 * height as f32).max(1.0);
        for channel in &mut mean {
            *channel /= count;
        }

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("envmap");
        self.write_document(stem, mean)?;
        Ok(mips)
    }

    fn generate_sky(&mut self, world_name: &str) -> Result<(), ExportError> {
        // Sky irradiance comes from preset data at runtime; the document
        // only reserves the lookup name.
        self.write_document(world_name, [0.0, 0.0, 0.0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::temp_project;

    #[test]
    fn test_supported_mips() {
        assert_eq!(supported_mips(1, 1), 1);
        assert_eq!(supported_mips(2, 2), 2);
        assert_eq!(supported_mips(1024, 512), 11);
    }

    #[test]
    fn test_file_probe_caps_mips_and_averages() {
        let project = temp_project("baker_file");
        let src = project.root.join("env.png");
        let mut img = image::RgbImage::new(4, 4);
        for pixel in img.pixels_mut() {
            *pixel = image::Rgb([255, 0, 0]);
        }
        img.save(&src).unwrap();

        let mut baker = IrradianceBaker::new(project.root.join("envmaps"));
        let mips = baker.generate_from_file(&src, false, 10, true).unwrap();
        assert_eq!(mips, 3);

        let doc: IrradianceDocument = serde_json::from_str(
            &fs::read_to_string(project.root.join("envmaps/env_irradiance.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(doc.irradiance.len(), 27);
        assert!(doc.irradiance[0] > 0.9);
        assert!(doc.irradiance[1] < 0.1);
    }

    #[test]
    fn test_color_probe_writes_document() {
        let project = temp_project("baker_color");
        let mut baker = IrradianceBaker::new(project.root.join("envmaps"));
        baker
            .generate_from_color("Outdoor World", [0.25, 0.5, 0.75, 1.0])
            .unwrap();

        let doc: IrradianceDocument = serde_json::from_str(
            &fs::read_to_string(project.root.join("envmaps/Outdoor_World_irradiance.json"))
                .unwrap(),
        )
        .unwrap();
        assert_eq!(&doc.irradiance[..3], &[0.25, 0.5, 0.75]);
    }
}
