// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shared fixtures for the pipeline tests.

use crate::build::BuildPaths;
use crate::encode::ImageEncoder;
use crate::error::ExportError;
use crate::probes::ProbeGenerator;
use crate::resolver::TargetFormat;
use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};

/// A throwaway project directory with the standard build layout.
pub struct TempProject {
    /// Project root on disk
    pub root: PathBuf,
    /// Build paths rooted at `root`
    pub paths: BuildPaths,
}

/// Create a unique temporary project directory.
pub fn temp_project(tag: &str) -> TempProject {
    let root = std::env::temp_dir().join(format!("aurora_world_{tag}_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&root).unwrap();
    let paths = BuildPaths::new(&root);
    TempProject { root, paths }
}

/// Encoder that fakes a conversion by writing a marker file.
pub struct StubEncoder {
    calls: Cell<usize>,
}

impl StubEncoder {
    /// New stub with zero recorded calls.
    pub fn new() -> Self {
        Self {
            calls: Cell::new(0),
        }
    }

    /// Number of conversions performed.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl ImageEncoder for StubEncoder {
    fn encode(&self, _src: &Path, dest: &Path, _format: TargetFormat) -> Result<(), ExportError> {
        self.calls.set(self.calls.get() + 1);
        fs::write(dest, b"converted").map_err(|e| ExportError::io(dest, e))
    }
}

/// Encoder that always fails, for hard-error paths.
pub struct FailingEncoder;

impl ImageEncoder for FailingEncoder {
    fn encode(&self, src: &Path, dest: &Path, _format: TargetFormat) -> Result<(), ExportError> {
        Err(ExportError::Encode {
            src: src.to_path_buf(),
            dest: dest.to_path_buf(),
            reason: "stubbed failure".to_string(),
        })
    }
}

/// Probe generator that records every call instead of filtering.
pub struct RecordingProbes {
    /// `(world, color)` pairs from flat-color generation
    pub colors: Vec<(String, [f32; 4])>,
    /// `(path, force_ldr, requested_mips, want_radiance)` from file generation
    pub files: Vec<(PathBuf, bool, u32, bool)>,
    /// World names from sky generation
    pub skies: Vec<String>,
    mips: u32,
}

impl RecordingProbes {
    /// Record calls, answering file generation with the given mip count.
    pub fn new(mips: u32) -> Self {
        Self {
            colors: Vec::new(),
            files: Vec::new(),
            skies: Vec::new(),
            mips,
        }
    }
}

impl ProbeGenerator for RecordingProbes {
    fn generate_from_color(&mut self, world_name: &str, color: [f32; 4]) -> Result<(), ExportError> {
        self.colors.push((world_name.to_string(), color));
        Ok(())
    }

    fn generate_from_file(
        &mut self,
        path: &Path,
        force_ldr: bool,
        requested_mips: u32,
        want_radiance: bool,
    ) -> Result<u32, ExportError> {
        self.files
            .push((path.to_path_buf(), force_ldr, requested_mips, want_radiance));
        Ok(self.mips)
    }

    fn generate_sky(&mut self, world_name: &str) -> Result<(), ExportError> {
        self.skies.push(world_name.to_string());
        Ok(())
    }
}
