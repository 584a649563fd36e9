// SPDX-License-Identifier: MIT OR Apache-2.0
//! External image conversion.

use crate::error::ExportError;
use crate::resolver::TargetFormat;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Converts a source image into a target format on disk.
///
/// Conversion is treated as a blocking call with no timeout or retry. A
/// failure is a hard error for the image being resolved: continuing with
/// a missing converted file would break the runtime shader lookup later,
/// long after the build reported success.
pub trait ImageEncoder {
    /// Convert `src` into `dest`, producing the given target format.
    fn encode(&self, src: &Path, dest: &Path, format: TargetFormat) -> Result<(), ExportError>;
}

/// Encoder backed by an external command-line tool.
///
/// The tool is invoked as `<program> <src> <dest>`; the destination
/// extension carries the target format, which is how the stock
/// ImageMagick-style converters select their output codec.
#[derive(Debug, Clone)]
pub struct CommandEncoder {
    program: PathBuf,
}

impl CommandEncoder {
    /// Use the given conversion program.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl ImageEncoder for CommandEncoder {
    fn encode(&self, src: &Path, dest: &Path, format: TargetFormat) -> Result<(), ExportError> {
        tracing::debug!(
            src = %src.display(),
            dest = %dest.display(),
            ?format,
            "converting image"
        );

        let status = Command::new(&self.program)
            .arg(src)
            .arg(dest)
            .status()
            .map_err(|e| ExportError::Encode {
                src: src.to_path_buf(),
                dest: dest.to_path_buf(),
                reason: format!("failed to run {}: {e}", self.program.display()),
            })?;

        if !status.success() {
            return Err(ExportError::Encode {
                src: src.to_path_buf(),
                dest: dest.to_path_buf(),
                reason: format!("{} exited with {status}", self.program.display()),
            });
        }
        Ok(())
    }
}
