// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for the export pipeline.

use std::path::PathBuf;

/// Hard failures of the export pipeline.
///
/// Missing source images are deliberately not represented here: they are
/// warning outcomes (the texture binding is skipped and the build
/// continues). A failing external conversion tool, by contrast, is a hard
/// error per image, since a missing converted asset would silently break
/// the runtime shader lookup.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Filesystem operation failed
    #[error("i/o failure at {path}: {source}")]
    Io {
        /// Path involved in the failed operation
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// External image conversion tool failed
    #[error("image conversion failed for {src} -> {dest}: {reason}")]
    Encode {
        /// Source image
        src: PathBuf,
        /// Conversion destination
        dest: PathBuf,
        /// Tool failure description
        reason: String,
    },

    /// Probe generation failed
    #[error("probe generation failed for '{target}': {reason}")]
    Probe {
        /// World name or source file the probe was generated for
        target: String,
        /// Failure description
        reason: String,
    },

    /// Material document serialization failed
    #[error("failed to serialize material document: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Project file could not be loaded
    #[error("failed to load project file {path}: {reason}")]
    Project {
        /// Project file path
        path: PathBuf,
        /// Failure description
        reason: String,
    },
}

impl ExportError {
    /// Attach a path to an i/o error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
