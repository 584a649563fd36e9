// SPDX-License-Identifier: MIT OR Apache-2.0
//! Image references attached to texture nodes.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A reference to an image used by a texture node.
///
/// The image either lives on disk at `path`, or its bytes are packed
/// inline with the project (`packed`). Packed images still carry a path;
/// the file name portion determines the name of any unpacked artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageReference {
    /// Source path of the image
    pub path: PathBuf,
    /// Inline payload for packed images
    pub packed: Option<Vec<u8>>,
}

impl ImageReference {
    /// Reference an image on disk.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            packed: None,
        }
    }

    /// Reference an image whose bytes are packed with the project.
    pub fn packed(path: impl Into<PathBuf>, data: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            packed: Some(data),
        }
    }

    /// Whether the image payload is packed inline.
    pub fn is_packed(&self) -> bool {
        self.packed.is_some()
    }

    /// Byte length of the packed payload, if any.
    ///
    /// Unpacked artifacts are considered stale when their on-disk size
    /// differs from this length. Content is not hashed, so a same-size
    /// edit of the payload is not detected.
    pub fn payload_len(&self) -> Option<u64> {
        self.packed.as_ref().map(|d| d.len() as u64)
    }

    /// File name portion of the source path.
    pub fn file_name(&self) -> Option<&str> {
        Path::new(&self.path).file_name().and_then(|n| n.to_str())
    }
}
