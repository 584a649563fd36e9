// SPDX-License-Identifier: MIT OR Apache-2.0
//! Image asset resolution.
//!
//! Given an image reference from a texture node, determines the canonical
//! output file, unpacks packed payloads, converts formats where required
//! and registers the result with the asset tracker.

use crate::assets::AssetTracker;
use crate::build::BuildPaths;
use crate::encode::ImageEncoder;
use crate::error::ExportError;
use crate::util::{safe_filename, split_extension};
use aurora_world_graph::ImageReference;
use std::fs;
use std::path::PathBuf;

/// Target format of a resolved image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFormat {
    /// Radiance HDR
    Hdr,
    /// JPEG (low dynamic range)
    Jpeg,
}

impl TargetFormat {
    /// Whether this format loses the source's dynamic range.
    pub fn is_ldr(self) -> bool {
        matches!(self, Self::Jpeg)
    }
}

/// A successfully resolved image.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedImage {
    /// File name referenced by the material document
    pub file: String,
    /// On-disk location, used for probe generation
    pub path: PathBuf,
    /// Format of the resolved file
    pub format: TargetFormat,
    /// Whether a format conversion was performed (or reused from cache)
    pub converted: bool,
}

/// Outcome of resolving an image reference.
#[derive(Debug)]
pub enum ImageOutcome {
    /// The image was materialized or passed through
    Resolved(ResolvedImage),
    /// Source file absent and not packed; the caller decides whether to
    /// skip the texture binding. Not a hard failure.
    Missing {
        /// The absent source path
        path: PathBuf,
    },
}

/// Resolve an image reference to a build asset.
///
/// With `convert` set, sources that are neither `hdr` nor `jpg` are
/// converted (`exr` to `hdr`, anything else to `jpg`), and a non-packed
/// source that does not exist on disk yields [`ImageOutcome::Missing`].
/// Without `convert`, the image passes through untouched: packed payloads
/// are unpacked, on-disk files are registered as-is and the source is
/// never checked for existence.
///
/// Conversion artifacts are cached by destination path: an existing
/// destination is reused without content verification. Unpacked raw
/// payloads are rewritten when the destination size differs from the
/// payload length (best-effort staleness, not a hash).
pub fn resolve(
    image: &ImageReference,
    convert: bool,
    paths: &BuildPaths,
    assets: &mut AssetTracker,
    encoder: &dyn ImageEncoder,
) -> Result<ImageOutcome, ExportError> {
    let Some(name) = image.file_name() else {
        return Ok(ImageOutcome::Missing {
            path: image.path.clone(),
        });
    };
    let file = safe_filename(name);
    let (stem, ext) = split_extension(&file);

    let mut format = if ext == "hdr" {
        TargetFormat::Hdr
    } else {
        TargetFormat::Jpeg
    };
    let do_convert = convert && ext != "hdr" && ext != "jpg";
    let mut out_file = file.clone();
    if do_convert {
        if ext == "exr" {
            out_file = format!("{stem}.hdr");
            format = TargetFormat::Hdr;
        } else {
            out_file = format!("{stem}.jpg");
            format = TargetFormat::Jpeg;
        }
    }

    if convert && !image.is_packed() && !image.path.is_file() {
        return Ok(ImageOutcome::Missing {
            path: image.path.clone(),
        });
    }

    if let Some(data) = &image.packed {
        let unpack_dir = paths.unpacked_dir();
        fs::create_dir_all(&unpack_dir).map_err(|e| ExportError::io(&unpack_dir, e))?;
        let dest = unpack_dir.join(&out_file);

        if do_convert {
            // Conversion is assumed idempotent: an existing destination is
            // reused without looking at the source again.
            if !dest.is_file() {
                let staged = unpack_dir.join(&file);
                write_payload_if_stale(&staged, data)?;
                encoder.encode(&staged, &dest, format)?;
            }
        } else {
            write_payload_if_stale(&dest, data)?;
        }

        assets.add(&dest);
        Ok(ImageOutcome::Resolved(ResolvedImage {
            file: out_file,
            path: dest,
            format,
            converted: do_convert,
        }))
    } else if do_convert {
        let unpack_dir = paths.unpacked_dir();
        fs::create_dir_all(&unpack_dir).map_err(|e| ExportError::io(&unpack_dir, e))?;
        let dest = unpack_dir.join(&out_file);

        // TODO: invalidate the cached conversion when the source changes;
        // currently only absence of the destination triggers a convert.
        if !dest.is_file() {
            encoder.encode(&image.path, &dest, format)?;
        }

        assets.add(&dest);
        Ok(ImageOutcome::Resolved(ResolvedImage {
            file: out_file,
            path: dest,
            format,
            converted: true,
        }))
    } else {
        assets.add(&image.path);
        Ok(ImageOutcome::Resolved(ResolvedImage {
            file: out_file,
            path: image.path.clone(),
            format,
            converted: false,
        }))
    }
}

/// Write a packed payload unless the destination already matches its size.
fn write_payload_if_stale(dest: &std::path::Path, data: &[u8]) -> Result<(), ExportError> {
    let up_to_date = fs::metadata(dest)
        .map(|m| m.len() == data.len() as u64)
        .unwrap_or(false);
    if !up_to_date {
        fs::write(dest, data).map_err(|e| ExportError::io(dest, e))?;
    }
    Ok(())
}
