// SPDX-License-Identifier: MIT OR Apache-2.0
//! Small path and name helpers shared across the pipeline.

/// Sanitize a name for use as a file name.
///
/// Keeps ASCII alphanumerics, `.`, `_` and `-`; everything else becomes
/// `_`. Output names feed into asset paths and shader lookups, so the
/// mapping must be deterministic.
pub fn safe_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Split a file name into stem and lowercased extension.
///
/// A name without a dot yields an empty extension.
pub fn split_extension(file: &str) -> (&str, String) {
    match file.rsplit_once('.') {
        Some((stem, ext)) => (stem, ext.to_ascii_lowercase()),
        None => (file, String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_filename() {
        assert_eq!(safe_filename("sky.hdr"), "sky.hdr");
        assert_eq!(safe_filename("outdoor scene (day).exr"), "outdoor_scene__day_.exr");
        assert_eq!(safe_filename("café/env"), "caf__env");
    }

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("sky.HDR"), ("sky", "hdr".to_string()));
        assert_eq!(split_extension("env.map.exr"), ("env.map", "exr".to_string()));
        assert_eq!(split_extension("noext"), ("noext", String::new()));
    }
}
