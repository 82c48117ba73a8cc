//! Failure snapshots
//!
//! When a scenario fails the runner stores a PNG of the page next to the
//! report. The file is read back to record its dimensions and a SHA-256
//! digest, so a report entry can be matched to the image it describes.

use image::GenericImageView;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::E2eResult;

/// A stored snapshot as it appears in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotInfo {
    pub path: PathBuf,
    pub sha256: String,
    pub width: u32,
    pub height: u32,
    pub size_bytes: u64,
}

/// File name for a scenario's snapshot, keeping only `[A-Za-z0-9_-]`
pub fn snapshot_file_name(scenario: &str) -> String {
    let stem: String = scenario
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}.png", stem)
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Write `png` under `dir` and describe the stored file
pub fn save_snapshot(dir: &Path, scenario: &str, png: &[u8]) -> E2eResult<SnapshotInfo> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(snapshot_file_name(scenario));
    std::fs::write(&path, png)?;

    let stored = std::fs::read(&path)?;
    let (width, height) = image::load_from_memory(&stored)?.dimensions();

    let info = SnapshotInfo {
        sha256: sha256_hex(&stored),
        width,
        height,
        size_bytes: stored.len() as u64,
        path,
    };
    debug!(
        "Snapshot {} ({}x{}, sha256 {})",
        info.path.display(),
        info.width,
        info.height,
        info.sha256
    );
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::E2eError;
    use image::{DynamicImage, ImageOutputFormat, RgbaImage};
    use std::io::Cursor;
    use tempfile::TempDir;
    use test_case::test_case;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(RgbaImage::new(width, height))
            .write_to(&mut buf, ImageOutputFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test_case("sort-persistence", "sort-persistence.png")]
    #[test_case("cart add/remove", "cart_add_remove.png")]
    #[test_case("../escape", "___escape.png")]
    fn file_names_are_sanitized(scenario: &str, expected: &str) {
        assert_eq!(snapshot_file_name(scenario), expected);
    }

    #[test]
    fn saved_snapshot_reports_dimensions_and_digest() {
        let dir = TempDir::new().unwrap();
        let bytes = png(64, 32);

        let info = save_snapshot(dir.path(), "auth-login-logout", &bytes).unwrap();
        assert_eq!((info.width, info.height), (64, 32));
        assert_eq!(info.size_bytes, bytes.len() as u64);
        assert_eq!(info.sha256.len(), 64);
        assert_eq!(info.sha256, sha256_hex(&bytes));
        assert!(info.path.exists());
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let dir = TempDir::new().unwrap();
        let err = save_snapshot(dir.path(), "broken", b"not a png").unwrap_err();
        assert!(matches!(err, E2eError::Image(_)));
    }
}
