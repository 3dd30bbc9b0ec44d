//! Random media selection for broadcasts
//!
//! Picks a random attachable file from the configured media directory.
//! A missing directory or an empty one simply yields no attachment; the
//! broadcast goes out text-only.

use std::path::{Path, PathBuf};

use rand::Rng;
use tracing::debug;

/// File extensions the platform accepts as attachments.
const MEDIA_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "mp4"];

/// Selects random media files from a directory.
#[derive(Debug, Clone)]
pub struct MediaPicker {
    dir: PathBuf,
}

impl MediaPicker {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Pick a random attachable file, or `None` when the directory is
    /// missing, unreadable, or holds no media.
    pub fn pick(&self, rng: &mut impl Rng) -> Option<PathBuf> {
        let entries = std::fs::read_dir(&self.dir).ok()?;
        let candidates: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| is_media_file(path))
            .collect();

        if candidates.is_empty() {
            return None;
        }
        let picked = candidates[rng.gen_range(0..candidates.len())].clone();
        debug!(path = %picked.display(), "Picked media file");
        Some(picked)
    }
}

fn is_media_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let lower = ext.to_lowercase();
            MEDIA_EXTENSIONS.contains(&lower.as_str())
        })
        .unwrap_or(false)
}
