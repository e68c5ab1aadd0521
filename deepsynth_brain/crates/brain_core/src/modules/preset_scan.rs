use crate::modules::features::PatchFeatures;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Anything larger is assumed to be corrupt rather than a preset.
pub const MAX_PRESET_BYTES: u64 = 4 * 1024 * 1024;

const PRESET_EXTENSION: &str = "json";

#[derive(Debug, Error)]
pub enum PresetError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("file too large (possibly corrupted): {path} ({size} bytes)")]
    TooLarge { path: PathBuf, size: u64 },
    #[error("empty file: {0}")]
    Empty(PathBuf),
    #[error("invalid preset {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub fn load_preset(path: &Path) -> Result<PatchFeatures, PresetError> {
    let io_err = |source| PresetError::Io {
        path: path.to_path_buf(),
        source,
    };

    let size = std::fs::metadata(path).map_err(io_err)?.len();
    if size > MAX_PRESET_BYTES {
        return Err(PresetError::TooLarge {
            path: path.to_path_buf(),
            size,
        });
    }
    if size == 0 {
        return Err(PresetError::Empty(path.to_path_buf()));
    }

    let raw = std::fs::read_to_string(path).map_err(io_err)?;
    let mut features: PatchFeatures =
        serde_json::from_str(&raw).map_err(|source| PresetError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    if features.name.trim().is_empty() {
        features.name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
    }
    if features.category.trim().is_empty() {
        features.category = path
            .parent()
            .and_then(Path::file_name)
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
    }

    Ok(features)
}

/// Recursively loads every preset below `dir`. Unreadable entries are logged
/// and skipped.
pub fn scan_preset_dir(dir: &Path) -> Vec<(PathBuf, PatchFeatures)> {
    let mut out = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                log::warn!("skipping unreadable entry under {}: {e}", dir.display());
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_preset_file(entry.path()) {
            continue;
        }
        match load_preset(entry.path()) {
            Ok(features) => out.push((entry.path().to_path_buf(), features)),
            Err(e) => log::warn!("failed to extract preset: {e}"),
        }
    }
    out
}

fn is_preset_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(PRESET_EXTENSION))
}
