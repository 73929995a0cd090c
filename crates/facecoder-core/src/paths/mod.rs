//! Path utilities for facecoder data directories.
//!
//! Resolution order for the data root:
//! 1. `FACECODER_DATA_DIR` environment variable (highest priority)
//! 2. System data directory (e.g., `~/.local/share/facecoder`)

mod error;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub use error::PathError;

/// Environment variable overriding the data root.
pub const DATA_DIR_ENV: &str = "FACECODER_DATA_DIR";

/// Get the root directory for application data.
pub fn data_root() -> Result<PathBuf, PathError> {
    if let Some(path) = env::var_os(DATA_DIR_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }

    let data_dir = dirs::data_local_dir().ok_or(PathError::NoDataDir)?;
    let root = data_dir.join("facecoder");
    ensure_dir(&root)?;
    Ok(root)
}

/// Get the path to the facecoder database file.
///
/// The `data/` subdirectory is created if it doesn't exist.
pub fn database_path() -> Result<PathBuf, PathError> {
    let data_dir = data_root()?.join("data");
    ensure_dir(&data_dir)?;
    Ok(data_dir.join("facecoder.db"))
}

fn ensure_dir(path: &Path) -> Result<(), PathError> {
    fs::create_dir_all(path).map_err(|source| PathError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}
