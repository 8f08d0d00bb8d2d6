use std::path::PathBuf;

use crate::env::{parse_or, string_or};

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Local document storage settings.
#[derive(Clone, Debug)]
pub struct StorageConfig {
    /// Directory uploaded files are written to (`STORAGE_DIR`).
    pub base_dir: PathBuf,
    /// Public prefix for stored files (`STORAGE_BASE_URL`).
    pub base_url: String,
    /// Upload size cap in bytes (`MAX_UPLOAD_BYTES`).
    pub max_upload_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("storage/uploads"),
            base_url: "http://localhost:3000/files".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl StorageConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_dir: PathBuf::from(string_or("STORAGE_DIR", "storage/uploads")),
            base_url: string_or("STORAGE_BASE_URL", &defaults.base_url),
            max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", defaults.max_upload_bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StorageConfig::default();
        assert_eq!(config.base_dir, PathBuf::from("storage/uploads"));
        assert_eq!(config.max_upload_bytes, 10_485_760);
        assert!(config.base_url.ends_with("/files"));
    }
}
