use crate::config::types::{Config, FileTypeTable, RunDefaults};
use anyhow::{Context, Result};
use log::warn;
use std::env;
use std::path::PathBuf;

/// 編譯時嵌入的檔案類型設定（不需要外部檔案）
const FILE_TYPE_TABLE_JSON: &str = include_str!("../data/file_type_table.json");

pub const MAX_DURATION_ENV: &str = "SHORT_VIDEO_MOVER_MAX_DURATION";
pub const LOG_DIR_ENV: &str = "SHORT_VIDEO_MOVER_LOG_DIR";

impl Config {
    pub fn new() -> Result<Self> {
        let file_type_table = Self::load_embedded_file_type_table()?;
        let defaults = RunDefaults::from_lookup(|key| env::var(key).ok());

        Ok(Self {
            file_type_table,
            defaults,
        })
    }

    /// 從編譯時嵌入的 JSON 載入檔案類型表
    fn load_embedded_file_type_table() -> Result<FileTypeTable> {
        serde_json::from_str(FILE_TYPE_TABLE_JSON).context("failed to parse embedded file type table")
    }
}

impl RunDefaults {
    /// Builds the defaults, applying overrides returned by `lookup`.
    ///
    /// Invalid overrides are ignored and the built-in value is kept.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut defaults = Self::default();

        if let Some(raw) = lookup(MAX_DURATION_ENV) {
            match raw.trim().parse::<f64>() {
                Ok(value) if value.is_finite() && value >= 0.0 => {
                    defaults.max_duration_seconds = value;
                }
                _ => warn!("ignoring invalid {MAX_DURATION_ENV}: {raw}"),
            }
        }

        if let Some(raw) = lookup(LOG_DIR_ENV) {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                warn!("ignoring empty {LOG_DIR_ENV}");
            } else {
                defaults.log_directory = PathBuf::from(trimmed);
            }
        }

        defaults
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{DEFAULT_LOG_DIRECTORY, DEFAULT_MAX_DURATION_SECONDS};
    use std::path::Path;

    #[test]
    fn test_embedded_table_has_fixed_video_extensions() {
        let config = Config::new().unwrap();
        let set = config.file_type_table.video_extensions_set();
        for ext in [".mp4", ".avi", ".mkv", ".mov", ".wmv", ".flv", ".webm"] {
            assert!(set.contains(ext), "missing {ext}");
        }
        assert_eq!(set.len(), 7);
    }

    #[test]
    fn test_is_video_file_case_insensitive() {
        let table = Config::new().unwrap().file_type_table;
        assert!(table.is_video_file(Path::new("/a/clip.MP4")));
        assert!(table.is_video_file(Path::new("movie.WebM")));
        assert!(!table.is_video_file(Path::new("notes.txt")));
        assert!(!table.is_video_file(Path::new("no_extension")));
        assert!(!table.is_video_file(Path::new("archive.mp4.zip")));
    }

    #[test]
    fn test_defaults_without_overrides() {
        let defaults = RunDefaults::from_lookup(|_| None);
        assert_eq!(defaults.max_duration_seconds, DEFAULT_MAX_DURATION_SECONDS);
        assert_eq!(defaults.log_directory, PathBuf::from(DEFAULT_LOG_DIRECTORY));
    }

    #[test]
    fn test_defaults_with_overrides() {
        let defaults = RunDefaults::from_lookup(|key| match key {
            MAX_DURATION_ENV => Some("12.5".to_string()),
            LOG_DIR_ENV => Some("/tmp/mover-logs".to_string()),
            _ => None,
        });
        assert_eq!(defaults.max_duration_seconds, 12.5);
        assert_eq!(defaults.log_directory, PathBuf::from("/tmp/mover-logs"));
    }

    #[test]
    fn test_invalid_overrides_are_ignored() {
        let defaults = RunDefaults::from_lookup(|key| match key {
            MAX_DURATION_ENV => Some("-3".to_string()),
            LOG_DIR_ENV => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(defaults, RunDefaults::default());
    }
}
