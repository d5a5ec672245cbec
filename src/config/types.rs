use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// 預設最大影片長度（秒）
pub const DEFAULT_MAX_DURATION_SECONDS: f64 = 60.0;

/// 預設日誌資料夾（相對於目前工作目錄）
pub const DEFAULT_LOG_DIRECTORY: &str = "logs";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileTypeTable {
    #[serde(rename = "VIDEO_FILE")]
    pub video_file: Vec<String>,
}

impl FileTypeTable {
    #[must_use]
    pub fn video_extensions_set(&self) -> HashSet<String> {
        self.video_file
            .iter()
            .map(|ext| ext.to_lowercase())
            .collect()
    }

    #[must_use]
    pub fn is_video_file(&self, path: &Path) -> bool {
        let video_extensions = self.video_extensions_set();
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| video_extensions.contains(&format!(".{}", ext.to_lowercase())))
    }
}

/// 每次執行的預設值，可由環境變數覆寫
#[derive(Debug, Clone, PartialEq)]
pub struct RunDefaults {
    pub max_duration_seconds: f64,
    pub log_directory: PathBuf,
}

impl Default for RunDefaults {
    fn default() -> Self {
        Self {
            max_duration_seconds: DEFAULT_MAX_DURATION_SECONDS,
            log_directory: PathBuf::from(DEFAULT_LOG_DIRECTORY),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub file_type_table: FileTypeTable,
    pub defaults: RunDefaults,
}
