use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Reasons a run cannot start. The controller stays idle in every case.
#[derive(Debug, Error)]
pub enum StartError {
    #[error("please choose a source folder")]
    MissingSource,

    #[error("please choose a destination folder")]
    MissingDestination,

    #[error("invalid duration value: {0:?}")]
    InvalidThreshold(String),

    #[error("duration must not be negative: {0}")]
    NegativeThreshold(f64),

    #[error("a run is already in progress")]
    AlreadyRunning,

    #[error("failed to start worker thread: {0}")]
    Spawn(#[from] io::Error),
}

/// 一次執行的參數，執行期間不會改變
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub source_root: PathBuf,
    pub dest_root: PathBuf,
    pub max_duration_seconds: f64,
}

impl Job {
    /// 驗證使用者輸入並建立 Job
    pub fn parse(source: &str, destination: &str, max_duration: &str) -> Result<Self, StartError> {
        let source = source.trim();
        if source.is_empty() {
            return Err(StartError::MissingSource);
        }

        let destination = destination.trim();
        if destination.is_empty() {
            return Err(StartError::MissingDestination);
        }

        let max_duration_seconds = parse_max_duration(max_duration)?;

        Ok(Self {
            source_root: PathBuf::from(source),
            dest_root: PathBuf::from(destination),
            max_duration_seconds,
        })
    }
}

/// 解析最大時長（秒），必須是有限且非負的數值
pub fn parse_max_duration(raw: &str) -> Result<f64, StartError> {
    let trimmed = raw.trim();
    let value = trimmed
        .parse::<f64>()
        .map_err(|_| StartError::InvalidThreshold(trimmed.to_string()))?;

    if !value.is_finite() {
        return Err(StartError::InvalidThreshold(trimmed.to_string()));
    }
    if value < 0.0 {
        return Err(StartError::NegativeThreshold(value));
    }
    Ok(value)
}
