//! 執行紀錄
//!
//! 每次執行建立一個 [`RunLogger`]，每行紀錄會同時寫入所有的輸出端
//! （日誌檔、畫面），由呼叫端明確傳入，不使用全域狀態。

use super::path_validator::ensure_directory_exists;
use anyhow::{Context, Result};
use chrono::Local;
use log::{Level, warn};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

const LOG_FILE_PREFIX: &str = "short_video_mover";

/// A destination for run log lines.
pub trait LogSink: Send {
    fn write_line(&mut self, level: Level, message: &str) -> io::Result<()>;
}

#[derive(Default)]
pub struct RunLogger {
    sinks: Vec<Box<dyn LogSink>>,
    log_file: Option<PathBuf>,
}

impl RunLogger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_sink(mut self, sink: impl LogSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// 加入日誌檔輸出端，並記住檔案位置
    #[must_use]
    pub fn with_file_sink(mut self, sink: FileSink) -> Self {
        self.log_file = Some(sink.path().to_path_buf());
        self.sinks.push(Box::new(sink));
        self
    }

    #[must_use]
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    pub fn info(&mut self, message: impl AsRef<str>) {
        self.write(Level::Info, message.as_ref());
    }

    pub fn warn(&mut self, message: impl AsRef<str>) {
        self.write(Level::Warn, message.as_ref());
    }

    pub fn error(&mut self, message: impl AsRef<str>) {
        self.write(Level::Error, message.as_ref());
    }

    /// 寫入失敗的輸出端會被移除，不影響其他輸出端
    fn write(&mut self, level: Level, message: &str) {
        self.sinks
            .retain_mut(|sink| match sink.write_line(level, message) {
                Ok(()) => true,
                Err(e) => {
                    warn!("run log sink failed, disabling it: {e}");
                    false
                }
            });
    }
}

/// 每次執行一個日誌檔，檔名包含開始時間
pub struct FileSink {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl FileSink {
    pub fn create(log_directory: &Path) -> Result<Self> {
        ensure_directory_exists(log_directory)
            .with_context(|| format!("failed to create log directory: {}", log_directory.display()))?;

        let path = log_directory.join(log_file_name(&Local::now()));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed to create log file: {}", path.display()))?;

        Ok(Self {
            writer: BufWriter::new(file),
            path,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for FileSink {
    fn write_line(&mut self, level: Level, message: &str) -> io::Result<()> {
        writeln!(
            self.writer,
            "{} - {} - {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            level,
            message
        )?;
        self.writer.flush()
    }
}

#[must_use]
pub fn log_file_name<Tz: chrono::TimeZone>(started_at: &chrono::DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{LOG_FILE_PREFIX}_{}.log",
        started_at.format("%Y%m%d_%H%M%S")
    )
}

/// 記憶體輸出端，複本之間共用同一份內容
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl LogSink for MemorySink {
    fn write_line(&mut self, level: Level, message: &str) -> io::Result<()> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(format!("{level} - {message}"));
        Ok(())
    }
}
