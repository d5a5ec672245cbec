use crate::tools::LogSink;
use log::Level;
use std::io;
use std::sync::mpsc::Sender;

/// 工作執行緒傳給前端的更新
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    Status(String),
    Log { level: Level, message: String },
    Progress {
        processed: usize,
        total: usize,
        percent: f64,
    },
}

/// 把紀錄轉送到畫面上的日誌區
pub struct ScreenSink {
    events: Sender<RunEvent>,
}

impl ScreenSink {
    #[must_use]
    pub const fn new(events: Sender<RunEvent>) -> Self {
        Self { events }
    }
}

impl LogSink for ScreenSink {
    fn write_line(&mut self, level: Level, message: &str) -> io::Result<()> {
        // 前端已關閉時不算是紀錄失敗
        let _ = self.events.send(RunEvent::Log {
            level,
            message: message.to_string(),
        });
        Ok(())
    }
}

#[must_use]
pub fn progress_percent(processed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    processed as f64 / total as f64 * 100.0
}
