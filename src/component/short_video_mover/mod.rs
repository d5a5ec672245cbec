//! 短影片移動元件
//!
//! 遞迴掃描來源資料夾中的影片，將長度不超過門檻的檔案移動到目標資料夾，
//! 並保持原有的資料夾結構

mod controller;
mod events;
mod job;
mod main;

pub use controller::{Controller, RunPhase, RunState, RunSummary, StopToken};
pub use events::{RunEvent, ScreenSink, progress_percent};
pub use job::{Job, StartError, parse_max_duration};
pub use main::ShortVideoMover;
