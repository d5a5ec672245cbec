//! 短影片移動的執行控制
//!
//! 單一工作執行緒依序處理每個候選檔案：探測長度、必要時移動，
//! 每處理完一個檔案就更新進度。停止請求只在每輪開始前檢查一次。

use super::events::{RunEvent, progress_percent};
use super::job::{Job, StartError};
use crate::config::FileTypeTable;
use crate::tools::{DurationProbe, RunLogger, move_video, scan_video_files};
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RunPhase {
    Idle = 0,
    Scanning = 1,
    Processing = 2,
    Stopping = 3,
    Completed = 4,
}

impl From<u8> for RunPhase {
    fn from(value: u8) -> Self {
        match value {
            1 => Self::Scanning,
            2 => Self::Processing,
            3 => Self::Stopping,
            4 => Self::Completed,
            _ => Self::Idle,
        }
    }
}

impl RunPhase {
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Scanning | Self::Processing | Self::Stopping)
    }
}

/// 協作式停止旗標
#[derive(Debug, Clone, Default)]
pub struct StopToken(Arc<AtomicBool>);

impl StopToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunState {
    pub total_candidates: usize,
    pub processed_count: usize,
    pub moved_count: usize,
    pub running: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub state: RunState,
    /// 超過最大時長而保留的檔案數
    pub kept_count: usize,
    pub probe_failures: usize,
    pub move_failures: usize,
    pub stopped: bool,
    pub scan_error: Option<String>,
    pub log_file: Option<PathBuf>,
}

pub struct Controller {
    phase: AtomicU8,
    stop: StopToken,
    start_lock: Mutex<()>,
    file_type_table: FileTypeTable,
}

impl Controller {
    #[must_use]
    pub fn new(file_type_table: FileTypeTable) -> Self {
        Self {
            phase: AtomicU8::new(RunPhase::Idle as u8),
            stop: StopToken::new(),
            start_lock: Mutex::new(()),
            file_type_table,
        }
    }

    #[must_use]
    pub fn phase(&self) -> RunPhase {
        RunPhase::from(self.phase.load(Ordering::SeqCst))
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.phase().is_active()
    }

    #[must_use]
    pub fn can_start(&self) -> bool {
        !self.is_running()
    }

    #[must_use]
    pub fn can_stop(&self) -> bool {
        matches!(self.phase(), RunPhase::Scanning | RunPhase::Processing)
    }

    /// 請求停止目前的執行，只有閒置或已完成時回傳 false
    ///
    /// 停止中再次請求也會回傳 true，目前的檔案仍會處理完畢。
    pub fn request_stop(&self) -> bool {
        match self.phase() {
            RunPhase::Scanning | RunPhase::Stopping => {
                self.stop.request_stop();
                true
            }
            RunPhase::Processing => {
                self.stop.request_stop();
                let _ = self.transition(RunPhase::Processing, RunPhase::Stopping);
                true
            }
            RunPhase::Idle | RunPhase::Completed => false,
        }
    }

    /// 在背景執行緒啟動一次執行
    pub fn start(
        self: &Arc<Self>,
        job: Job,
        probe: Arc<dyn DurationProbe>,
        logger: RunLogger,
        events: Sender<RunEvent>,
    ) -> Result<JoinHandle<RunSummary>, StartError> {
        self.begin()?;

        let controller = Arc::clone(self);
        thread::Builder::new()
            .name("video-mover-worker".to_string())
            .spawn(move || {
                let mut logger = logger;
                controller.execute(&job, probe.as_ref(), &mut logger, &events)
            })
            .map_err(|e| {
                self.phase.store(RunPhase::Idle as u8, Ordering::SeqCst);
                StartError::from(e)
            })
    }

    /// 在目前的執行緒完成一次執行
    pub fn run_blocking(
        &self,
        job: &Job,
        probe: &dyn DurationProbe,
        logger: &mut RunLogger,
        events: &Sender<RunEvent>,
    ) -> Result<RunSummary, StartError> {
        self.begin()?;
        Ok(self.execute(job, probe, logger, events))
    }

    fn begin(&self) -> Result<(), StartError> {
        let _guard = self
            .start_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if self.is_running() {
            return Err(StartError::AlreadyRunning);
        }
        // 停止旗標必須在進入 Scanning 之前清除
        self.stop.reset();
        self.phase.store(RunPhase::Scanning as u8, Ordering::SeqCst);
        Ok(())
    }

    fn transition(&self, from: RunPhase, to: RunPhase) -> bool {
        self.phase
            .compare_exchange(from as u8, to as u8, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    fn execute(
        &self,
        job: &Job,
        probe: &dyn DurationProbe,
        logger: &mut RunLogger,
        events: &Sender<RunEvent>,
    ) -> RunSummary {
        let mut summary = RunSummary {
            state: RunState {
                running: true,
                ..RunState::default()
            },
            log_file: logger.log_file().map(Path::to_path_buf),
            ..RunSummary::default()
        };

        send_status(events, "Scanning files...");
        logger.info(format!(
            "Start processing: max duration {} seconds",
            job.max_duration_seconds
        ));

        let candidates = match scan_video_files(&job.source_root, &self.file_type_table) {
            Ok(candidates) => candidates,
            Err(e) => {
                logger.error(format!("Error during processing: {e:#}"));
                logger.error(format!("Scan diagnostic: {e:?}"));
                send_status(events, "Scan failed");
                summary.scan_error = Some(format!("{e:#}"));
                return self.finish(summary);
            }
        };

        summary.state.total_candidates = candidates.len();
        if candidates.is_empty() {
            logger.info("No video files found");
            send_status(events, "No video files found");
            return self.finish(summary);
        }

        logger.info(format!("Found {} video files", candidates.len()));
        let next = if self.stop.is_stop_requested() {
            RunPhase::Stopping
        } else {
            RunPhase::Processing
        };
        let _ = self.transition(RunPhase::Scanning, next);
        send_progress(events, &summary.state);

        for path in &candidates {
            if self.stop.is_stop_requested() {
                logger.info("Processing stopped");
                summary.stopped = true;
                break;
            }

            self.process_candidate(path, job, probe, logger, events, &mut summary);
            summary.state.processed_count += 1;
            send_progress(events, &summary.state);
        }

        let moved = summary.state.moved_count;
        let total = summary.state.total_candidates;
        logger.info(format!("Finished: moved {moved} video files"));
        send_status(events, &format!("Done: moved {moved}/{total} files"));

        self.finish(summary)
    }

    fn process_candidate(
        &self,
        path: &Path,
        job: &Job,
        probe: &dyn DurationProbe,
        logger: &mut RunLogger,
        events: &Sender<RunEvent>,
        summary: &mut RunSummary,
    ) {
        let relative = path.strip_prefix(&job.source_root).unwrap_or(path);
        send_status(events, &format!("Processing: {}", relative.display()));

        let duration = match probe.probe(path) {
            Ok(duration) => duration,
            Err(e) => {
                summary.probe_failures += 1;
                logger.error(format!(
                    "Could not read duration: {} ({e:#})",
                    relative.display()
                ));
                return;
            }
        };

        logger.info(format!(
            "Video: {}, duration: {duration:.2} seconds",
            relative.display()
        ));

        if duration > job.max_duration_seconds {
            summary.kept_count += 1;
            return;
        }

        match move_video(path, relative, &job.dest_root) {
            Ok(target) => {
                debug!("moved to {}", target.display());
                summary.state.moved_count += 1;
                logger.info(format!("Moved: {}", relative.display()));
            }
            Err(e) => {
                summary.move_failures += 1;
                logger.error(format!(
                    "Failed to move {}: {e:#}",
                    relative.display()
                ));
            }
        }
    }

    fn finish(&self, mut summary: RunSummary) -> RunSummary {
        summary.state.running = false;
        self.phase.store(RunPhase::Completed as u8, Ordering::SeqCst);
        info!(
            "run completed - moved: {}, processed: {}, total: {}, stopped: {}",
            summary.state.moved_count,
            summary.state.processed_count,
            summary.state.total_candidates,
            summary.stopped
        );
        summary
    }
}

fn send_status(events: &Sender<RunEvent>, status: &str) {
    let _ = events.send(RunEvent::Status(status.to_string()));
}

fn send_progress(events: &Sender<RunEvent>, state: &RunState) {
    let _ = events.send(RunEvent::Progress {
        processed: state.processed_count,
        total: state.total_candidates,
        percent: progress_percent(state.processed_count, state.total_candidates),
    });
}
