use super::controller::{Controller, RunSummary};
use super::events::{RunEvent, ScreenSink};
use super::job::{Job, StartError, parse_max_duration};
use crate::config::Config;
use crate::tools::{DurationProbe, FileSink, RunLogger, validate_directory_exists};
use anyhow::{Result, anyhow};
use console::style;
use dialoguer::{Confirm, Input};
use indicatif::{ProgressBar, ProgressStyle};
use log::{Level, info, warn};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;

/// 依影片長度移動短影片的互動元件
pub struct ShortVideoMover {
    config: Config,
    controller: Arc<Controller>,
    probe: Arc<dyn DurationProbe>,
}

impl ShortVideoMover {
    pub fn new(config: Config, controller: Arc<Controller>, probe: Arc<dyn DurationProbe>) -> Self {
        Self {
            config,
            controller,
            probe,
        }
    }

    pub fn run(&self) -> Result<()> {
        println!("{}", style("=== Move short videos ===").cyan().bold());
        println!(
            "{}",
            style(
                "Videos at or under the maximum duration are moved (not copied) \
                 to the destination, keeping their folder structure."
            )
            .dim()
        );

        if !self.controller.can_start() {
            return Err(StartError::AlreadyRunning.into());
        }

        let source = self.prompt_folder("Source folder (scanned recursively)")?;
        let destination = self.prompt_folder("Destination folder")?;
        let max_duration = self.prompt_max_duration()?;

        let job = match Job::parse(&source, &destination, &max_duration) {
            Ok(job) => job,
            Err(e) => {
                println!("{} {}", style("Error:").red().bold(), e);
                return Ok(());
            }
        };
        validate_directory_exists(&job.source_root)?;

        self.print_job(&job);
        if !self.confirm_move()? {
            println!("{}", style("Cancelled").yellow());
            return Ok(());
        }

        let (events_tx, events_rx) = mpsc::channel();
        let logger = self.create_logger(ScreenSink::new(events_tx.clone()));
        let handle =
            self.controller
                .start(job, Arc::clone(&self.probe), logger, events_tx)?;

        println!("{}", style("Press Ctrl-C to stop after the current file").dim());
        Self::render_events(&events_rx);

        let summary = handle
            .join()
            .map_err(|_| anyhow!("worker thread panicked"))?;
        self.print_result(&summary);

        Ok(())
    }

    fn prompt_folder(&self, prompt: &str) -> Result<String> {
        let path: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(path.trim().to_string())
    }

    fn prompt_max_duration(&self) -> Result<String> {
        let default = self.config.defaults.max_duration_seconds.to_string();
        let raw: String = Input::new()
            .with_prompt("Maximum duration (seconds)")
            .default(default)
            .validate_with(|input: &String| -> Result<(), String> {
                parse_max_duration(input)
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            })
            .interact_text()?;

        if let Ok(seconds) = parse_max_duration(&raw) {
            println!("  {} {} s", style("≈").dim(), seconds.round());
        }
        Ok(raw)
    }

    fn confirm_move(&self) -> Result<bool> {
        let confirm = Confirm::new()
            .with_prompt("Move matching videos now?")
            .default(true)
            .interact()?;
        Ok(confirm)
    }

    fn create_logger(&self, screen: ScreenSink) -> RunLogger {
        let logger = RunLogger::new();
        let logger = match FileSink::create(&self.config.defaults.log_directory) {
            Ok(file_sink) => logger.with_file_sink(file_sink),
            Err(e) => {
                warn!("log file unavailable: {e:#}");
                println!(
                    "{} {e:#}",
                    style("Log file unavailable, logging to screen only:").yellow()
                );
                logger
            }
        };
        logger.with_sink(screen)
    }

    /// 顯示進度直到工作執行緒結束（所有傳送端都被釋放）
    fn render_events(events: &Receiver<RunEvent>) {
        let progress_bar = ProgressBar::new(0);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {percent:>3}% ({pos}/{len}) {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("#>-"),
        );

        for event in events {
            match event {
                RunEvent::Status(status) => progress_bar.set_message(status),
                RunEvent::Log { level, message } => {
                    let line = match level {
                        Level::Error => style(message).red().to_string(),
                        Level::Warn => style(message).yellow().to_string(),
                        _ => message,
                    };
                    progress_bar.println(line);
                }
                RunEvent::Progress {
                    processed, total, ..
                } => {
                    progress_bar.set_length(total as u64);
                    progress_bar.set_position(processed as u64);
                }
            }
        }

        progress_bar.finish();
    }

    fn print_job(&self, job: &Job) {
        println!();
        println!("  Source:       {}", style(job.source_root.display()).cyan());
        println!("  Destination:  {}", style(job.dest_root.display()).cyan());
        println!(
            "  Max duration: {}",
            style(format!("{} s", job.max_duration_seconds)).cyan()
        );
        println!();
    }

    fn print_result(&self, summary: &RunSummary) {
        let state = &summary.state;

        println!();
        println!("{}", style("=== Result ===").cyan().bold());

        if let Some(error) = &summary.scan_error {
            println!("  {} {}", style("Scan failed:").red().bold(), error);
        }

        println!(
            "  Moved: {}/{} files",
            style(state.moved_count).green(),
            state.total_candidates
        );
        println!("  Processed: {}", state.processed_count);
        if summary.kept_count > 0 {
            println!(
                "  Kept (longer than maximum): {}",
                style(summary.kept_count).dim()
            );
        }
        if summary.probe_failures > 0 {
            println!(
                "  Duration unreadable: {}",
                style(summary.probe_failures).red()
            );
        }
        if summary.move_failures > 0 {
            println!("  Move failed: {}", style(summary.move_failures).red());
        }
        if summary.stopped {
            println!("  {}", style("Stopped before all files were processed").yellow());
        }
        if let Some(log_file) = &summary.log_file {
            println!("  Log file: {}", style(log_file.display()).dim());
        }

        info!(
            "short video move finished - moved: {}, processed: {}, total: {}, stopped: {}",
            state.moved_count, state.processed_count, state.total_candidates, summary.stopped
        );
    }
}
