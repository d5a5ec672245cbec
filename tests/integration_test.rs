//! 整合測試 - 以假的長度探測器驗證掃描、判斷與移動流程

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;

use anyhow::anyhow;
use short_video_mover::component::short_video_mover::{
    Controller, Job, RunEvent, RunPhase, RunSummary,
};
use short_video_mover::config::Config;
use short_video_mover::tools::{DurationProbe, MemorySink, RunLogger};
use tempfile::TempDir;

struct Fixture {
    _temp_dir: TempDir,
    source: PathBuf,
    dest: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("source");
        let dest = temp_dir.path().join("dest");
        fs::create_dir_all(&source).unwrap();
        Self {
            _temp_dir: temp_dir,
            source,
            dest,
        }
    }

    fn add(&self, relative: &str) -> PathBuf {
        let path = self.source.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, relative).unwrap();
        path
    }

    fn job(&self, max_duration_seconds: f64) -> Job {
        Job {
            source_root: self.source.clone(),
            dest_root: self.dest.clone(),
            max_duration_seconds,
        }
    }
}

fn new_controller() -> Controller {
    Controller::new(Config::new().unwrap().file_type_table)
}

/// 依檔名回傳固定長度，找不到時視為探測失敗
fn probe_by_name(durations: &[(&str, f64)]) -> Box<dyn DurationProbe> {
    let table: HashMap<String, f64> = durations
        .iter()
        .map(|(name, secs)| ((*name).to_string(), *secs))
        .collect();
    Box::new(move |path: &Path| {
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        table
            .get(&name)
            .copied()
            .ok_or_else(|| anyhow!("corrupt file: {name}"))
    })
}

fn run(
    controller: &Controller,
    job: &Job,
    probe: &dyn DurationProbe,
) -> (RunSummary, Vec<String>, Vec<RunEvent>) {
    let screen = MemorySink::new();
    let mut logger = RunLogger::new().with_sink(screen.clone());
    let (tx, rx) = mpsc::channel();
    let summary = controller.run_blocking(job, probe, &mut logger, &tx).unwrap();
    drop(tx);
    (summary, screen.lines(), rx.iter().collect())
}

#[test]
fn test_short_video_moved_long_video_kept() {
    let fixture = Fixture::new();
    fixture.add("a/short.mp4");
    fixture.add("b/long.mkv");
    let probe = probe_by_name(&[("short.mp4", 10.0), ("long.mkv", 120.0)]);
    let controller = new_controller();

    let (summary, _, _) = run(&controller, &fixture.job(60.0), &*probe);

    assert!(fixture.dest.join("a/short.mp4").exists());
    assert!(!fixture.source.join("a/short.mp4").exists());
    assert!(fixture.source.join("b/long.mkv").exists());
    assert!(!fixture.dest.join("b/long.mkv").exists());
    assert_eq!(summary.state.moved_count, 1);
    assert_eq!(summary.state.total_candidates, 2);
    assert_eq!(summary.kept_count, 1);
    assert!(!summary.stopped);
    assert_eq!(controller.phase(), RunPhase::Completed);
}

#[test]
fn test_duration_equal_to_threshold_is_moved() {
    let fixture = Fixture::new();
    fixture.add("edge.mov");
    let probe = probe_by_name(&[("edge.mov", 60.0)]);

    let (summary, _, _) = run(&new_controller(), &fixture.job(60.0), &*probe);

    assert_eq!(summary.state.moved_count, 1);
    assert!(fixture.dest.join("edge.mov").exists());
}

#[test]
fn test_zero_duration_moves_with_zero_threshold() {
    let fixture = Fixture::new();
    fixture.add("still.webm");
    let probe = probe_by_name(&[("still.webm", 0.0)]);

    let (summary, _, _) = run(&new_controller(), &fixture.job(0.0), &*probe);

    assert_eq!(summary.state.moved_count, 1);
    assert!(fixture.dest.join("still.webm").exists());
}

#[test]
fn test_all_candidates_processed_and_non_videos_ignored() {
    let fixture = Fixture::new();
    fixture.add("one.mp4");
    fixture.add("x/two.AVI");
    fixture.add("x/y/three.wmv");
    fixture.add("x/y/z/four.flv");
    fixture.add("x/notes.txt");
    fixture.add("cover.jpg");
    let probe = |_: &Path| -> anyhow::Result<f64> { Ok(500.0) };

    let (summary, _, events) = run(&new_controller(), &fixture.job(60.0), &probe);

    assert_eq!(summary.state.total_candidates, 4);
    assert_eq!(summary.state.processed_count, 4);
    assert_eq!(summary.state.moved_count, 0);
    assert!(!summary.state.running);

    let percents: Vec<f64> = events
        .iter()
        .filter_map(|e| match e {
            RunEvent::Progress { percent, .. } => Some(*percent),
            _ => None,
        })
        .collect();
    assert_eq!(percents, vec![0.0, 25.0, 50.0, 75.0, 100.0]);
}

#[test]
fn test_probe_failure_leaves_file_in_place() {
    let fixture = Fixture::new();
    fixture.add("broken/bad.mp4");
    fixture.add("good.mp4");
    let probe = probe_by_name(&[("good.mp4", 5.0)]);

    let (summary, lines, _) = run(&new_controller(), &fixture.job(60.0), &*probe);

    assert!(fixture.source.join("broken/bad.mp4").exists());
    assert!(!fixture.dest.join("broken").exists());
    assert!(fixture.dest.join("good.mp4").exists());
    assert_eq!(summary.probe_failures, 1);
    assert_eq!(summary.state.processed_count, 2);
    assert_eq!(summary.state.moved_count, 1);

    let bad = Path::new("broken").join("bad.mp4");
    assert!(lines.iter().any(|l| l.starts_with("ERROR")
        && l.contains(&bad.display().to_string())
        && l.contains("corrupt file")));
}

#[test]
fn test_destination_collision_fails_candidate() {
    let fixture = Fixture::new();
    fixture.add("a/short.mp4");
    fs::create_dir_all(fixture.dest.join("a")).unwrap();
    fs::write(fixture.dest.join("a/short.mp4"), "already here").unwrap();
    let probe = probe_by_name(&[("short.mp4", 1.0)]);

    let (summary, lines, _) = run(&new_controller(), &fixture.job(60.0), &*probe);

    assert_eq!(summary.move_failures, 1);
    assert_eq!(summary.state.moved_count, 0);
    assert_eq!(summary.state.processed_count, 1);
    assert!(fixture.source.join("a/short.mp4").exists());
    assert_eq!(
        fs::read_to_string(fixture.dest.join("a/short.mp4")).unwrap(),
        "already here"
    );
    assert!(lines.iter().any(|l| l.contains("already exists")));
}

#[test]
fn test_stop_after_three_of_ten() {
    let fixture = Fixture::new();
    for i in 0..10 {
        fixture.add(&format!("clip_{i}.mp4"));
    }
    let controller = Arc::new(new_controller());
    let probed = Arc::new(AtomicUsize::new(0));
    let probe = {
        let controller = Arc::clone(&controller);
        let probed = Arc::clone(&probed);
        move |_: &Path| -> anyhow::Result<f64> {
            if probed.fetch_add(1, Ordering::SeqCst) + 1 == 3 {
                assert!(controller.request_stop());
            }
            Ok(1.0)
        }
    };

    let (summary, lines, _) = run(&controller, &fixture.job(60.0), &probe);

    assert_eq!(probed.load(Ordering::SeqCst), 3);
    assert_eq!(summary.state.processed_count, 3);
    assert_eq!(summary.state.moved_count, 3);
    assert_eq!(summary.state.total_candidates, 10);
    assert!(!summary.state.running);
    assert!(summary.stopped);
    assert_eq!(fs::read_dir(&fixture.source).unwrap().count(), 7);
    assert!(lines.iter().any(|l| l.contains("Processing stopped")));
    assert_eq!(controller.phase(), RunPhase::Completed);
    assert!(controller.can_start());
    assert!(!controller.can_stop());
}

#[test]
fn test_no_video_files_completes() {
    let fixture = Fixture::new();
    fixture.add("readme.txt");
    let probe = |_: &Path| -> anyhow::Result<f64> { panic!("no candidates to probe") };
    let controller = new_controller();

    let (summary, lines, events) = run(&controller, &fixture.job(60.0), &probe);

    assert_eq!(summary.state.total_candidates, 0);
    assert_eq!(summary.state.processed_count, 0);
    assert!(lines.iter().any(|l| l.contains("No video files found")));
    assert!(events.contains(&RunEvent::Status("No video files found".to_string())));
    assert_eq!(controller.phase(), RunPhase::Completed);
}

#[test]
fn test_missing_source_routes_to_completed() {
    let fixture = Fixture::new();
    let job = Job {
        source_root: fixture.source.join("vanished"),
        ..fixture.job(60.0)
    };
    let probe = |_: &Path| -> anyhow::Result<f64> { Ok(1.0) };
    let controller = new_controller();

    let (summary, lines, _) = run(&controller, &job, &probe);

    assert!(summary.scan_error.is_some());
    assert!(!summary.state.running);
    assert!(lines.iter().any(|l| l.starts_with("ERROR")));
    assert_eq!(controller.phase(), RunPhase::Completed);
    assert!(controller.can_start());
}

#[test]
fn test_controller_can_run_again_after_completion() {
    let fixture = Fixture::new();
    fixture.add("first.mp4");
    let probe = |_: &Path| -> anyhow::Result<f64> { Ok(1.0) };
    let controller = new_controller();

    let (first, _, _) = run(&controller, &fixture.job(60.0), &probe);
    fixture.add("second.mp4");
    let (second, _, _) = run(&controller, &fixture.job(60.0), &probe);

    assert_eq!(first.state.moved_count, 1);
    assert_eq!(second.state.moved_count, 1);
    assert!(fixture.dest.join("first.mp4").exists());
    assert!(fixture.dest.join("second.mp4").exists());
}
