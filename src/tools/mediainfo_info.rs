use super::duration_probe::{DurationProbe, validate_duration};
use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::path::Path;
use std::process::{Command, Stdio};

#[derive(Deserialize)]
struct MediaInfoOutput {
    media: Option<MediaInfo>,
}

#[derive(Deserialize)]
struct MediaInfo {
    #[serde(default)]
    track: Vec<TrackInfo>,
}

#[derive(Deserialize)]
struct TrackInfo {
    #[serde(rename = "@type")]
    track_type: String,
    #[serde(rename = "FrameCount")]
    frame_count: Option<String>,
    #[serde(rename = "FrameRate")]
    frame_rate: Option<String>,
}

/// 以 mediainfo 的幀數與幀率推算長度
#[derive(Debug, Clone, Copy, Default)]
pub struct MediaInfoProbe;

impl DurationProbe for MediaInfoProbe {
    fn probe(&self, path: &Path) -> Result<f64> {
        let output = Command::new("mediainfo")
            .arg("--Output=JSON")
            .arg(path)
            .output()
            .with_context(|| format!("failed to run mediainfo: {}", path.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("mediainfo failed ({}): {}", output.status, stderr.trim());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_mediainfo_duration(&stdout).with_context(|| path.display().to_string())
    }
}

/// 檢查系統上是否有可執行的 mediainfo
#[must_use]
pub fn mediainfo_available() -> bool {
    Command::new("mediainfo")
        .arg("--Version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|status| status.success())
}

/// 解析 mediainfo JSON 輸出，以第一條視訊軌的幀數除以幀率
pub fn parse_mediainfo_duration(json: &str) -> Result<f64> {
    let info: MediaInfoOutput =
        serde_json::from_str(json).with_context(|| "failed to parse mediainfo output")?;

    let video_track = info
        .media
        .as_ref()
        .and_then(|media| media.track.iter().find(|t| t.track_type == "Video"))
        .ok_or_else(|| anyhow!("no video track found"))?;

    let frame_count = video_track
        .frame_count
        .as_deref()
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .ok_or_else(|| anyhow!("no frame count reported"))?;

    let frame_rate = video_track
        .frame_rate
        .as_deref()
        .and_then(parse_frame_rate)
        .ok_or_else(|| anyhow!("no frame rate reported"))?;

    validate_duration(duration_from_frames(frame_count, frame_rate))
}

/// 幀率為 0 時長度視為 0
#[must_use]
pub fn duration_from_frames(frame_count: f64, frame_rate: f64) -> f64 {
    if frame_rate > 0.0 {
        frame_count / frame_rate
    } else {
        0.0
    }
}

/// 解析幀率字串（例如 "30/1"、"30000/1001" 或 "29.970"）
fn parse_frame_rate(rate: &str) -> Option<f64> {
    let rate = rate.trim();
    if let Some((num_str, den_str)) = rate.split_once('/') {
        let num: f64 = num_str.parse().ok()?;
        let den: f64 = den_str.parse().ok()?;
        if den > 0.0 {
            return Some(num / den);
        }
        return None;
    }
    rate.parse().ok()
}
