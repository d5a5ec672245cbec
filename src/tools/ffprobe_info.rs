use super::duration_probe::{DurationProbe, validate_duration};
use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::path::Path;
use std::process::{Command, Stdio};

#[derive(Deserialize)]
struct FfprobeOutput {
    format: Option<FormatInfo>,
    streams: Option<Vec<StreamInfo>>,
}

#[derive(Deserialize)]
struct FormatInfo {
    duration: Option<String>,
}

#[derive(Deserialize)]
struct StreamInfo {
    codec_type: Option<String>,
    duration: Option<String>,
}

/// `-v error` 讓失敗時 stderr 帶有 ffprobe 的錯誤訊息
const FFPROBE_ARGS: [&str; 6] = [
    "-v",
    "error",
    "-print_format",
    "json",
    "-show_format",
    "-show_streams",
];

/// 以 ffprobe 讀取容器中的精確長度
#[derive(Debug, Clone, Copy, Default)]
pub struct FfprobeProbe;

impl DurationProbe for FfprobeProbe {
    fn probe(&self, path: &Path) -> Result<f64> {
        let output = Command::new("ffprobe")
            .args(FFPROBE_ARGS)
            .arg(path)
            .output()
            .with_context(|| format!("failed to run ffprobe: {}", path.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("ffprobe failed ({}): {}", output.status, stderr.trim());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_ffprobe_duration(&stdout).with_context(|| path.display().to_string())
    }
}

/// 檢查系統上是否有可執行的 ffprobe
#[must_use]
pub fn ffprobe_available() -> bool {
    Command::new("ffprobe")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|status| status.success())
}

/// 解析 ffprobe JSON 輸出的長度（優先從 format，其次從視訊串流）
pub fn parse_ffprobe_duration(json: &str) -> Result<f64> {
    let probe: FfprobeOutput =
        serde_json::from_str(json).with_context(|| "failed to parse ffprobe output")?;

    let video_stream_duration = probe.streams.as_ref().and_then(|streams| {
        streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("video"))
            .and_then(|s| s.duration.as_ref())
    });

    let raw = probe
        .format
        .as_ref()
        .and_then(|f| f.duration.as_ref())
        .or(video_stream_duration)
        .ok_or_else(|| anyhow!("no duration reported"))?;

    let seconds = raw
        .trim()
        .parse::<f64>()
        .with_context(|| format!("invalid duration: {raw}"))?;

    validate_duration(seconds)
}
