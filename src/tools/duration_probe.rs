//! 影片長度探測介面與後端選擇

use super::ffprobe_info::{FfprobeProbe, ffprobe_available};
use super::mediainfo_info::{MediaInfoProbe, mediainfo_available};
use anyhow::{Result, bail};
use std::fmt;
use std::path::Path;

/// Returns the playback duration of a file in seconds.
pub trait DurationProbe: Send + Sync {
    fn probe(&self, path: &Path) -> Result<f64>;
}

impl<F> DurationProbe for F
where
    F: Fn(&Path) -> Result<f64> + Send + Sync,
{
    fn probe(&self, path: &Path) -> Result<f64> {
        self(path)
    }
}

/// 長度必須是有限且非負的數值
pub fn validate_duration(seconds: f64) -> Result<f64> {
    if !seconds.is_finite() || seconds < 0.0 {
        bail!("invalid duration: {seconds}");
    }
    Ok(seconds)
}

/// 可用的長度探測後端，依優先順序排列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeBackend {
    Ffprobe,
    MediaInfo,
}

impl ProbeBackend {
    #[must_use]
    pub const fn all() -> [Self; 2] {
        [Self::Ffprobe, Self::MediaInfo]
    }

    /// 啟動時選擇第一個可用的後端
    #[must_use]
    pub fn detect() -> Option<Self> {
        Self::detect_with(Self::is_available)
    }

    pub fn detect_with(is_available: impl Fn(Self) -> bool) -> Option<Self> {
        Self::all().into_iter().find(|backend| is_available(*backend))
    }

    #[must_use]
    pub fn is_available(self) -> bool {
        match self {
            Self::Ffprobe => ffprobe_available(),
            Self::MediaInfo => mediainfo_available(),
        }
    }

    #[must_use]
    pub fn into_probe(self) -> Box<dyn DurationProbe> {
        match self {
            Self::Ffprobe => Box::new(FfprobeProbe),
            Self::MediaInfo => Box::new(MediaInfoProbe),
        }
    }

    /// Instructions shown when no backend is installed.
    #[must_use]
    pub const fn install_hint() -> &'static str {
        "Install FFmpeg (provides ffprobe) or MediaInfo and make sure it is on PATH:\n  \
         Debian/Ubuntu: sudo apt install ffmpeg   (or: sudo apt install mediainfo)\n  \
         macOS:         brew install ffmpeg       (or: brew install media-info)\n  \
         Windows:       winget install ffmpeg     (or: winget install MediaArea.MediaInfo)"
    }
}

impl fmt::Display for ProbeBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ffprobe => write!(f, "ffprobe"),
            Self::MediaInfo => write!(f, "mediainfo"),
        }
    }
}
