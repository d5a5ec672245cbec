mod duration_probe;
mod ffprobe_info;
mod file_mover;
mod mediainfo_info;
mod path_validator;
mod run_logger;
mod video_scanner;

pub use duration_probe::{DurationProbe, ProbeBackend, validate_duration};
pub use ffprobe_info::{FfprobeProbe, ffprobe_available, parse_ffprobe_duration};
pub use file_mover::move_video;
pub use mediainfo_info::{
    MediaInfoProbe, duration_from_frames, mediainfo_available, parse_mediainfo_duration,
};
pub use path_validator::{ensure_directory_exists, validate_directory_exists};
pub use run_logger::{FileSink, LogSink, MemorySink, RunLogger, log_file_name};
pub use video_scanner::scan_video_files;
