use crate::config::FileTypeTable;
use anyhow::{Context, Result};
use log::debug;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// 遞迴掃描影片檔案，保留檔案系統的走訪順序
///
/// 指向一般檔案的符號連結也會列入，但不會進入符號連結的資料夾。
/// 走訪過程中的任何錯誤（根目錄不存在、權限不足、符號連結迴圈）都會直接回傳，
/// 不會被略過。
pub fn scan_video_files(directory: &Path, file_type_table: &FileTypeTable) -> Result<Vec<PathBuf>> {
    let mut video_files = Vec::new();

    for entry in WalkDir::new(directory).follow_links(false) {
        let entry = entry.with_context(|| format!("failed to scan {}", directory.display()))?;
        if is_file_entry(&entry) && file_type_table.is_video_file(entry.path()) {
            video_files.push(entry.into_path());
        }
    }

    debug!(
        "found {} video files under {}",
        video_files.len(),
        directory.display()
    );
    Ok(video_files)
}

fn is_file_entry(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
}
