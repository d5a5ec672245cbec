use super::path_validator::ensure_directory_exists;
use anyhow::{Context, Result, bail};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// 將檔案移動到 `dest_root/relative`，保持原有的資料夾結構
///
/// 目標位置已有檔案時視為失敗，兩邊的檔案都不會被改動。
pub fn move_video(source: &Path, relative: &Path, dest_root: &Path) -> Result<PathBuf> {
    let target_path = dest_root.join(relative);

    if let Some(target_dir) = target_path.parent() {
        ensure_directory_exists(target_dir)
            .with_context(|| format!("failed to create destination folder: {}", target_dir.display()))?;
    }

    if fs::symlink_metadata(&target_path).is_ok() {
        bail!("destination already exists: {}", target_path.display());
    }

    match fs::rename(source, &target_path) {
        Ok(()) => {
            debug!("moved {} -> {}", source.display(), target_path.display());
        }
        Err(rename_err) => {
            // rename 失敗（可能是跨檔案系統），改為複製後刪除
            debug!(
                "rename failed, falling back to copy: {} ({rename_err})",
                source.display()
            );
            copy_and_delete(source, &target_path)
                .with_context(|| format!("move failed (rename error: {rename_err})"))?;
        }
    }

    Ok(target_path)
}

/// 複製檔案後刪除原檔案，任一步失敗都只保留原檔案
fn copy_and_delete(source: &Path, target: &Path) -> Result<()> {
    if let Err(copy_err) = fs::copy(source, target) {
        remove_partial_copy(target);
        return Err(copy_err).with_context(|| {
            format!("copy failed: {} -> {}", source.display(), target.display())
        });
    }

    if let Err(remove_err) = fs::remove_file(source) {
        remove_partial_copy(target);
        return Err(remove_err)
            .with_context(|| format!("failed to remove source after copy: {}", source.display()));
    }

    Ok(())
}

fn remove_partial_copy(target: &Path) {
    if !target.exists() {
        return;
    }
    if let Err(e) = fs::remove_file(target) {
        warn!("could not remove incomplete copy {}: {e}", target.display());
    }
}
