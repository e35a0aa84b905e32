//! Atomic file writes for rendered output.
//!
//! All atomic writes follow this pattern:
//! 1. Write content to a temporary file in the same directory
//! 2. Sync the file to disk (fsync)
//! 3. Rename the temporary file over the target
//!
//! The temporary file is owned by a guard for the whole sequence. If any step
//! fails, dropping the guard closes the handle and removes the file, so the
//! target is either untouched or fully replaced.
//!
//! Source and destination are in the same directory, so the rename stays on
//! one filesystem. On Windows `std::fs::rename` replaces an existing target.
//!
//! An existing target is overwritten the way truncating it would: a symlink is
//! followed and the file it points at is replaced, the file's permissions carry
//! over to the new content, and anything that is not a regular file (a device
//! such as `/dev/null`) is truncated and written in place.

use crate::error::{PrepError, Result};
use std::fs::{self, File, OpenOptions, Permissions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Atomically write bytes to a file, creating parent directories as needed.
///
/// # Returns
///
/// * `Ok(())` - The target now holds exactly `content`
/// * `Err(PrepError::OutputWrite)` - Any step failed; the target is unchanged
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
    let target = resolve_target(path.as_ref());
    let target = target.as_path();

    let existing = fs::metadata(target).ok();
    if let Some(metadata) = &existing
        && !metadata.is_file()
    {
        return write_in_place(target, content);
    }

    if let Some(parent) = target.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            write_error(target, format!("failed to create parent directory: {}", e))
        })?;
    }

    let mut temp = TempFile::create(generate_temp_path(target)?)?;
    if let Some(metadata) = existing {
        temp.set_permissions(metadata.permissions())?;
    }
    temp.write_all(content)?;
    temp.persist(target)
}

/// The file a write to `path` should land in, following symlinks.
///
/// A dangling symlink resolves to the path it names, so the write creates it.
fn resolve_target(path: &Path) -> PathBuf {
    if let Ok(resolved) = fs::canonicalize(path) {
        return resolved;
    }
    match fs::read_link(path) {
        Ok(link) => match path.parent() {
            Some(parent) => parent.join(link),
            None => link,
        },
        Err(_) => path.to_path_buf(),
    }
}

/// Truncate and write a target that cannot be replaced by renaming.
fn write_in_place(target: &Path, content: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(target)
        .map_err(|e| write_error(target, format!("failed to open file: {}", e)))?;

    file.write_all(content)
        .and_then(|()| file.flush())
        .map_err(|e| write_error(target, format!("failed to write file: {}", e)))
}

/// Generate a temporary file path in the same directory as the target.
fn generate_temp_path(target: &Path) -> Result<PathBuf> {
    let parent = target.parent().unwrap_or(Path::new("."));
    let filename = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| write_error(target, "invalid file path".to_string()))?;

    Ok(parent.join(format!(".{}.{}.tmp", filename, std::process::id())))
}

/// A temporary file that is deleted unless it is persisted.
struct TempFile {
    path: PathBuf,
    file: Option<File>,
}

impl TempFile {
    fn create(path: PathBuf) -> Result<Self> {
        let file = File::create(&path).map_err(|e| {
            write_error(&path, format!("failed to create temporary file: {}", e))
        })?;

        Ok(Self {
            path,
            file: Some(file),
        })
    }

    fn set_permissions(&self, permissions: Permissions) -> Result<()> {
        let Some(file) = self.file.as_ref() else {
            return Err(write_error(&self.path, "temporary file already closed".to_string()));
        };

        file.set_permissions(permissions)
            .map_err(|e| write_error(&self.path, format!("failed to copy permissions: {}", e)))
    }

    fn write_all(&mut self, content: &[u8]) -> Result<()> {
        let Some(file) = self.file.as_mut() else {
            return Err(write_error(&self.path, "temporary file already closed".to_string()));
        };

        file.write_all(content)
            .and_then(|()| file.sync_all())
            .map_err(|e| write_error(&self.path, format!("failed to write temporary file: {}", e)))
    }

    /// Close the handle and rename the file over `target`.
    fn persist(mut self, target: &Path) -> Result<()> {
        // Close before renaming; Windows refuses to rename open files.
        drop(self.file.take());

        fs::rename(&self.path, target).map_err(|e| {
            write_error(target, format!("failed to replace file atomically: {}", e))
        })?;

        // Renamed away, nothing left for Drop to clean up.
        self.path = PathBuf::new();

        sync_parent_dir(target);
        Ok(())
    }
}

/// Persist the directory entry of a freshly renamed file.
#[cfg(unix)]
fn sync_parent_dir(target: &Path) {
    let parent = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if let Ok(dir) = File::open(parent) {
        let _ = dir.sync_all();
    }
}

#[cfg(not(unix))]
fn sync_parent_dir(_target: &Path) {}

impl Drop for TempFile {
    fn drop(&mut self) {
        drop(self.file.take());
        if !self.path.as_os_str().is_empty() {
            let _ = fs::remove_file(&self.path);
        }
    }
}

fn write_error(path: &Path, message: String) -> PrepError {
    PrepError::OutputWrite {
        target: path.display().to_string(),
        message,
    }
}
