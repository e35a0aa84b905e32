//! Filesystem utilities for prep.
//!
//! This module decides where rendered output goes and writes it there,
//! either to stdout or atomically to a named file.

pub mod atomic;

pub use atomic::atomic_write;

use crate::error::{PrepError, Result};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Destination for rendered output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Write to standard output.
    Stdout,
    /// Write to a named file, replacing it only when `force` is set.
    File { path: PathBuf, force: bool },
}

impl OutputTarget {
    /// Build the target from the `-write-file` and `-force` flags.
    pub fn new(write_file: Option<PathBuf>, force: bool) -> Self {
        match write_file {
            Some(path) => OutputTarget::File { path, force },
            None => OutputTarget::Stdout,
        }
    }

    /// Fail with `OutputExists` if this target would clobber a file without `force`.
    ///
    /// Called before rendering so nothing is rendered for a write that cannot happen.
    pub fn ensure_writable(&self) -> Result<()> {
        match self {
            OutputTarget::File { path, force: false } if file_exists(path) => {
                Err(PrepError::OutputExists(path.clone()))
            }
            _ => Ok(()),
        }
    }

    /// Write the complete rendered output in one operation.
    pub fn write(&self, content: &str) -> Result<()> {
        match self {
            OutputTarget::Stdout => {
                let mut stdout = io::stdout().lock();
                stdout
                    .write_all(content.as_bytes())
                    .and_then(|()| stdout.flush())
                    .map_err(|e| PrepError::OutputWrite {
                        target: "stdout".to_string(),
                        message: e.to_string(),
                    })
            }
            OutputTarget::File { path, .. } => {
                self.ensure_writable()?;
                atomic_write(path, content.as_bytes())?;
                info!(path = %path.display(), bytes = content.len(), "wrote rendered output");
                Ok(())
            }
        }
    }
}

/// Anything at `path`, including a dangling symlink, counts as existing.
fn file_exists(path: &Path) -> bool {
    match std::fs::symlink_metadata(path) {
        Ok(_) => true,
        Err(e) => e.kind() != io::ErrorKind::NotFound,
    }
}
