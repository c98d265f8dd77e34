//! Scoped change of the process working directory.

use crate::error::{BootstrapError, Result};
use std::path::{Path, PathBuf};

/// Guard that holds the process inside a directory until it is dropped.
///
/// The directory that was current at `enter` is restored in `Drop`, so an
/// early return or `?` inside the scope cannot leak the change into later
/// steps or into the caller.
#[derive(Debug)]
#[must_use = "the previous directory is restored as soon as the guard is dropped"]
pub struct WorkdirGuard {
    previous: PathBuf,
    current: PathBuf,
}

impl WorkdirGuard {
    /// Record the current directory and change into `dir`.
    pub fn enter(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();

        let previous = std::env::current_dir().map_err(|source| BootstrapError::Workdir {
            path: dir.to_path_buf(),
            source,
        })?;

        std::env::set_current_dir(dir).map_err(|source| BootstrapError::Workdir {
            path: dir.to_path_buf(),
            source,
        })?;

        let current = previous.join(dir);
        log::debug!(
            "[Workdir] Entered {} (from {})",
            current.display(),
            previous.display()
        );

        Ok(WorkdirGuard { previous, current })
    }

    /// Directory the guard will return to.
    pub fn previous(&self) -> &Path {
        &self.previous
    }

    /// Directory the guard entered, resolved against `previous`.
    pub fn current(&self) -> &Path {
        &self.current
    }
}

impl Drop for WorkdirGuard {
    fn drop(&mut self) {
        if let Err(e) = std::env::set_current_dir(&self.previous) {
            log::error!(
                "[Workdir] Could not restore {}: {}",
                self.previous.display(),
                e
            );
        } else {
            log::debug!("[Workdir] Restored {}", self.previous.display());
        }
    }
}
