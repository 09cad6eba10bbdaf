//! Firmware image watch.
//!
//! Reads only the modification time of the guest's firmware image. A probe that fails for any
//! reason (missing file, permission denied) reports the time as absent, and absence never counts
//! as a change.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::trace;

/// Observes the modification time of one firmware image path.
#[derive(Debug, Clone, Default)]
pub struct ImageWatch {
    path: Option<PathBuf>,
}

impl ImageWatch {
    /// Watches the image at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// A watch that never observes anything.
    pub const fn disabled() -> Self {
        Self { path: None }
    }

    /// Watched path, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Current modification time, or `None` if it cannot be read.
    pub fn last_modified(&self) -> Option<SystemTime> {
        let path = self.path.as_deref()?;
        match fs::metadata(path).and_then(|meta| meta.modified()) {
            Ok(time) => Some(time),
            Err(e) => {
                trace!(path = %path.display(), error = %e, "firmware image not observable");
                None
            }
        }
    }

    /// Returns `true` only when both samples exist and differ.
    pub fn changed(before: Option<SystemTime>, after: Option<SystemTime>) -> bool {
        matches!((before, after), (Some(a), Some(b)) if a != b)
    }
}
