//! Cleanup of destination files left behind by a failed copy.

use std::fs;
use std::path::Path;

use log::{debug, warn};

/// Removes the destination file on drop unless the copy completed.
///
/// Declare the guard before opening the destination so the file handle is
/// closed before the removal runs, and [`arm`](Self::arm) it once the file
/// exists. A guard that was never armed leaves the path alone.
pub(crate) struct PartialFile<'a> {
    path: &'a Path,
    armed: bool,
}

impl<'a> PartialFile<'a> {
    pub(crate) fn new(path: &'a Path) -> Self {
        Self { path, armed: false }
    }

    /// Marks the destination as created by this copy.
    pub(crate) fn arm(&mut self) {
        self.armed = true;
    }

    /// Keeps the destination.
    pub(crate) fn complete(mut self) {
        self.armed = false;
    }
}

impl Drop for PartialFile<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match fs::remove_file(self.path) {
            Ok(()) => debug!("removed incomplete copy at {}", self.path.display()),
            Err(e) => warn!(
                "could not remove incomplete copy at {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}
