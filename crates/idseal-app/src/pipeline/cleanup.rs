// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scoped removal of per-item artifacts.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Removes every tracked path when dropped, except those marked with
/// [`keep`](Self::keep).
///
/// Create it before the first file of an item is written and track each
/// path up front. Whether the item succeeds, fails or returns early,
/// intermediates and partial outputs go away through the same drop.
#[derive(Debug, Default)]
pub struct ArtifactGuard {
    tracked: Vec<PathBuf>,
}

impl ArtifactGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove `path` on drop unless it is kept later.
    pub fn track(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !self.tracked.contains(&path) {
            self.tracked.push(path);
        }
    }

    /// Leave `path` in place.
    pub fn keep(&mut self, path: &Path) {
        self.tracked.retain(|tracked| tracked != path);
    }

    #[cfg(test)]
    pub fn tracked(&self) -> &[PathBuf] {
        &self.tracked
    }
}

impl Drop for ArtifactGuard {
    fn drop(&mut self) {
        for path in self.tracked.drain(..) {
            match std::fs::remove_file(&path) {
                Ok(()) => debug!(path = %path.display(), "removed artifact"),
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => warn!(path = %path.display(), error = %err, "cannot remove artifact"),
            }
        }
    }
}
