// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Discovery — recursive enumeration of source documents under an input root.

use std::path::Path;

use idseal_core::DocumentRef;
use idseal_core::error::IdsealError;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Prefix Word uses for its owner/lock files next to an open document.
const LOCK_FILE_PREFIX: &str = "~$";

/// Every file below `root` whose extension equals `suffix` (ASCII
/// case-insensitive), sorted by name within each directory.
///
/// Entries that cannot be read are logged and skipped. Only a missing or
/// non-directory root is an error.
pub fn discover(root: &Path, suffix: &str) -> Result<Vec<DocumentRef>, IdsealError> {
    if !root.is_dir() {
        return Err(IdsealError::InputRoot {
            path: root.to_path_buf(),
        });
    }
    info!("Starting on folder \"{}\"", root.display());

    let suffix = suffix.trim_start_matches('.');
    let mut documents = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() || !matches_suffix(entry.path(), suffix) {
            continue;
        }
        if entry
            .file_name()
            .to_string_lossy()
            .starts_with(LOCK_FILE_PREFIX)
        {
            debug!(path = %entry.path().display(), "skipping lock file");
            continue;
        }
        documents.push(DocumentRef::new(entry.into_path()));
    }

    debug!(count = documents.len(), "discovery finished");
    Ok(documents)
}

fn matches_suffix(path: &Path, suffix: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(suffix))
}
