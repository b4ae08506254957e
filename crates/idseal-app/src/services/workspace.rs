// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Input and output directory resolution.

use std::path::{Path, PathBuf};

use idseal_core::BatchConfig;
use idseal_core::error::IdsealError;
use tracing::{debug, warn};

/// Return the output directory, creating it if needed.
pub fn output_dir(config: &BatchConfig) -> Result<PathBuf, IdsealError> {
    let dir = config.output_dir.clone();
    std::fs::create_dir_all(&dir).map_err(|err| {
        IdsealError::Config(format!(
            "cannot create output directory {}: {err}",
            dir.display()
        ))
    })?;
    debug!(path = %dir.display(), "output directory ready");
    Ok(dir)
}

/// Pick the input root: the explicit argument, else the configured default.
///
/// Falling back to the default is logged as a warning. With neither
/// available the run cannot start.
pub fn input_root(explicit: Option<&Path>, config: &BatchConfig) -> Result<PathBuf, IdsealError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    match &config.default_input {
        Some(fallback) => {
            warn!("No input given, using \"{}\"", fallback.display());
            Ok(fallback.clone())
        }
        None => Err(IdsealError::NoInput),
    }
}
