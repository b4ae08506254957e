// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for idseal.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Top-level error type for all idseal operations.
#[derive(Debug, Error)]
pub enum IdsealError {
    // -- Extraction errors --
    #[error("failed opening {path:?}: {detail}")]
    DocumentOpen { path: PathBuf, detail: String },

    #[error("no table at index {table} in {path:?} (found {found})")]
    MissingTable {
        path: PathBuf,
        table: usize,
        found: usize,
    },

    #[error("cell ({row}, {column}) not found in {path:?}")]
    MissingCell {
        path: PathBuf,
        row: usize,
        column: usize,
    },

    #[error("identifier cell is empty in {path:?}")]
    EmptyIdentifier { path: PathBuf },

    // -- Conversion errors --
    #[error("renderer failed on {path:?}: {detail}")]
    Render { path: PathBuf, detail: String },

    #[error("renderer timed out on {path:?} after {}s", .timeout.as_secs())]
    RenderTimeout { path: PathBuf, timeout: Duration },

    // -- Encryption errors --
    #[error("creating archive {path:?} failed: {detail}")]
    Archive { path: PathBuf, detail: String },

    #[error("PDF operation on {path:?} failed: {detail}")]
    Pdf { path: PathBuf, detail: String },

    // -- Startup --
    #[error("input root {path:?} is not a readable directory")]
    InputRoot { path: PathBuf },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("not enough arguments")]
    NoInput,

    // -- Storage / serialisation --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, IdsealError>;
