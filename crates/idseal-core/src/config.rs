// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{IdsealError, Result};

/// Output flavour of a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionMode {
    /// Encrypt the rendered PDF itself (`<stem>.pdf`).
    #[default]
    Pdf,
    /// Put the rendered PDF into an AES-encrypted archive (`<stem>.zip`).
    Zip,
}

/// Log verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

/// Settings for one batch run.
///
/// Built once at startup (defaults, then an optional JSON file, then CLI
/// flags) and handed to each component by reference. Nothing mutates it
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Directory receiving `<stem>.pdf` / `<stem>.zip`.
    pub output_dir: PathBuf,
    /// PDF or ZIP output.
    pub mode: ConversionMode,
    /// File all diagnostics are appended to.
    pub log_file: PathBuf,
    /// Verbosity of the log file.
    pub log_level: LogLevel,
    /// Renderer executable (LibreOffice).
    pub renderer_program: PathBuf,
    /// Upper bound on a single render, in seconds.
    pub render_timeout_secs: u64,
    /// Suffix of source documents, without the dot.
    pub document_suffix: String,
    /// Input root used when none is given on the command line.
    pub default_input: Option<PathBuf>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./out"),
            mode: ConversionMode::Pdf,
            log_file: PathBuf::from("log.txt"),
            log_level: LogLevel::Info,
            renderer_program: PathBuf::from("soffice"),
            render_timeout_secs: 120,
            document_suffix: "docx".into(),
            default_input: None,
        }
    }
}

impl BatchConfig {
    /// Load a configuration from a JSON file. Missing keys keep their
    /// defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make every item fail.
    pub fn validate(&self) -> Result<()> {
        if self.render_timeout_secs == 0 {
            return Err(IdsealError::Config(
                "render_timeout_secs must be greater than zero".into(),
            ));
        }
        let suffix = self.document_suffix.trim_start_matches('.');
        if suffix.is_empty() {
            return Err(IdsealError::Config("document_suffix is empty".into()));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(IdsealError::Config("output_dir is empty".into()));
        }
        Ok(())
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_secs(self.render_timeout_secs)
    }

    /// Suffix without a leading dot.
    pub fn suffix(&self) -> &str {
        self.document_suffix.trim_start_matches('.')
    }
}
