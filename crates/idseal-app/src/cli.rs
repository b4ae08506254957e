// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line interface.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use idseal_core::error::IdsealError;
use idseal_core::{BatchConfig, ConversionMode, LogLevel};

/// Input root used by `--debug` when none is given.
const DEBUG_INPUT: &str = "./.local";

#[derive(Debug, Parser)]
#[command(name = "idseal", version)]
#[command(about = "Convert DOCX forms into PDFs or ZIP archives locked with the identifier they carry")]
pub struct Cli {
    /// Input root directory
    pub input: Option<PathBuf>,

    /// Output directory [default: ./out]
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Conversion mode [default: pdf]
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Log file [default: log.txt]
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log verbosity [default: info]
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LevelArg>,

    /// Debug logging; use ./.local when INPUT is absent
    #[arg(short, long)]
    pub debug: bool,

    /// Renderer timeout in seconds [default: 120]
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Renderer executable [default: soffice]
    #[arg(long, value_name = "PROGRAM")]
    pub soffice: Option<PathBuf>,

    /// Document suffix [default: docx]
    #[arg(long, value_name = "EXT")]
    pub suffix: Option<String>,

    /// JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Pdf,
    Zip,
}

impl From<ModeArg> for ConversionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Pdf => ConversionMode::Pdf,
            ModeArg::Zip => ConversionMode::Zip,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LevelArg> for LogLevel {
    fn from(level: LevelArg) -> Self {
        match level {
            LevelArg::Error => LogLevel::Error,
            LevelArg::Warn => LogLevel::Warn,
            LevelArg::Info => LogLevel::Info,
            LevelArg::Debug => LogLevel::Debug,
            LevelArg::Trace => LogLevel::Trace,
        }
    }
}

impl Cli {
    /// Defaults, then the `--config` file, then flags.
    pub fn resolve_config(&self) -> Result<BatchConfig, IdsealError> {
        let base = match &self.config {
            Some(path) => BatchConfig::from_json_file(path).map_err(|err| {
                IdsealError::Config(format!("cannot load {}: {err}", path.display()))
            })?,
            None => BatchConfig::default(),
        };
        let config = self.apply(base);
        config.validate()?;
        Ok(config)
    }

    /// Overlay the flags that were given onto `config`.
    pub fn apply(&self, mut config: BatchConfig) -> BatchConfig {
        if let Some(out) = &self.out {
            config.output_dir = out.clone();
        }
        if let Some(mode) = self.mode {
            config.mode = mode.into();
        }
        if let Some(log_file) = &self.log_file {
            config.log_file = log_file.clone();
        }
        if self.debug {
            config.log_level = LogLevel::Debug;
            if config.default_input.is_none() {
                config.default_input = Some(PathBuf::from(DEBUG_INPUT));
            }
        }
        if let Some(level) = self.log_level {
            config.log_level = level.into();
        }
        if let Some(secs) = self.timeout {
            config.render_timeout_secs = secs;
        }
        if let Some(program) = &self.soffice {
            config.renderer_program = program.clone();
        }
        if let Some(suffix) = &self.suffix {
            config.document_suffix = suffix.clone();
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("idseal").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn no_flags_means_defaults() {
        let cli = parse(&[]);
        assert!(cli.input.is_none());
        assert_eq!(cli.resolve_config().unwrap(), BatchConfig::default());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = parse(&["forms", "-o", "sealed", "-m", "zip", "--timeout", "30", "--suffix", ".DOCX"]);
        let config = cli.resolve_config().unwrap();

        assert_eq!(cli.input, Some(PathBuf::from("forms")));
        assert_eq!(config.output_dir, PathBuf::from("sealed"));
        assert_eq!(config.mode, ConversionMode::Zip);
        assert_eq!(config.render_timeout_secs, 30);
        assert_eq!(config.suffix(), "DOCX");
    }

    #[test]
    fn flags_override_the_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("idseal.json");
        std::fs::write(&path, r#"{ "mode": "zip", "log_level": "warn", "output_dir": "from-file" }"#)
            .unwrap();

        let cli = parse(&["-c", path.to_str().unwrap(), "--mode", "pdf"]);
        let config = cli.resolve_config().unwrap();

        assert_eq!(config.mode, ConversionMode::Pdf);
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.output_dir, PathBuf::from("from-file"));
    }

    #[test]
    fn debug_enables_the_local_fallback() {
        let config = parse(&["-d"]).resolve_config().unwrap();
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.default_input, Some(PathBuf::from("./.local")));

        let explicit = parse(&["-d", "--log-level", "trace"]).resolve_config().unwrap();
        assert_eq!(explicit.log_level, LogLevel::Trace);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = parse(&["--timeout", "0"]).resolve_config().unwrap_err();
        assert!(matches!(err, IdsealError::Config(_)));
    }

    #[test]
    fn unreadable_config_file_is_a_config_error() {
        let err = parse(&["-c", "/definitely/not/here.json"]).resolve_config().unwrap_err();
        assert!(matches!(err, IdsealError::Config(_)));
    }

    #[test]
    fn unknown_mode_is_rejected_by_the_parser() {
        assert!(Cli::try_parse_from(["idseal", "-m", "tar"]).is_err());
    }
}
