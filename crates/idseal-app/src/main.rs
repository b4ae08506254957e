// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// idseal — batch-convert DOCX forms into identifier-locked PDFs or ZIPs.
//
// Entry point. Parses flags, resolves configuration, initialises logging,
// and runs one batch over the input folder.

mod cli;
mod logging;
mod pipeline;
mod services;

use std::process::ExitCode;

use clap::Parser;
use idseal_core::BatchConfig;
use idseal_core::error::IdsealError;
use idseal_document::LibreOfficeRenderer;
use tracing::{debug, error, info};

use cli::Cli;
use services::workspace;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logging needs a destination before the configuration is known to be
    // valid, so a broken config file still gets reported in the log.
    let resolved = cli.resolve_config();
    let log_config = match &resolved {
        Ok(config) => config.clone(),
        Err(_) => cli.apply(BatchConfig::default()),
    };
    if let Err(err) = logging::init(&log_config) {
        eprintln!("idseal: {err}");
    }

    let config = match resolved {
        Ok(config) => config,
        Err(err) => return fail(&err),
    };
    debug!(?config, "configuration resolved");

    let input_root = match workspace::input_root(cli.input.as_deref(), &config) {
        Ok(root) => root,
        Err(err) => return fail(&err),
    };

    let renderer = LibreOfficeRenderer::new(&config.renderer_program);
    match pipeline::run(&config, &input_root, renderer).await {
        Ok(report) => {
            info!(
                converted = report.converted,
                failed = report.failed,
                "idseal finished"
            );
            ExitCode::SUCCESS
        }
        Err(err) => fail(&err),
    }
}

/// Log a startup error and pick the exit status.
fn fail(err: &IdsealError) -> ExitCode {
    match err {
        IdsealError::NoInput => error!("Not enough arguments, shutting down"),
        other => error!("{}: {other}, shutting down", other.category()),
    }
    ExitCode::FAILURE
}
