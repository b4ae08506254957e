// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Log setup: every event goes to the log file as `[LEVEL]: message key=value`.

use std::fmt;
use std::fs::OpenOptions;
use std::sync::Mutex;

use idseal_core::error::IdsealError;
use idseal_core::{BatchConfig, LogLevel};
use tracing::{Event, Subscriber, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::registry::LookupSpan;

/// `[LEVEL]: ` prefix, then the message and fields. No timestamps, targets
/// or span context.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelPrefixed;

impl<S, N> FormatEvent<S, N> for LevelPrefixed
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(writer, "[{}]: ", event.metadata().level())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// `RUST_LOG` if set and valid, otherwise the configured level.
pub fn env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()))
}

/// Build the subscriber for any writer. Split out so tests can capture
/// output.
pub fn subscriber<W>(filter: EnvFilter, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .event_format(LevelPrefixed)
        .with_writer(writer)
        .finish()
}

/// Install the global subscriber, appending to `config.log_file`.
///
/// If the file cannot be opened, logs go to stderr instead and a warning
/// says so.
pub fn init(config: &BatchConfig) -> Result<(), IdsealError> {
    let filter = env_filter(config.log_level);
    let opened = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file);

    let installed = match opened {
        Ok(file) => tracing::subscriber::set_global_default(subscriber(filter, Mutex::new(file))),
        Err(err) => {
            let installed =
                tracing::subscriber::set_global_default(subscriber(filter, std::io::stderr));
            warn!(
                error = %err,
                "Cannot open log file \"{}\", logging to stderr",
                config.log_file.display()
            );
            installed
        }
    };
    installed.map_err(|err| IdsealError::Config(format!("logging already initialised: {err}")))
}


#[cfg(test)]
mod tests {
    use tracing::{debug, error, info};

    use super::capture::LogCapture;

    #[test]
    fn lines_are_level_prefixed() {
        let (capture, subscriber) = LogCapture::new("info");

        tracing::subscriber::with_default(subscriber, || {
            info!("Starting on folder \"forms\"");
            error!(found = 1, "Structure error: no table at index 2 in \"b.docx\"");
            debug!("filtered out");
        });

        let out = capture.contents();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(
            lines,
            vec![
                "[INFO]: Starting on folder \"forms\"",
                "[ERROR]: Structure error: no table at index 2 in \"b.docx\" found=1",
            ]
        );
        assert!(!out.contains('\u{1b}'));
    }
}
