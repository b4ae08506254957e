// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Converter/encryptor — render one work item and lock the result with its
// identifier.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use idseal_core::error::IdsealError;
use idseal_core::{BatchConfig, ConversionMode, DocumentRef, OutputPaths, WorkItem};
use idseal_document::{PdfReader, Renderer};
use idseal_security::{PdfLocker, fingerprint, write_encrypted_zip};
use tracing::{error, info, instrument, warn};

use super::cleanup::ArtifactGuard;

/// Turns work items into encrypted artifacts in the output directory.
pub struct Converter<R> {
    renderer: R,
    output_dir: PathBuf,
    mode: ConversionMode,
    timeout: Duration,
    /// Output stem → document whose artifact holds that name in this run.
    written: HashMap<String, DocumentRef>,
}

impl<R: Renderer> Converter<R> {
    pub fn new(renderer: R, output_dir: impl Into<PathBuf>, config: &BatchConfig) -> Self {
        Self {
            renderer,
            output_dir: output_dir.into(),
            mode: config.mode,
            timeout: config.render_timeout(),
            written: HashMap::new(),
        }
    }

    /// Convert one item and log the outcome. Returns whether it succeeded.
    ///
    /// Failures never propagate: the item's artifacts are already gone and
    /// the batch moves on. An item whose output name already belongs to an
    /// earlier document of this run is skipped, leaving that artifact alone.
    pub async fn process(&mut self, item: &WorkItem) -> bool {
        let stem = item.document.stem();
        if let Some(earlier) = self.written.get(&stem)
            && *earlier != item.document
        {
            warn!(
                "\"{}\" has the same output name \"{stem}\" as \"{earlier}\", skipping \"{}\"",
                item.document, item.document
            );
            return false;
        }

        match self.convert(item).await {
            Ok(output) => {
                self.written.insert(stem, item.document.clone());
                let noun = match self.mode {
                    ConversionMode::Pdf => "PDF",
                    ConversionMode::Zip => "ZIP",
                };
                info!(
                    key = %fingerprint(&item.identifier),
                    "Created {noun} \"{}\"",
                    output.display()
                );
                true
            }
            Err(err) => {
                log_failure(&item.document, &err);
                false
            }
        }
    }

    /// Render, then encrypt according to the configured mode.
    ///
    /// Returns the path of the final artifact. Every artifact name of the
    /// item is removed on the way out except the returned one, so a failure
    /// leaves none of them and a success leaves only the final artifact.
    #[instrument(skip_all, fields(document = %item.document))]
    pub async fn convert(&self, item: &WorkItem) -> Result<PathBuf, IdsealError> {
        let paths = OutputPaths::for_document(&self.output_dir, &item.document);
        let mut guard = ArtifactGuard::new();
        for path in paths.all() {
            guard.track(path);
        }

        match self.mode {
            ConversionMode::Pdf => {
                self.render(&item.document, &paths.temp_pdf).await?;
                let document = PdfReader::open(&paths.temp_pdf)?.rebuild()?;
                PdfLocker::new(&item.identifier).lock_to_file(document, &paths.pdf)?;

                guard.keep(&paths.pdf);
                Ok(paths.pdf)
            }
            ConversionMode::Zip => {
                self.render(&item.document, &paths.pdf).await?;
                write_encrypted_zip(&paths.pdf, &paths.zip, &item.identifier)?;

                guard.keep(&paths.zip);
                Ok(paths.zip)
            }
        }
    }

    async fn render(&self, document: &DocumentRef, destination: &Path) -> Result<(), IdsealError> {
        let rendering = self.renderer.render(document.path(), destination);
        match tokio::time::timeout(self.timeout, rendering).await {
            Ok(result) => result,
            Err(_elapsed) => Err(IdsealError::RenderTimeout {
                path: document.path().to_path_buf(),
                timeout: self.timeout,
            }),
        }
    }
}

fn log_failure(document: &DocumentRef, err: &IdsealError) {
    let category = err.category();
    match err {
        IdsealError::Render { detail, .. } => {
            error!(%detail, "{category}: \"{document}\" failed converting to PDF");
        }
        IdsealError::RenderTimeout { timeout, .. } => {
            error!(
                timeout_secs = timeout.as_secs(),
                "{category}: \"{document}\" timed out converting to PDF"
            );
        }
        IdsealError::Archive { detail, .. } => {
            error!(%detail, "{category}: \"{document}\" failed creating ZIP");
        }
        IdsealError::Pdf { path, detail } => {
            error!(%detail, "{category}: \"{}\" failed encrypting PDF", path.display());
        }
        other => {
            error!(error = %other, "{category}: \"{document}\"");
        }
    }
}
