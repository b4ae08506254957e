// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch orchestration: discover → extract → map → convert.

use std::fmt;
use std::path::Path;

use idseal_core::error::IdsealError;
use idseal_core::{BatchConfig, DocumentRef, WorkItems};
use idseal_document::{IdentifierExtractor, Renderer, discover};
use tracing::{info, warn};

use super::convert::Converter;
use crate::services::workspace;

/// Counts for one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Documents found under the input root.
    pub discovered: usize,
    /// Documents without a usable identifier.
    pub dropped: usize,
    /// Documents displaced by a later one with the same identifier.
    pub duplicates: usize,
    pub converted: usize,
    pub failed: usize,
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} discovered, {} without identifier, {} duplicate, {} converted, {} failed",
            self.discovered, self.dropped, self.duplicates, self.converted, self.failed
        )
    }
}

/// Collect identifiers for `documents`; documents without one are dropped.
///
/// Returns the mapping plus the (dropped, duplicates) counts.
pub fn build_work_items(
    extractor: &IdentifierExtractor,
    documents: &[DocumentRef],
) -> (WorkItems, usize, usize) {
    let mut items = WorkItems::new();
    let mut dropped = 0;
    let mut duplicates = 0;

    for document in documents {
        let Some(identifier) = extractor.extract_or_log(document) else {
            dropped += 1;
            continue;
        };
        if let Some(displaced) = items.insert(identifier, document.clone()) {
            duplicates += 1;
            warn!("\"{document}\" has the same identifier as \"{displaced}\", skipping \"{displaced}\"");
        }
    }
    (items, dropped, duplicates)
}

/// Run one batch over `input_root`.
///
/// Only startup problems (output directory, input root) are returned as
/// errors. Per-document failures are logged and counted.
pub async fn run<R: Renderer>(
    config: &BatchConfig,
    input_root: &Path,
    renderer: R,
) -> Result<BatchReport, IdsealError> {
    let output_dir = workspace::output_dir(config)?;
    let documents = discover(input_root, config.suffix())?;

    let extractor = IdentifierExtractor::default();
    let (items, dropped, duplicates) = build_work_items(&extractor, &documents);

    let mut report = BatchReport {
        discovered: documents.len(),
        dropped,
        duplicates,
        ..BatchReport::default()
    };

    let mut converter = Converter::new(renderer, output_dir, config);
    for item in items {
        if converter.process(&item).await {
            report.converted += 1;
        } else {
            report.failed += 1;
        }
    }

    info!("Finished folder \"{}\": {report}", input_root.display());
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use idseal_core::ConversionMode;
    use idseal_document::CellLocation;
    use idseal_document::testing::{sample_pdf, unlock_pdf, write_docx, write_identifier_docx};

    use super::*;
    use crate::logging::capture::LogCapture;

    /// Renders every source except `c.docx`.
    struct PickyRenderer;

    impl Renderer for PickyRenderer {
        async fn render(&self, source: &Path, destination: &Path) -> Result<(), IdsealError> {
            if source.file_name().is_some_and(|n| n == "c.docx") {
                return Err(IdsealError::Render {
                    path: source.to_path_buf(),
                    detail: "general input/output error".into(),
                });
            }
            fs::write(destination, sample_pdf(&["page"]))?;
            Ok(())
        }
    }

    fn config(out: &Path, mode: ConversionMode) -> BatchConfig {
        BatchConfig {
            output_dir: out.to_path_buf(),
            mode,
            ..BatchConfig::default()
        }
    }

    fn names(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn documents_without_identifier_are_skipped() {
        let input = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let out = work.path().join("out");
        write_identifier_docx(input.path().join("a.docx"), "700101/1234");
        write_docx(input.path().join("b.docx"), &[vec![vec!["only", "one", "table"]]]);

        let (capture, subscriber) = LogCapture::new("info");
        let _default = tracing::subscriber::set_default(subscriber);

        let report = run(&config(&out, ConversionMode::Pdf), input.path(), PickyRenderer)
            .await
            .unwrap();

        assert_eq!(
            report,
            BatchReport {
                discovered: 2,
                dropped: 1,
                duplicates: 0,
                converted: 1,
                failed: 0,
            }
        );
        assert_eq!(names(&out), vec!["a.pdf"]);
        let bytes = fs::read(out.join("a.pdf")).unwrap();
        assert!(unlock_pdf(&bytes, "700101/1234").is_some());

        let logs = capture.contents();
        let errors: Vec<_> = logs.lines().filter(|l| l.starts_with("[ERROR]")).collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("b.docx"));
        assert!(!logs.contains("700101/1234"));
    }

    #[test]
    fn missing_table_log_names_the_configured_index() {
        let input = tempfile::tempdir().unwrap();
        let path = input.path().join("a.docx");
        write_identifier_docx(&path, "700101/1234");

        let (capture, subscriber) = LogCapture::new("info");
        let _default = tracing::subscriber::set_default(subscriber);

        let extractor = IdentifierExtractor::new(CellLocation {
            table: 5,
            row: 1,
            column: 2,
        });
        let (items, dropped, _) = build_work_items(&extractor, &[DocumentRef::new(&path)]);

        assert!(items.is_empty());
        assert_eq!(dropped, 1);
        let logs = capture.contents();
        assert!(logs.contains("Structure error: no table at index 5 in"));
        assert!(logs.contains("found=3"));
    }

    #[tokio::test]
    async fn failed_render_does_not_stop_the_batch() {
        let input = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write_identifier_docx(input.path().join("a.docx"), "111");
        write_identifier_docx(input.path().join("c.docx"), "333");
        write_identifier_docx(input.path().join("e.docx"), "555");

        let report = run(&config(out.path(), ConversionMode::Pdf), input.path(), PickyRenderer)
            .await
            .unwrap();

        assert_eq!(report.converted, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(names(out.path()), vec!["a.pdf", "e.pdf"]);
    }

    #[tokio::test]
    async fn zip_mode_leaves_only_archives() {
        let input = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write_identifier_docx(input.path().join("d.docx"), "990101/5678");

        let report = run(&config(out.path(), ConversionMode::Zip), input.path(), PickyRenderer)
            .await
            .unwrap();

        assert_eq!(report.converted, 1);
        assert_eq!(names(out.path()), vec!["d.zip"]);

        let mut archive = zip::ZipArchive::new(fs::File::open(out.path().join("d.zip")).unwrap()).unwrap();
        assert!(archive.by_name_decrypt("d.pdf", b"990101/5678").is_ok());
    }

    #[tokio::test]
    async fn last_document_with_an_identifier_wins() {
        let input = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write_identifier_docx(input.path().join("first.docx"), "700101/1234");
        write_identifier_docx(input.path().join("second.docx"), "700101/1234");

        let report = run(&config(out.path(), ConversionMode::Pdf), input.path(), PickyRenderer)
            .await
            .unwrap();

        assert_eq!(report.duplicates, 1);
        assert_eq!(report.converted, 1);
        assert_eq!(names(out.path()), vec!["second.pdf"]);
    }

    #[tokio::test]
    async fn missing_input_root_is_a_startup_error() {
        let out = tempfile::tempdir().unwrap();
        let err = run(
            &config(out.path(), ConversionMode::Pdf),
            &out.path().join("missing"),
            PickyRenderer,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, IdsealError::InputRoot { .. }));
        assert!(err.category().is_fatal());
    }

    #[test]
    fn report_summary_reads_naturally() {
        let report = BatchReport {
            discovered: 3,
            dropped: 1,
            duplicates: 0,
            converted: 1,
            failed: 1,
        };
        assert_eq!(
            report.to_string(),
            "3 discovered, 1 without identifier, 0 duplicate, 1 converted, 1 failed"
        );
    }
}
