// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for document processing in the idseal-document crate.
// Covers the two per-document hot paths that do not shell out: reading the
// identifier from a DOCX form and rebuilding a rendered PDF.

use std::io::Cursor;
use std::path::Path;

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use idseal_document::testing::{docx_bytes, sample_pdf};
use idseal_document::{DocxDocument, PdfReader};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Benchmark opening a three-table form and reading the identifier cell.
fn bench_docx_tables(c: &mut Criterion) {
    let filler = vec![vec!["name", "surname", "date"]; 20];
    let target = vec![vec!["field", "note", "birth number"], vec!["id", "", "700101/1234"]];
    let bytes = docx_bytes(&[filler.clone(), filler, target]);

    c.bench_function("docx_tables (3 tables)", |b| {
        b.iter(|| {
            let doc = DocxDocument::from_reader(Cursor::new(black_box(&bytes)), Path::new("bench.docx"))
                .expect("open docx");
            black_box(doc.table(2).and_then(|t| t.cell_text(1, 2)).map(str::len));
        });
    });
}

/// Benchmark rebuilding a ten-page PDF into a fresh document.
fn bench_pdf_rebuild(c: &mut Criterion) {
    let pages: Vec<String> = (1..=10).map(|n| format!("page {n}")).collect();
    let refs: Vec<&str> = pages.iter().map(String::as_str).collect();
    let bytes = sample_pdf(&refs);
    let reader = PdfReader::from_bytes(&bytes).expect("load pdf");

    c.bench_function("pdf_rebuild (10 pages)", |b| {
        b.iter(|| black_box(reader.rebuild().expect("rebuild")));
    });
}

criterion_group!(benches, bench_docx_tables, bench_pdf_rebuild);
criterion_main!(benches);
