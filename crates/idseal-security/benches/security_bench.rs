// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for PDF encryption and identifier fingerprinting in
// the idseal-security crate.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use idseal_core::Identifier;
use idseal_document::testing::sample_pdf;
use idseal_security::{PdfLocker, fingerprint};
use lopdf::Document;

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Benchmark locking a small three-page PDF, including serialisation.
fn bench_pdf_lock(c: &mut Criterion) {
    let bytes = sample_pdf(&["one", "two", "three"]);
    let id = Identifier::parse("700101/1234").expect("identifier");
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("bench.pdf");

    c.bench_function("pdf_lock (3 pages)", |b| {
        b.iter(|| {
            let doc = Document::load_mem(black_box(&bytes)).expect("load");
            PdfLocker::new(&id).lock_to_file(doc, &out).expect("lock");
        });
    });
}

/// Benchmark the SHA-256 fingerprint used in log lines.
fn bench_fingerprint(c: &mut Criterion) {
    let id = Identifier::parse("700101/1234").expect("identifier");
    c.bench_function("fingerprint", |b| {
        b.iter(|| black_box(fingerprint(black_box(&id))));
    });
}

criterion_group!(benches, bench_pdf_lock, bench_fingerprint);
criterion_main!(benches);
