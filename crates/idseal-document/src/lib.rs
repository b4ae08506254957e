// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// idseal-document — Document handling for the idseal batch converter.
//
// Finds source documents, reads the identifier out of their tables, renders
// them to PDF through an external office suite, and copies rendered pages
// into a fresh document ready for encryption.

pub mod discovery;
pub mod docx;
pub mod extract;
pub mod pdf;
pub mod render;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

// Re-export the primary items so callers can use `idseal_document::PdfReader` etc.
pub use discovery::discover;
pub use docx::DocxDocument;
pub use extract::{CellLocation, IdentifierExtractor};
pub use pdf::reader::PdfReader;
pub use render::{LibreOfficeRenderer, Renderer};
