// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! idseal-security — password protection for generated artifacts.
//!
//! The identifier read from each document becomes the password of the PDF
//! (`pdf_lock`) or of the ZIP archive that carries it (`archive`). Log lines
//! refer to identifiers only through `fingerprint`.

pub mod archive;
pub mod fingerprint;
pub mod pdf_lock;

pub use archive::write_encrypted_zip;
pub use fingerprint::{fingerprint, hash_bytes};
pub use pdf_lock::PdfLocker;
