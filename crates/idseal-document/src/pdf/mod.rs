// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — reading rendered PDFs and rebuilding their page tree.

pub mod reader;

pub use reader::PdfReader;
