// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch pipeline — orchestration, per-item conversion, artifact cleanup.

pub mod cleanup;
pub mod convert;
pub mod orchestrator;

pub use orchestrator::run;
