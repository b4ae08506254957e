// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// idseal — Core types, configuration, and error definitions shared across all crates.

pub mod category;
pub mod config;
pub mod error;
pub mod types;

pub use category::ErrorCategory;
pub use config::{BatchConfig, ConversionMode, LogLevel};
pub use error::IdsealError;
pub use types::*;
