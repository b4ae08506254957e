// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Error categories used as log prefixes.
//
// Every `IdsealError` maps to exactly one category. The batch loop logs
// per-item failures under the category label; startup categories are the
// only ones that end the process.

use crate::error::IdsealError;

/// Which stage of the pipeline an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The document could not be opened or parsed.
    Document,
    /// The document opened but the identifier table/cell is missing or empty.
    Structure,
    /// The external renderer failed or timed out.
    Conversion,
    /// Building the encrypted ZIP archive failed.
    Archive,
    /// Reading or encrypting the PDF failed.
    Pdf,
    /// Missing or unusable startup configuration. Fatal.
    Startup,
    /// Anything else (I/O, serialisation). Still logged with its context.
    Unexpected,
}

impl ErrorCategory {
    /// Prefix written in front of per-item error lines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Document => "Document error",
            Self::Structure => "Structure error",
            Self::Conversion => "Conversion error",
            Self::Archive => "Zipping error",
            Self::Pdf => "PDF error",
            Self::Startup => "Startup error",
            Self::Unexpected => "Unknown error",
        }
    }

    /// Whether an error of this category ends the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Startup)
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl IdsealError {
    /// Classify this error. Exhaustive on purpose: a new variant must pick a
    /// category here.
    pub fn category(&self) -> ErrorCategory {
        match self {
            IdsealError::DocumentOpen { .. } => ErrorCategory::Document,

            IdsealError::MissingTable { .. }
            | IdsealError::MissingCell { .. }
            | IdsealError::EmptyIdentifier { .. } => ErrorCategory::Structure,

            IdsealError::Render { .. } | IdsealError::RenderTimeout { .. } => {
                ErrorCategory::Conversion
            }

            IdsealError::Archive { .. } => ErrorCategory::Archive,
            IdsealError::Pdf { .. } => ErrorCategory::Pdf,

            IdsealError::InputRoot { .. } | IdsealError::Config(_) | IdsealError::NoInput => {
                ErrorCategory::Startup
            }

            IdsealError::Io(_) | IdsealError::Serialization(_) => ErrorCategory::Unexpected,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use super::*;

    #[test]
    fn conversion_failures_share_a_label() {
        let render = IdsealError::Render {
            path: PathBuf::from("c.docx"),
            detail: "exit status 1".into(),
        };
        let timeout = IdsealError::RenderTimeout {
            path: PathBuf::from("c.docx"),
            timeout: Duration::from_secs(5),
        };
        assert_eq!(render.category().label(), "Conversion error");
        assert_eq!(timeout.category(), render.category());
    }

    #[test]
    fn only_startup_is_fatal() {
        assert!(IdsealError::NoInput.category().is_fatal());
        assert!(IdsealError::Config("bad".into()).category().is_fatal());

        let io = IdsealError::Io(std::io::Error::other("disk full"));
        assert_eq!(io.category(), ErrorCategory::Unexpected);
        assert!(!io.category().is_fatal());
        assert_eq!(io.category().label(), "Unknown error");
    }

    #[test]
    fn structure_errors_are_grouped() {
        let path = PathBuf::from("b.docx");
        let missing = IdsealError::MissingTable {
            path: path.clone(),
            table: 2,
            found: 1,
        };
        let empty = IdsealError::EmptyIdentifier { path };
        assert_eq!(missing.category(), ErrorCategory::Structure);
        assert_eq!(empty.category(), ErrorCategory::Structure);
    }
}
