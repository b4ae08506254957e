// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Identifier extraction — read the password cell out of a DOCX form.

use idseal_core::error::IdsealError;
use idseal_core::{DocumentRef, Identifier};
use tracing::{debug, error};

use crate::docx::DocxDocument;

/// Zero-based position of the identifier cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellLocation {
    /// Index among the body-level tables.
    pub table: usize,
    pub row: usize,
    pub column: usize,
}

impl Default for CellLocation {
    /// Third table, second row, third column.
    fn default() -> Self {
        Self {
            table: 2,
            row: 1,
            column: 2,
        }
    }
}

/// Reads identifiers from a fixed cell of each document.
#[derive(Debug, Clone, Default)]
pub struct IdentifierExtractor {
    location: CellLocation,
}

impl IdentifierExtractor {
    pub fn new(location: CellLocation) -> Self {
        Self { location }
    }

    pub fn location(&self) -> CellLocation {
        self.location
    }

    /// Open `document` and return the trimmed text of the identifier cell.
    pub fn extract(&self, document: &DocumentRef) -> Result<Identifier, IdsealError> {
        let docx = DocxDocument::open(document.path())?;
        let path = document.path().to_path_buf();

        let table = docx
            .table(self.location.table)
            .ok_or_else(|| IdsealError::MissingTable {
                path: path.clone(),
                table: self.location.table,
                found: docx.tables().len(),
            })?;

        let text = table
            .cell_text(self.location.row, self.location.column)
            .ok_or_else(|| IdsealError::MissingCell {
                path: path.clone(),
                row: self.location.row,
                column: self.location.column,
            })?;

        Identifier::parse(text).ok_or(IdsealError::EmptyIdentifier { path })
    }

    /// Like [`extract`](Self::extract), but logs the failure and returns
    /// `None`. Each failure mode has its own message.
    pub fn extract_or_log(&self, document: &DocumentRef) -> Option<Identifier> {
        match self.extract(document) {
            Ok(identifier) => {
                debug!(path = %document, "identifier found");
                Some(identifier)
            }
            Err(err) => {
                log_failure(document, &err);
                None
            }
        }
    }
}

fn log_failure(document: &DocumentRef, err: &IdsealError) {
    let category = err.category();
    match err {
        IdsealError::DocumentOpen { detail, .. } => {
            error!(%detail, "{category}: failed opening \"{document}\"");
        }
        IdsealError::MissingTable { table, found, .. } => {
            error!(found, "{category}: no table at index {table} in \"{document}\"");
        }
        IdsealError::MissingCell { row, column, .. } => {
            error!(row, column, "{category}: cell not found in \"{document}\"");
        }
        IdsealError::EmptyIdentifier { .. } => {
            error!("{category}: identifier cell is empty in \"{document}\"");
        }
        other => {
            error!(error = %other, "{category}: \"{document}\"");
        }
    }
}
