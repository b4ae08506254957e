// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DOCX module — open a WordprocessingML package and expose its body tables.

pub mod package;
pub mod table;

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use idseal_core::error::IdsealError;
use tracing::{debug, instrument};
use zip::ZipArchive;

pub use table::{Cell, Row, Table, VMerge};

/// The tables of an opened DOCX document.
#[derive(Debug, Clone)]
pub struct DocxDocument {
    tables: Vec<Table>,
}

impl DocxDocument {
    /// Open a DOCX file from the filesystem.
    ///
    /// Any failure (not a ZIP, no main part, malformed XML) is reported as
    /// `IdsealError::DocumentOpen`.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, IdsealError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| IdsealError::DocumentOpen {
            path: path.to_path_buf(),
            detail: err.to_string(),
        })?;
        Self::from_reader(BufReader::new(file), path)
    }

    /// Parse a DOCX package from any seekable reader. `path` is only used in
    /// error messages.
    pub fn from_reader<R: Read + Seek>(reader: R, path: &Path) -> Result<Self, IdsealError> {
        let open_error = |detail: String| IdsealError::DocumentOpen {
            path: path.to_path_buf(),
            detail,
        };

        let mut archive =
            ZipArchive::new(reader).map_err(|err| open_error(format!("not a DOCX package: {err}")))?;
        let xml = package::read_main_part(&mut archive).map_err(open_error)?;
        let tables = table::parse_tables(&xml)
            .map_err(|err| open_error(format!("malformed document XML: {err}")))?;

        debug!(tables = tables.len(), "DOCX loaded");
        Ok(Self { tables })
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table(&self, index: usize) -> Option<&Table> {
        self.tables.get(index)
    }
}
