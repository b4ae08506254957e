// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for idseal.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A discovered source document. Never mutated after discovery.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentRef(PathBuf);

impl DocumentRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// File name without its extension; output artifacts are named after it.
    pub fn stem(&self) -> String {
        self.0
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string())
    }
}

impl std::fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// The value read from the identifier cell. Used as a map key and as the
/// password of the generated artifact, so it never prints itself.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// Trim `raw`; an empty result is no identifier at all.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The secret itself. Only the encryption layer should call this.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Identifier(<redacted>)")
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("<redacted>")
    }
}

/// One unit of work: a document and the password derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub identifier: Identifier,
    pub document: DocumentRef,
}

/// Identifier → document mapping, in first-insertion order.
///
/// Two documents carrying the same identifier cannot both be kept: the later
/// one replaces the earlier one and the displaced reference is handed back so
/// the caller can report it.
#[derive(Debug, Clone, Default)]
pub struct WorkItems {
    items: IndexMap<Identifier, DocumentRef>,
}

impl WorkItems {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair; returns the document previously mapped to `identifier`.
    pub fn insert(&mut self, identifier: Identifier, document: DocumentRef) -> Option<DocumentRef> {
        self.items.insert(identifier, document)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, identifier: &Identifier) -> Option<&DocumentRef> {
        self.items.get(identifier)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Identifier, &DocumentRef)> {
        self.items.iter()
    }
}

impl IntoIterator for WorkItems {
    type Item = WorkItem;
    type IntoIter = std::iter::Map<
        indexmap::map::IntoIter<Identifier, DocumentRef>,
        fn((Identifier, DocumentRef)) -> WorkItem,
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.items
            .into_iter()
            .map(into_work_item as fn((Identifier, DocumentRef)) -> WorkItem)
    }
}

fn into_work_item((identifier, document): (Identifier, DocumentRef)) -> WorkItem {
    WorkItem {
        identifier,
        document,
    }
}

/// Where the artifacts of one document land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// `<stem>.pdf`: the encrypted PDF, or the plain render in ZIP mode.
    pub pdf: PathBuf,
    /// `<stem>.temp.pdf`: the plain render in PDF mode.
    pub temp_pdf: PathBuf,
    /// `<stem>.zip`
    pub zip: PathBuf,
}

impl OutputPaths {
    pub fn for_document(output_dir: &Path, document: &DocumentRef) -> Self {
        let stem = document.stem();
        Self {
            pdf: output_dir.join(format!("{stem}.pdf")),
            temp_pdf: output_dir.join(format!("{stem}.temp.pdf")),
            zip: output_dir.join(format!("{stem}.zip")),
        }
    }

    pub fn all(&self) -> [&Path; 3] {
        [&self.pdf, &self.temp_pdf, &self.zip]
    }
}
