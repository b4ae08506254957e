// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — open a rendered PDF and copy its pages into a fresh document
// using the `lopdf` crate.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use idseal_core::error::IdsealError;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use tracing::{debug, instrument, warn};

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against malformed, cyclic /Parent chains.
const MAX_TREE_DEPTH: usize = 64;

/// Reads an existing PDF file.
///
/// Wraps `lopdf::Document`; [`PdfReader::rebuild`] produces a new document
/// holding only the pages, ready to be encrypted.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
    /// Source path, if opened from a file (used in error messages).
    source_path: Option<PathBuf>,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, IdsealError> {
        let path_ref = path.as_ref();
        debug!("Opening PDF: {}", path_ref.display());

        let document = Document::load(path_ref).map_err(|err| IdsealError::Pdf {
            path: path_ref.to_path_buf(),
            detail: format!("failed to open: {err}"),
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");

        Ok(Self {
            document,
            source_path: Some(path_ref.to_path_buf()),
        })
    }

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, IdsealError> {
        let document = Document::load_mem(data).map_err(|err| IdsealError::Pdf {
            path: PathBuf::from("<memory>"),
            detail: format!("failed to load PDF from memory: {err}"),
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self {
            document,
            source_path: None,
        })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Return the source path if the reader was created via [`PdfReader::open`].
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    // -- Rebuild --------------------------------------------------------------

    /// Copy every page, in order, into a new document with its own catalog
    /// and a flat page tree.
    ///
    /// Inherited page attributes are materialised on each copied page.
    /// Objects shared between pages (fonts, images) are copied once.
    /// Document-level structures (outlines, forms, metadata) are not carried
    /// over.
    #[instrument(skip(self))]
    pub fn rebuild(&self) -> Result<Document, IdsealError> {
        let source = &self.document;
        let mut target = Document::with_version(source.version.clone());
        let pages_id = target.new_object_id();
        let mut copier = ObjectCopier::new(source);

        // Reserve target ids for all pages first so that references to a
        // page (e.g. an annotation's /P) land on the copy instead of pulling
        // in the source page tree.
        let pages = source.get_pages();
        let mut reserved = Vec::with_capacity(pages.len());
        for (&number, &page_id) in &pages {
            let new_id = target.new_object_id();
            copier.mapped.insert(page_id, new_id);
            reserved.push((number, page_id, new_id));
        }

        let mut kids = Vec::with_capacity(reserved.len());
        for (number, page_id, new_id) in reserved {
            let page = source.get_dictionary(page_id).map_err(|err| self.error(format!(
                "page {number} is not a dictionary: {err}"
            )))?;

            let mut flattened = page.clone();
            for key in INHERITABLE {
                if !flattened.has(key)
                    && let Some(value) = inherited(source, page, key)
                {
                    flattened.set(key.to_vec(), value.clone());
                }
            }

            let mut copied = copier.copy_dictionary(&mut target, &flattened);
            copied.set("Parent", Object::Reference(pages_id));
            target.objects.insert(new_id, Object::Dictionary(copied));
            kids.push(Object::Reference(new_id));
        }

        let count = kids.len() as i64;
        target.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = target.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        target.trailer.set("Root", catalog_id);

        debug!(pages = count, objects = target.objects.len(), "PDF rebuilt");
        Ok(target)
    }

    // -- Helpers --------------------------------------------------------------

    fn error(&self, detail: String) -> IdsealError {
        IdsealError::Pdf {
            path: self
                .source_path
                .clone()
                .unwrap_or_else(|| PathBuf::from("<memory>")),
            detail,
        }
    }
}

/// Find `key` on the nearest ancestor of `page` that defines it.
fn inherited<'a>(document: &'a Document, page: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
    let mut current = page;
    for _ in 0..MAX_TREE_DEPTH {
        let parent_id = current.get(b"Parent").ok()?.as_reference().ok()?;
        let parent = document.get_dictionary(parent_id).ok()?;
        if let Ok(value) = parent.get(key) {
            return Some(value);
        }
        current = parent;
    }
    None
}

/// Copies objects from `source` into a target document, following
/// references.
///
/// Every source object is copied at most once; `mapped` remembers where it
/// went, which also terminates reference cycles. `/Parent` entries are
/// dropped; the caller re-links pages to the new page tree.
struct ObjectCopier<'s> {
    source: &'s Document,
    mapped: BTreeMap<ObjectId, ObjectId>,
}

impl<'s> ObjectCopier<'s> {
    fn new(source: &'s Document) -> Self {
        Self {
            source,
            mapped: BTreeMap::new(),
        }
    }

    fn copy(&mut self, target: &mut Document, object: &Object) -> Object {
        match object {
            Object::Reference(id) => Object::Reference(self.copy_reference(target, *id)),
            Object::Dictionary(dict) => Object::Dictionary(self.copy_dictionary(target, dict)),
            Object::Array(items) => {
                let mut copied = Vec::with_capacity(items.len());
                for item in items {
                    copied.push(self.copy(target, item));
                }
                Object::Array(copied)
            }
            Object::Stream(stream) => {
                let dict = self.copy_dictionary(target, &stream.dict);
                let mut copied = Stream::new(dict, stream.content.clone());
                copied.allows_compression = stream.allows_compression;
                Object::Stream(copied)
            }
            // Booleans, numbers, strings, names and null copy as-is.
            other => other.clone(),
        }
    }

    fn copy_dictionary(&mut self, target: &mut Document, dict: &Dictionary) -> Dictionary {
        let mut copied = Dictionary::new();
        for (key, value) in dict.iter() {
            if key == b"Parent" {
                continue;
            }
            let value = self.copy(target, value);
            copied.set(key.clone(), value);
        }
        copied
    }

    fn copy_reference(&mut self, target: &mut Document, id: ObjectId) -> ObjectId {
        if let Some(&mapped) = self.mapped.get(&id) {
            return mapped;
        }
        let new_id = target.new_object_id();
        self.mapped.insert(id, new_id);

        let source = self.source;
        let copied = match source.get_object(id) {
            Ok(object) => self.copy(target, object),
            Err(err) => {
                warn!(?id, %err, "Cannot resolve reference, using Null");
                Object::Null
            }
        };
        target.objects.insert(new_id, copied);
        new_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_pdf;

    #[test]
    fn rebuild_keeps_every_page_in_order() {
        let reader = PdfReader::from_bytes(&sample_pdf(&["one", "two", "three"])).unwrap();
        assert_eq!(reader.page_count(), 3);

        let rebuilt = reader.rebuild().unwrap();
        let pages = rebuilt.get_pages();
        assert_eq!(pages.len(), 3);

        for (number, expected) in [(1u32, "one"), (2, "two"), (3, "three")] {
            let content = rebuilt.get_page_content(pages[&number]).unwrap();
            assert!(String::from_utf8_lossy(&content).contains(expected));
        }
    }

    #[test]
    fn inherited_attributes_are_materialised() {
        let reader = PdfReader::from_bytes(&sample_pdf(&["only"])).unwrap();
        let rebuilt = reader.rebuild().unwrap();

        let page_id = rebuilt.get_pages()[&1];
        let page = rebuilt.get_dictionary(page_id).unwrap();
        assert!(page.has(b"MediaBox"));
        assert!(page.has(b"Resources"));
        assert_eq!(
            page.get(b"Parent").unwrap().as_reference().unwrap(),
            rebuilt
                .catalog()
                .unwrap()
                .get(b"Pages")
                .unwrap()
                .as_reference()
                .unwrap()
        );
    }

    #[test]
    fn shared_resources_are_copied_once() {
        let reader = PdfReader::from_bytes(&sample_pdf(&["a", "b"])).unwrap();
        let rebuilt = reader.rebuild().unwrap();

        let pages = rebuilt.get_pages();
        let resources = |n: u32| {
            rebuilt
                .get_dictionary(pages[&n])
                .unwrap()
                .get(b"Resources")
                .unwrap()
                .as_reference()
                .unwrap()
        };
        assert_eq!(resources(1), resources(2));
    }

    #[test]
    fn rebuilt_document_serialises_and_reloads() {
        let reader = PdfReader::from_bytes(&sample_pdf(&["a", "b"])).unwrap();
        let mut rebuilt = reader.rebuild().unwrap();

        let mut bytes = Vec::new();
        rebuilt.save_to(&mut bytes).unwrap();
        assert_eq!(PdfReader::from_bytes(&bytes).unwrap().page_count(), 2);
    }

    #[test]
    fn garbage_is_a_pdf_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.temp.pdf");
        std::fs::write(&path, b"not a pdf").unwrap();

        let err = PdfReader::open(&path).err().unwrap();
        assert!(matches!(err, IdsealError::Pdf { .. }));
    }
}
