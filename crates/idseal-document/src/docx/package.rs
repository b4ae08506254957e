// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OOXML package access — locate and read the main document part of a DOCX
// ZIP container.

use std::io::{Read, Seek};

use quick_xml::Reader;
use quick_xml::events::Event;
use zip::ZipArchive;

/// Package-level relationships part.
const ROOT_RELS: &str = "_rels/.rels";
/// Where Word puts the main part when the relationships say nothing.
const DEFAULT_MAIN_PART: &str = "word/document.xml";
/// Relationship type suffix of the main document part.
const OFFICE_DOCUMENT_REL: &str = "/officeDocument";

/// Read the XML of the main document part.
///
/// The part name is taken from the package relationships, falling back to
/// `word/document.xml`. Errors are returned as display strings; the caller
/// attaches the document path.
pub fn read_main_part<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<String, String> {
    let part = main_part_name(archive).unwrap_or_else(|| DEFAULT_MAIN_PART.to_string());
    read_part(archive, &part)
}

fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<String, String> {
    let mut entry = archive
        .by_name(name)
        .map_err(|err| format!("missing part {name}: {err}"))?;
    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|err| format!("cannot read part {name}: {err}"))?;
    Ok(xml)
}

/// Target of the `officeDocument` relationship, without a leading slash.
fn main_part_name<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Option<String> {
    let rels = read_part(archive, ROOT_RELS).ok()?;
    let mut reader = Reader::from_str(&rels);

    loop {
        match reader.read_event().ok()? {
            Event::Start(element) | Event::Empty(element)
                if element.local_name().as_ref() == b"Relationship" =>
            {
                let mut rel_type = None;
                let mut target = None;
                for attr in element.attributes().flatten() {
                    let value = attr.unescape_value().ok()?.into_owned();
                    match attr.key.local_name().as_ref() {
                        b"Type" => rel_type = Some(value),
                        b"Target" => target = Some(value),
                        _ => {}
                    }
                }
                if let (Some(rel_type), Some(target)) = (rel_type, target)
                    && rel_type.ends_with(OFFICE_DOCUMENT_REL)
                {
                    return Some(target.trim_start_matches('/').to_string());
                }
            }
            Event::Eof => return None,
            _ => {}
        }
    }
}
