// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Test fixtures — minimal DOCX packages and PDFs built in memory.
//
// Compiled for this crate's tests and, behind the `test-support` feature,
// for the tests of dependent crates. Panics on failure like any test helper.

use std::io::{Cursor, Write};
use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::encryption::decrypt_object;
use lopdf::{Document, EncryptionState, Object, Stream, dictionary};
use quick_xml::escape::escape;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

/// A DOCX package whose body is exactly `body_xml` (WordprocessingML
/// children of `w:body`).
pub fn docx_from_body(body_xml: &str) -> Vec<u8> {
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body_xml}<w:sectPr/></w:body></w:document>"#
    );

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, body) in [
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", ROOT_RELS),
        ("word/document.xml", document.as_str()),
    ] {
        writer.start_file(name, options).expect("start docx part");
        writer.write_all(body.as_bytes()).expect("write docx part");
    }
    writer.finish().expect("finish docx").into_inner()
}

/// A DOCX package with one paragraph followed by the given tables
/// (`tables[t][row][column]`).
pub fn docx_bytes(tables: &[Vec<Vec<&str>>]) -> Vec<u8> {
    let mut body = String::from("<w:p><w:r><w:t>Form</w:t></w:r></w:p>");
    for table in tables {
        let columns = table.iter().map(Vec::len).max().unwrap_or(0);
        body.push_str("<w:tbl><w:tblGrid>");
        for _ in 0..columns {
            body.push_str("<w:gridCol/>");
        }
        body.push_str("</w:tblGrid>");
        for row in table {
            body.push_str("<w:tr>");
            for text in row {
                body.push_str(&format!(
                    "<w:tc><w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p></w:tc>",
                    escape(*text)
                ));
            }
            body.push_str("</w:tr>");
        }
        body.push_str("</w:tbl><w:p/>");
    }
    docx_from_body(&body)
}

pub fn write_docx(path: impl AsRef<Path>, tables: &[Vec<Vec<&str>>]) {
    std::fs::write(path, docx_bytes(tables)).expect("write docx fixture");
}

/// A form with three tables whose third table carries `identifier` at row
/// 1, column 2.
pub fn write_identifier_docx(path: impl AsRef<Path>, identifier: &str) {
    let filler = vec![vec!["name", "surname", "date"], vec!["Jan", "Novak", "1970"]];
    let target = vec![
        vec!["field", "note", "birth number"],
        vec!["id", "", identifier],
    ];
    write_docx(path, &[filler.clone(), filler, target]);
}

/// A PDF with one page per entry of `pages`, each showing its text.
///
/// Resources and the media box live on the page tree node so copies must
/// resolve inherited attributes.
pub fn sample_pdf(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode page content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("serialise sample pdf");
    bytes
}

/// Open a password-protected PDF and decrypt every object.
///
/// Returns `None` when `password` is neither the user nor the owner
/// password. `lopdf` only parses the objects of an encrypted file whose user
/// password is empty, so the trailer's `/Encrypt` key is renamed in place
/// (same length, offsets stay valid) to load the objects as stored, and the
/// decryption is then done here.
pub fn unlock_pdf(bytes: &[u8], password: &str) -> Option<Document> {
    let locked = Document::load_mem(bytes).expect("load encrypted pdf");
    assert!(locked.is_encrypted(), "pdf is not encrypted");
    locked.authenticate_password(password).ok()?;

    let key = b"/Encrypt";
    let at = bytes
        .windows(key.len())
        .rposition(|window| window == key)
        .expect("trailer /Encrypt entry");
    let mut raw = bytes.to_vec();
    raw[at + key.len() - 1] = b'X';

    let mut document = Document::load_mem(&raw).expect("load stored objects");
    let reference = document
        .trailer
        .remove(b"EncrypX")
        .expect("renamed /Encrypt entry");
    let encrypt_id = reference.as_reference().expect("/Encrypt is a reference");
    document.trailer.set("Encrypt", reference);

    let state = EncryptionState::decode(&document, password).expect("derive file key");
    for (&id, object) in document.objects.iter_mut() {
        if id != encrypt_id {
            decrypt_object(&state, id, object).expect("decrypt object");
        }
    }
    document.trailer.remove(b"Encrypt");
    document.objects.remove(&encrypt_id);
    Some(document)
}

/// Concatenated content of every page, in page order, as text.
pub fn page_texts(document: &Document) -> Vec<String> {
    document
        .get_pages()
        .values()
        .map(|&id| {
            let content = document.get_page_content(id).expect("page content");
            String::from_utf8_lossy(&content).into_owned()
        })
        .collect()
}
