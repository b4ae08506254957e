// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Encrypted archives — a single PDF stored in a ZIP with WinZip AES-256
// encryption and deflate compression.

use std::fs::File;
use std::path::Path;

use idseal_core::Identifier;
use idseal_core::error::IdsealError;
use tracing::{debug, instrument};
use zip::write::FileOptions;
use zip::{AesMode, CompressionMethod, ZipWriter};

/// Pack `pdf_path` into a new archive at `zip_path`, encrypted with the
/// identifier. The entry is named after the PDF's file name.
#[instrument(skip(identifier), fields(pdf = %pdf_path.display(), zip = %zip_path.display()))]
pub fn write_encrypted_zip(
    pdf_path: &Path,
    zip_path: &Path,
    identifier: &Identifier,
) -> Result<(), IdsealError> {
    let fail = |detail: String| IdsealError::Archive {
        path: zip_path.to_path_buf(),
        detail,
    };

    let entry_name = pdf_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| fail(format!("{} has no file name", pdf_path.display())))?;

    let mut reader = File::open(pdf_path)
        .map_err(|err| fail(format!("cannot read {}: {err}", pdf_path.display())))?;
    let file = File::create(zip_path).map_err(|err| fail(err.to_string()))?;

    let mut zip = ZipWriter::new(file);
    let options: FileOptions<'_, ()> = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .with_aes_encryption(AesMode::Aes256, identifier.expose_secret());

    zip.start_file(entry_name.as_str(), options)
        .map_err(|err| fail(format!("cannot add {entry_name}: {err}")))?;
    let written = std::io::copy(&mut reader, &mut zip)
        .map_err(|err| fail(format!("cannot write {entry_name}: {err}")))?;
    zip.finish().map_err(|err| fail(err.to_string()))?;

    debug!(entry = %entry_name, bytes = written, "archive written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;
    use zip::ZipArchive;

    fn packed(dir: &Path, password: &str) -> (std::path::PathBuf, Vec<u8>) {
        let pdf = dir.join("d.pdf");
        let body = b"%PDF-1.5 not really a pdf but bytes are bytes".repeat(20);
        std::fs::write(&pdf, &body).unwrap();

        let zip_path = dir.join("d.zip");
        let id = Identifier::parse(password).unwrap();
        write_encrypted_zip(&pdf, &zip_path, &id).unwrap();
        (zip_path, body)
    }

    #[test]
    fn correct_password_returns_the_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let (zip_path, body) = packed(dir.path(), "990101/5678");

        let mut archive = ZipArchive::new(File::open(&zip_path).unwrap()).unwrap();
        assert_eq!(archive.len(), 1);

        let mut entry = archive.by_name_decrypt("d.pdf", b"990101/5678").unwrap();
        let mut out = Vec::new();
        entry.read_to_end(&mut out).unwrap();
        assert_eq!(out, body);
    }

    #[test]
    fn wrong_password_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (zip_path, _) = packed(dir.path(), "990101/5678");

        let mut archive = ZipArchive::new(File::open(&zip_path).unwrap()).unwrap();
        assert!(archive.by_name_decrypt("d.pdf", b"000000/0000").is_err());
    }

    #[test]
    fn entry_requires_a_password() {
        let dir = tempfile::tempdir().unwrap();
        let (zip_path, _) = packed(dir.path(), "990101/5678");

        let mut archive = ZipArchive::new(File::open(&zip_path).unwrap()).unwrap();
        assert!(archive.by_name("d.pdf").is_err());
    }

    #[test]
    fn missing_pdf_is_an_archive_error() {
        let dir = tempfile::tempdir().unwrap();
        let id = Identifier::parse("1").unwrap();
        let err = write_encrypted_zip(
            &dir.path().join("absent.pdf"),
            &dir.path().join("absent.zip"),
            &id,
        )
        .unwrap_err();

        assert!(matches!(err, IdsealError::Archive { .. }));
        assert!(!dir.path().join("absent.zip").exists());
    }
}
