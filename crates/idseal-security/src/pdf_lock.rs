// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF encryption — AES-256 standard security handler (PDF 2.0, revision 6)
// applied through `lopdf`. The identifier is both the user and the owner
// password, so opening the file requires it.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use idseal_core::Identifier;
use idseal_core::error::IdsealError;
use lopdf::encryption::crypt_filters::{Aes256CryptFilter, CryptFilter};
use lopdf::{Document, EncryptionState, EncryptionVersion, Object, Permissions, StringFormat};
use ring::rand::{SecureRandom, SystemRandom};
use tracing::{debug, instrument};

/// Name of the crypt filter registered in the /CF dictionary.
const CRYPT_FILTER_NAME: &[u8] = b"StdCF";

/// Encrypts PDF documents with a password taken from an [`Identifier`].
pub struct PdfLocker<'a> {
    identifier: &'a Identifier,
    rng: SystemRandom,
}

impl<'a> PdfLocker<'a> {
    pub fn new(identifier: &'a Identifier) -> Self {
        Self {
            identifier,
            rng: SystemRandom::new(),
        }
    }

    /// Encrypt `document` in memory and write it to `output`.
    ///
    /// A fresh random file key and document `/ID` are generated for every
    /// call. Any failure is reported as `IdsealError::Pdf` against
    /// `output`.
    #[instrument(skip_all, fields(output = %output.display()))]
    pub fn lock_to_file(&self, mut document: Document, output: &Path) -> Result<(), IdsealError> {
        let fail = |detail: String| IdsealError::Pdf {
            path: output.to_path_buf(),
            detail,
        };

        let mut file_key = [0u8; 32];
        self.rng
            .fill(&mut file_key)
            .map_err(|_| fail("system random source unavailable".into()))?;

        let mut doc_id = [0u8; 16];
        self.rng
            .fill(&mut doc_id)
            .map_err(|_| fail("system random source unavailable".into()))?;
        let id_string = Object::String(doc_id.to_vec(), StringFormat::Hexadecimal);
        document
            .trailer
            .set("ID", Object::Array(vec![id_string.clone(), id_string]));

        let secret = self.identifier.expose_secret();
        let aes: Arc<dyn CryptFilter> = Arc::new(Aes256CryptFilter);
        let version = EncryptionVersion::V5 {
            encrypt_metadata: true,
            crypt_filters: BTreeMap::from([(CRYPT_FILTER_NAME.to_vec(), aes)]),
            file_encryption_key: &file_key,
            stream_filter: CRYPT_FILTER_NAME.to_vec(),
            string_filter: CRYPT_FILTER_NAME.to_vec(),
            owner_password: secret,
            user_password: secret,
            permissions: Permissions::all(),
        };

        let state = EncryptionState::try_from(version)
            .map_err(|err| fail(format!("cannot derive encryption state: {err}")))?;
        document
            .encrypt(&state)
            .map_err(|err| fail(format!("encryption failed: {err}")))?;

        let mut bytes = Vec::new();
        document
            .save_to(&mut bytes)
            .map_err(|err| fail(format!("failed to serialise encrypted PDF: {err}")))?;
        std::fs::write(output, &bytes).map_err(|err| fail(err.to_string()))?;

        debug!(
            pages = document.get_pages().len(),
            bytes = bytes.len(),
            "PDF encrypted"
        );
        Ok(())
    }
}
