// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Identifier fingerprints — SHA-256 digests that stand in for the secret in
// log lines.

use idseal_core::Identifier;
use sha2::{Digest, Sha256};

/// Hex characters kept from the digest.
const FINGERPRINT_LEN: usize = 12;

/// Compute the SHA-256 hash of `data` and return it as a lowercase hex string.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

/// Short, non-reversible tag for an identifier.
///
/// Two runs over the same document produce the same tag, so log lines can be
/// correlated without the password ever being written out.
pub fn fingerprint(identifier: &Identifier) -> String {
    let mut digest = hash_bytes(identifier.expose_secret().as_bytes());
    digest.truncate(FINGERPRINT_LEN);
    digest
}

#[cfg(test)]
mod tests {
    use super::*;

    /// SHA-256 of the empty byte slice (well-known constant).
    const EMPTY_SHA256: &str =
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn hash_empty_input() {
        assert_eq!(hash_bytes(b""), EMPTY_SHA256);
    }

    #[test]
    fn hash_known_value() {
        // SHA-256("hello") — verified against coreutils sha256sum.
        let expected = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";
        assert_eq!(hash_bytes(b"hello"), expected);
    }

    #[test]
    fn fingerprint_is_a_digest_prefix() {
        let id = Identifier::parse("hello").unwrap();
        assert_eq!(fingerprint(&id), "2cf24dba5fb0");
    }

    #[test]
    fn fingerprint_hides_the_identifier() {
        let id = Identifier::parse("700101/1234").unwrap();
        let tag = fingerprint(&id);
        assert_eq!(tag.len(), FINGERPRINT_LEN);
        assert!(!tag.contains("700101"));
        assert_eq!(tag, fingerprint(&Identifier::parse(" 700101/1234 ").unwrap()));
    }
}
