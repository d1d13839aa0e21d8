// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Content fingerprint used to detect unchanged records.

use sha2::{Digest, Sha256};

/// SHA-256 hex digest over `schema#record#metadata`.
///
/// Inputs are the JSON serializations stored alongside the record. JSON
/// objects serialize with sorted keys, so equal content always yields the
/// same fingerprint.
pub fn fingerprint(schema_json: &str, record_json: &str, metadata_json: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(schema_json.as_bytes());
    hasher.update(b"#");
    hasher.update(record_json.as_bytes());
    hasher.update(b"#");
    hasher.update(metadata_json.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn digest_is_hex_sha256() {
        let fp = fingerprint("{}", "{}", "{}");
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
        // sha256("{}#{}#{}")
        assert_eq!(fp, hex::encode(Sha256::digest(b"{}#{}#{}")));
    }

    #[test]
    fn key_order_does_not_matter() {
        let a = serde_json::to_string(&json!({"b": 1, "a": 2})).unwrap();
        let b = serde_json::to_string(&json!({"a": 2, "b": 1})).unwrap();
        assert_eq!(fingerprint("s", &a, "m"), fingerprint("s", &b, "m"));
    }

    #[test]
    fn every_part_contributes() {
        let base = fingerprint("s", "r", "m");
        assert_ne!(base, fingerprint("s2", "r", "m"));
        assert_ne!(base, fingerprint("s", "r2", "m"));
        assert_ne!(base, fingerprint("s", "r", "m2"));
    }
}
