//! Password digests.
//!
//! A single deterministic SHA-256 pass over the plaintext, hex encoded.
//! No salt and no work factor: digests must stay comparable across runs
//! against the persisted snapshot.

use sha2::{Digest, Sha256};

/// Digest a password for storage or comparison.
/// Returns 64 lowercase hex characters.
pub fn digest(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_deterministic() {
        assert_eq!(digest("secret1"), digest("secret1"));
    }

    #[test]
    fn test_digest_shape() {
        let d = digest("correct horse battery staple");
        assert_eq!(d.len(), 64);
        assert!(d.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_digest_differs_from_plaintext() {
        assert_ne!(digest("secret1"), "secret1");
    }

    #[test]
    fn test_different_passwords_differ() {
        assert_ne!(digest("secret1"), digest("secret2"));
    }
}
