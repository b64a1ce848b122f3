//! Tally Cryptography - SHA-256 digest engine and chain-link encoding

use ring::digest::{digest, SHA256};
use tally_core::{Result, TallyError};

pub mod link;

/// Length of a hex-encoded SHA-256 digest
pub const DIGEST_HEX_LEN: usize = 64;

/// Known-answer vector used by [`self_test`]: SHA-256("abc")
const SELF_TEST_INPUT: &[u8] = b"abc";
const SELF_TEST_DIGEST: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

/// Compute SHA-256 hash and return lowercase hex-encoded string
pub fn sha256_hex(data: &[u8]) -> String {
    let hash = digest(&SHA256, data);
    hex::encode(hash.as_ref())
}

/// Check that the hash primitive produces the expected known answer.
///
/// Run once at process start-up. A failure here is fatal: no digest produced
/// by this process could be trusted.
pub fn self_test() -> Result<()> {
    let actual = sha256_hex(SELF_TEST_INPUT);
    if actual != SELF_TEST_DIGEST {
        return Err(TallyError::DigestUnavailable(format!(
            "SHA-256 known-answer test failed: expected {}, got {}",
            SELF_TEST_DIGEST, actual
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use sha2::{Digest, Sha256};

    #[test]
    fn test_self_test_passes() {
        assert!(self_test().is_ok());
    }

    #[test]
    fn test_digest_length() {
        assert_eq!(sha256_hex(b"test data").len(), DIGEST_HEX_LEN);
        assert_eq!(sha256_hex(&[0u8; 1024]).len(), DIGEST_HEX_LEN);
    }

    #[test]
    fn test_lowercase_hex() {
        let hash = sha256_hex(b"Alice");
        assert!(hash.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_matches_independent_implementation() {
        let data = "AliceBob100.02025-01-01 12:00:000000000000000000".as_bytes();
        let expected = hex::encode(Sha256::digest(data));
        assert_eq!(sha256_hex(data), expected);
    }

    proptest! {
        #[test]
        fn prop_matches_sha2(data in proptest::collection::vec(any::<u8>(), 0..256)) {
            prop_assert_eq!(sha256_hex(&data), sha256_hex(&data));
            prop_assert_eq!(sha256_hex(&data), hex::encode(Sha256::digest(&data)));
        }
    }
}
