//! Chain-link encoding for ledger blocks
//!
//! A block's digest is SHA-256 over the separator-free concatenation
//! `sender ++ receiver ++ amount ++ timestamp ++ previous_prefix`. Each block
//! links to its predecessor through the first [`PREFIX_LEN`] hex characters
//! of the predecessor's digest; the first block links to [`GENESIS_PREFIX`].

use crate::sha256_hex;

/// Number of digest characters carried as the link to the previous block
pub const PREFIX_LEN: usize = 16;

/// Link value of the first block in a chain
pub const GENESIS_PREFIX: &str = "0000000000000000";

/// First [`PREFIX_LEN`] characters of a digest.
///
/// Shorter input is returned whole, so a damaged digest still yields a
/// (non-matching) link instead of panicking.
pub fn digest_prefix(digest: &str) -> &str {
    match digest.char_indices().nth(PREFIX_LEN) {
        Some((idx, _)) => &digest[..idx],
        None => digest,
    }
}

/// Build the exact hash input for a block.
///
/// Field boundaries are implicit: no separators are inserted. Existing
/// digests depend on this, so the order and the absence of separators must
/// never change.
pub fn canonical_encoding(
    sender: &str,
    receiver: &str,
    amount: &str,
    timestamp: &str,
    previous_prefix: &str,
) -> String {
    let mut encoded = String::with_capacity(
        sender.len() + receiver.len() + amount.len() + timestamp.len() + previous_prefix.len(),
    );
    encoded.push_str(sender);
    encoded.push_str(receiver);
    encoded.push_str(amount);
    encoded.push_str(timestamp);
    encoded.push_str(previous_prefix);
    encoded
}

/// Compute a block digest: SHA256(canonical_encoding(..))
pub fn compute_block_digest(
    sender: &str,
    receiver: &str,
    amount: &str,
    timestamp: &str,
    previous_prefix: &str,
) -> String {
    let encoded = canonical_encoding(sender, receiver, amount, timestamp, previous_prefix);
    sha256_hex(encoded.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genesis_prefix_shape() {
        assert_eq!(GENESIS_PREFIX.len(), PREFIX_LEN);
        assert!(GENESIS_PREFIX.chars().all(|c| c == '0'));
    }

    #[test]
    fn test_canonical_encoding_has_no_separators() {
        let encoded = canonical_encoding("Alice", "Bob", "100.0", "2025-01-01 12:00:00", GENESIS_PREFIX);
        assert_eq!(encoded, "AliceBob100.02025-01-01 12:00:000000000000000000");
    }

    #[test]
    fn test_block_digest_matches_plain_hash() {
        let digest = compute_block_digest("Alice", "Bob", "100.0", "2025-01-01 12:00:00", GENESIS_PREFIX);
        assert_eq!(
            digest,
            sha256_hex(b"AliceBob100.02025-01-01 12:00:000000000000000000")
        );
    }

    #[test]
    fn test_digest_prefix() {
        let digest = sha256_hex(b"first entry");
        assert_eq!(digest_prefix(&digest), &digest[..16]);
        assert_eq!(digest_prefix("abc"), "abc");
        assert_eq!(digest_prefix(""), "");
    }

    #[test]
    fn test_digest_prefix_multibyte_does_not_panic() {
        let damaged = "ééééééééééééééééé";
        assert_eq!(digest_prefix(damaged).chars().count(), PREFIX_LEN);
    }

    #[test]
    fn test_previous_prefix_changes_digest() {
        let a = compute_block_digest("Bob", "Carol", "50", "2025-01-01 12:00:01", GENESIS_PREFIX);
        let b = compute_block_digest("Bob", "Carol", "50", "2025-01-01 12:00:01", "1111111111111111");
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_determinism() {
        let first = compute_block_digest("Alice", "Bob", "1", "2025-01-01 00:00:00", GENESIS_PREFIX);
        let second = compute_block_digest("Alice", "Bob", "1", "2025-01-01 00:00:00", GENESIS_PREFIX);
        assert_eq!(first, second);
    }
}
