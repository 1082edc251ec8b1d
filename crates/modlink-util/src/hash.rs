/// Compute the BLAKE3 hash of a byte slice, returning the hex-encoded digest.
#[must_use]
pub fn blake3_bytes(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Compare a declared hex digest against a computed one, ignoring ASCII case
/// and surrounding whitespace.
#[must_use]
pub fn digest_matches(declared: &str, computed: &str) -> bool {
    declared.trim().eq_ignore_ascii_case(computed.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blake3_bytes() {
        let hash = blake3_bytes(b"hello world");
        assert_eq!(
            hash,
            "d74981efa70a0c880b8d8c1985d075dbcbf679b99a5f9914e5aaf96b831a9e24"
        );
    }

    #[test]
    fn test_digest_matches_ignores_case() {
        let computed = blake3_bytes(b"x");
        assert!(digest_matches(&computed.to_uppercase(), &computed));
        assert!(digest_matches(&format!(" {computed}\n"), &computed));
        assert!(!digest_matches("deadbeef", &computed));
    }
}
