use hll_types::{HexDigest, LogEntry, UtcDate};

/// Nonce carried by every genesis entry.
pub const GENESIS_NONCE: u64 = 0;

/// Build the root entry of an empty log.
///
/// No proof-of-work is performed. `previous_hash` is a random digest that
/// links to nothing; validators trust index 0 as given.
pub fn genesis_entry(message: &str) -> LogEntry {
    LogEntry::new(
        HexDigest::random().into_string(),
        message,
        UtcDate::now().to_string(),
        GENESIS_NONCE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genesis_carries_message_and_fixed_nonce() {
        let g = genesis_entry("hello");
        assert_eq!(g.message, "hello");
        assert_eq!(g.nonce, GENESIS_NONCE);
        assert!(UtcDate::parse(&g.date).is_ok());
    }

    #[test]
    fn genesis_hash_is_random_hex() {
        let a = genesis_entry("x");
        let b = genesis_entry("x");
        assert_ne!(a.previous_hash, b.previous_hash);
        assert!(HexDigest::parse(&a.previous_hash).is_ok());
    }
}
