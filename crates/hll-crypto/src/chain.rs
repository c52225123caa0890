use hll_types::LogEntry;

use crate::hasher::ChainHasher;

/// Hash chain link validator.
///
/// Walks a decoded chain from the root and checks that every entry's
/// `previous_hash` equals the link hash of it and its predecessor. The root
/// (index 0) is trusted as-is. There is no checkpointing: every call is a
/// full O(n) walk.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChainValidator {
    hasher: ChainHasher,
}

impl ChainValidator {
    pub const fn new(hasher: ChainHasher) -> Self {
        Self { hasher }
    }

    /// Verify every adjacent link, stopping at the first mismatch.
    pub fn verify_chain(&self, entries: &[LogEntry]) -> Result<(), ChainError> {
        for (curr, pair) in entries.windows(2).enumerate().map(|(i, w)| (i + 1, w)) {
            if !self.hasher.links(&pair[0], &pair[1]) {
                return Err(ChainError::BrokenLink {
                    prev: curr - 1,
                    curr,
                });
            }
        }
        Ok(())
    }

    /// Verify a single link.
    pub fn verify_link(&self, prev: &LogEntry, curr: &LogEntry) -> bool {
        self.hasher.links(prev, curr)
    }

    pub fn hasher(&self) -> &ChainHasher {
        &self.hasher
    }
}

/// Errors from chain verification.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("invalid chain, hashes from entries at lines {prev} & {curr} do not match")]
    BrokenLink { prev: usize, curr: usize },
}
