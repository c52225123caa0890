use std::fmt;

use serde::{Deserialize, Serialize};

use hll_types::{HexDigest, LogEntry};

use crate::hasher::ChainHasher;

/// Proof-of-work difficulty: the number of leading `'0'` hex characters a
/// link hash must have.
///
/// Expected search cost is about `16^D` hashes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Difficulty(usize);

impl Difficulty {
    /// Largest satisfiable difficulty (every hex character zero).
    pub const MAX: usize = HexDigest::HEX_LEN;

    pub const DEFAULT: Self = Self(3);

    pub fn new(zeros: usize) -> Result<Self, MineError> {
        if zeros > Self::MAX {
            return Err(MineError::DifficultyTooHigh {
                requested: zeros,
                max: Self::MAX,
            });
        }
        Ok(Self(zeros))
    }

    pub fn zeros(&self) -> usize {
        self.0
    }

    /// Returns `true` if `hash` starts with at least `D` `'0'` characters.
    pub fn is_met(&self, hash: &str) -> bool {
        hash.len() >= self.0 && hash.bytes().take(self.0).all(|b| b == b'0')
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<usize> for Difficulty {
    type Error = MineError;

    fn try_from(zeros: usize) -> Result<Self, Self::Error> {
        Self::new(zeros)
    }
}

impl From<Difficulty> for usize {
    fn from(d: Difficulty) -> Self {
        d.0
    }
}

impl fmt::Debug for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Difficulty({})", self.0)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Brute-force nonce search for the next entry of a chain.
///
/// The miner only reads the entry it chains onto; it never touches shared
/// state, so any number of searches may run in parallel.
#[derive(Clone, Copy, Debug, Default)]
pub struct EntryMiner {
    hasher: ChainHasher,
    difficulty: Difficulty,
}

impl EntryMiner {
    pub const fn new(hasher: ChainHasher, difficulty: Difficulty) -> Self {
        Self { hasher, difficulty }
    }

    /// Search nonces from 0 upward until the link hash of `(last, draft)`
    /// meets the difficulty.
    ///
    /// `message` and `date` are fixed for the whole search; only the nonce
    /// and the resulting hash change between attempts.
    pub fn mine(
        &self,
        last: &LogEntry,
        message: impl Into<String>,
        date: impl Into<String>,
    ) -> Result<LogEntry, MineError> {
        let mut draft = LogEntry::new(String::new(), message, date, 0);

        // Everything before the nonce is constant across attempts.
        let mut hashable = ChainHasher::canonical(last, &draft);
        let prefix_len = hashable.len() - 1;

        loop {
            hashable.truncate(prefix_len);
            hashable.push_str(&draft.nonce.to_string());

            let hash = self.hasher.hash(hashable.as_bytes());
            if self.difficulty.is_met(hash.as_str()) {
                draft.previous_hash = hash.into_string();
                return Ok(draft);
            }

            draft.nonce = draft
                .nonce
                .checked_add(1)
                .ok_or(MineError::NonceSpaceExhausted)?;
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn hasher(&self) -> &ChainHasher {
        &self.hasher
    }
}

/// Errors from proof-of-work configuration and search.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MineError {
    #[error("difficulty {requested} exceeds the digest length of {max} hex characters")]
    DifficultyTooHigh { requested: usize, max: usize },

    #[error("no nonce in the 64-bit range satisfies the difficulty")]
    NonceSpaceExhausted,
}
