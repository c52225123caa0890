use hll_crypto::{ChainError, MineError};
use hll_store::StoreError;

use crate::codec::DecodeError;

/// Errors produced by log operations.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// The message is empty, absent, or not text.
    #[error("invalid log message: {0}")]
    InvalidMessage(String),

    /// A concurrent append committed first and the mined entry no longer
    /// links onto the tail. The message was not persisted.
    #[error("entry was outpaced by another one")]
    Outpaced,

    /// The persisted chain is malformed or a hash link is broken.
    #[error("corrupted log: {0}")]
    CorruptedLog(Corruption),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("mining error: {0}")]
    Mining(#[from] MineError),
}

impl LogError {
    /// Stable name of the error kind, suitable for wire responses.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidMessage(_) => "InvalidMessage",
            Self::Outpaced => "Outpaced",
            Self::CorruptedLog(_) => "CorruptedLog",
            Self::Store(_) => "StoreFailure",
            Self::Mining(_) => "MiningFailure",
        }
    }

    pub fn is_corrupted(&self) -> bool {
        matches!(self, Self::CorruptedLog(_))
    }
}

/// What exactly is wrong with a corrupted log.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Corruption {
    /// A line could not be decoded. `line` is the 0-based position when known.
    #[error("{}: {source}", line_label(.line))]
    MalformedLine {
        line: Option<usize>,
        source: DecodeError,
    },

    /// The entries at `prev` and `curr` do not hash-link.
    #[error("invalid chain, hashes from entries at lines {prev} & {curr} do not match")]
    BrokenLink { prev: usize, curr: usize },

    /// The store held fewer lines than a tail already observed.
    #[error("log shrank: a previously observed tail is gone")]
    Shrunk,
}

fn line_label(line: &Option<usize>) -> String {
    match line {
        Some(n) => format!("malformed line {n}"),
        None => "malformed tail line".to_string(),
    }
}

impl From<Corruption> for LogError {
    fn from(c: Corruption) -> Self {
        Self::CorruptedLog(c)
    }
}

impl From<ChainError> for LogError {
    fn from(e: ChainError) -> Self {
        match e {
            ChainError::BrokenLink { prev, curr } => {
                Self::CorruptedLog(Corruption::BrokenLink { prev, curr })
            }
        }
    }
}
