use std::fmt;

use serde::{Deserialize, Serialize};

/// One link of the hash-linked log.
///
/// `previous_hash` commits this entry to its predecessor and to its own
/// `message`, `date`, and `nonce`. For the genesis entry it is a random
/// placeholder that nothing is checked against.
///
/// Fields hold the exact text that is hashed. `message` is the unescaped
/// caller payload; escaping only exists in the persisted line form.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogEntry {
    pub previous_hash: String,
    pub message: String,
    pub date: String,
    pub nonce: u64,
}

impl LogEntry {
    pub fn new(
        previous_hash: impl Into<String>,
        message: impl Into<String>,
        date: impl Into<String>,
        nonce: u64,
    ) -> Self {
        Self {
            previous_hash: previous_hash.into(),
            message: message.into(),
            date: date.into(),
            nonce,
        }
    }

    /// First 8 characters of `previous_hash` (or the whole value if shorter).
    pub fn short_hash(&self) -> &str {
        let end = self
            .previous_hash
            .char_indices()
            .nth(8)
            .map(|(i, _)| i)
            .unwrap_or(self.previous_hash.len());
        &self.previous_hash[..end]
    }
}

impl fmt::Debug for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogEntry")
            .field("previous_hash", &self.short_hash())
            .field("message", &self.message)
            .field("date", &self.date)
            .field("nonce", &self.nonce)
            .finish()
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} #{} {}", self.short_hash(), self.date, self.nonce, self.message)
    }
}
