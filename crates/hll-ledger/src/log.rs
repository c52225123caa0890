use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use hll_crypto::{ChainValidator, Difficulty, DigestAlgorithm, EntryMiner};
use hll_store::LineStore;
use hll_types::{LogEntry, UtcDate};

use crate::codec::ChainCodec;
use crate::config::LogConfig;
use crate::coordinator::AppendCoordinator;
use crate::error::LogError;
use crate::genesis::genesis_entry;
use crate::traits::{LogReader, LogWriter};

/// Summary of a fully validated chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainReport {
    /// Number of entries, genesis included.
    pub length: usize,
    /// `previous_hash` of the newest entry.
    pub head_hash: Option<String>,
    pub algorithm: DigestAlgorithm,
    pub difficulty: Difficulty,
    /// Non-root entries whose hash meets the configured difficulty.
    pub difficulty_met: usize,
}

impl ChainReport {
    /// Returns `true` if every non-root entry meets the difficulty.
    pub fn fully_mined(&self) -> bool {
        self.difficulty_met == self.length.saturating_sub(1)
    }
}

/// Check a caller-supplied message before any work is done.
///
/// `None` models an absent or non-text payload at the transport boundary.
/// Messages the line format cannot hold are refused here, not at commit.
pub fn require_message(message: Option<&str>) -> Result<&str, LogError> {
    match message {
        None => Err(LogError::InvalidMessage("message is missing or not text".into())),
        Some("") => Err(LogError::InvalidMessage("message is empty".into())),
        Some(text) => {
            ChainCodec::check_message(text)
                .map_err(|e| LogError::InvalidMessage(e.to_string()))?;
            Ok(text)
        }
    }
}

/// The hash-linked log over a line store.
///
/// Holds no cached chain: every operation re-reads and re-validates the
/// store. Appends mine outside any lock and commit through a single
/// [`AppendCoordinator`].
pub struct HashLinkedLog<S> {
    store: S,
    config: LogConfig,
    validator: ChainValidator,
    miner: EntryMiner,
    coordinator: AppendCoordinator,
}

impl<S: LineStore> HashLinkedLog<S> {
    pub fn new(store: S, config: LogConfig) -> Self {
        let hasher = config.hasher();
        let validator = ChainValidator::new(hasher);
        Self {
            store,
            validator,
            miner: EntryMiner::new(hasher, config.difficulty),
            coordinator: AppendCoordinator::new(validator),
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    /// Decode and validate the whole chain.
    fn load_chain(&self) -> Result<Vec<LogEntry>, LogError> {
        let lines = self.store.get_lines()?;
        let entries = ChainCodec::decode_all(&lines)?;

        info!(entries = entries.len(), "validating log");
        self.validator.verify_chain(&entries)?;
        info!("log is intact");
        Ok(entries)
    }

    /// Build the next entry for `message` against the current tail.
    ///
    /// Returns the tail it was built against (`None` for genesis).
    fn build_entry(&self, message: &str) -> Result<(Option<LogEntry>, LogEntry), LogError> {
        let mut entries = self.load_chain()?;
        let Some(last) = entries.pop() else {
            info!("log is empty; creating the genesis entry");
            return Ok((None, genesis_entry(message)));
        };

        let entry = self.miner.mine(&last, message, UtcDate::now().to_string())?;
        debug!(nonce = entry.nonce, hash = %entry.previous_hash, "found nonce");
        Ok((Some(last), entry))
    }
}

impl<S: LineStore> LogWriter for HashLinkedLog<S> {
    fn append(&self, message: &str) -> Result<LogEntry, LogError> {
        let message = require_message(Some(message))?;
        let mut retries = 0;

        loop {
            let (tail, entry) = self.build_entry(message)?;
            match self.coordinator.commit(&self.store, tail.as_ref(), &entry) {
                Ok(()) => return Ok(entry),
                Err(LogError::Outpaced) if retries < self.config.max_outpaced_retries => {
                    retries += 1;
                    warn!(retries, "entry outpaced; mining again against the new tail");
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl<S: LineStore> LogReader for HashLinkedLog<S> {
    fn read_all(&self) -> Result<Vec<LogEntry>, LogError> {
        self.load_chain()
    }

    fn verify(&self) -> Result<ChainReport, LogError> {
        let entries = self.load_chain()?;
        let difficulty = self.config.difficulty;
        let difficulty_met = entries
            .iter()
            .skip(1)
            .filter(|e| difficulty.is_met(&e.previous_hash))
            .count();

        Ok(ChainReport {
            length: entries.len(),
            head_hash: entries.last().map(|e| e.previous_hash.clone()),
            algorithm: self.config.algorithm,
            difficulty,
            difficulty_met,
        })
    }
}

impl<S> std::fmt::Debug for HashLinkedLog<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashLinkedLog")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
