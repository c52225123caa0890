use std::sync::{Mutex, PoisonError};

use tracing::{debug, info, warn};

use hll_crypto::ChainValidator;
use hll_store::LineStore;
use hll_types::LogEntry;

use crate::codec::ChainCodec;
use crate::error::{Corruption, LogError};

/// Serializes the commit step of every append.
///
/// Mining happens outside the turn, against whatever tail the caller saw.
/// Inside the turn the tail is re-read from the store and the mined entry
/// is checked against that fresh tail before it is written. At most one
/// commit is in flight at any instant.
pub struct AppendCoordinator {
    turn: Mutex<()>,
    validator: ChainValidator,
}

impl AppendCoordinator {
    pub fn new(validator: ChainValidator) -> Self {
        Self {
            turn: Mutex::new(()),
            validator,
        }
    }

    /// Commit `mined`, which was built against `observed_tail` (`None` when
    /// the log was empty and `mined` is a genesis entry).
    ///
    /// Fails with `Outpaced` if `mined` does not link onto the store's
    /// current tail. The turn is released on every return path.
    pub fn commit<S>(
        &self,
        store: &S,
        observed_tail: Option<&LogEntry>,
        mined: &LogEntry,
    ) -> Result<(), LogError>
    where
        S: LineStore + ?Sized,
    {
        // The guarded value is unit, so a poisoned turn holds no broken state.
        let _turn = self.turn.lock().unwrap_or_else(PoisonError::into_inner);

        let current_tail = store
            .get_last_line()?
            .map(|line| ChainCodec::decode(&line))
            .transpose()
            .map_err(|source| Corruption::MalformedLine { line: None, source })?;

        match (observed_tail, current_tail.as_ref()) {
            (None, None) => {
                debug!("committing genesis entry");
            }
            (None, Some(_)) => {
                warn!("genesis entry outpaced: log is no longer empty");
                return Err(LogError::Outpaced);
            }
            (Some(_), None) => {
                return Err(Corruption::Shrunk.into());
            }
            (Some(observed), Some(current)) => {
                if current != observed {
                    debug!("tail moved since mining started; re-checking link");
                }
                info!("comparing the entry to the current tail");
                if !self.validator.verify_link(current, mined) {
                    warn!(nonce = mined.nonce, "entry outpaced by a concurrent commit");
                    return Err(LogError::Outpaced);
                }
            }
        }

        store.append_line(&ChainCodec::encode(mined))?;
        info!(nonce = mined.nonce, "entry committed");
        Ok(())
    }
}

impl Default for AppendCoordinator {
    fn default() -> Self {
        Self::new(ChainValidator::default())
    }
}
