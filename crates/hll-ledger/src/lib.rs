//! Append-only hash-linked log engine.
//!
//! This crate is the heart of HLL. It provides:
//! - The line codec between [`LogEntry`](hll_types::LogEntry) and its
//!   persisted `previous_hash,message,date,nonce` form
//! - Genesis entry construction for an empty log
//! - The append coordinator that serializes commits and rejects stale,
//!   outpaced entries
//! - [`HashLinkedLog`], the service tying store, miner, and validator together
//! - `LogWriter` / `LogReader` trait boundaries for callers

pub mod codec;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod genesis;
pub mod log;
pub mod traits;

pub use codec::{ChainCodec, DecodeError, EncodeError};
pub use config::LogConfig;
pub use coordinator::AppendCoordinator;
pub use error::{Corruption, LogError};
pub use genesis::{genesis_entry, GENESIS_NONCE};
pub use log::{require_message, ChainReport, HashLinkedLog};
pub use traits::{LogReader, LogService, LogWriter};
