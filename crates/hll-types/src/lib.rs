//! Foundation types for the hash-linked log (HLL).
//!
//! This crate provides the entry and value types shared by every other HLL
//! crate. It performs no hashing and no I/O.
//!
//! # Key Types
//!
//! - [`LogEntry`]: One link of the chain: previous hash, message, date, nonce
//! - [`UtcDate`]: Canonical UTC timestamp string used inside entries
//! - [`HexDigest`]: Lowercase hex-encoded 32-byte digest

pub mod digest;
pub mod entry;
pub mod error;
pub mod temporal;

pub use digest::HexDigest;
pub use entry::LogEntry;
pub use error::TypeError;
pub use temporal::UtcDate;
