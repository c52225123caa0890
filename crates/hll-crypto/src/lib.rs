//! Cryptographic primitives for the hash-linked log.
//!
//! Provides the canonical link hash between adjacent entries, full-chain
//! link validation, and the proof-of-work search that produces new entries.
//!
//! All digests wrap established libraries (BLAKE3, SHA-256); no custom
//! cryptography.

pub mod chain;
pub mod hasher;
pub mod pow;

pub use chain::{ChainError, ChainValidator};
pub use hasher::{ChainHasher, DigestAlgorithm, UnknownAlgorithm};
pub use pow::{Difficulty, EntryMiner, MineError};
