//! Line-oriented, append-only storage for the hash-linked log.
//!
//! The log engine persists one encoded entry per line and never rewrites or
//! removes a line. This crate provides the storage boundary it consumes.
//!
//! # Storage Backends
//!
//! All backends implement the [`LineStore`] trait:
//!
//! - [`InMemoryLineStore`] -- `Vec`-based store for tests and embedding
//! - [`FileLineStore`] -- newline-terminated text file on disk
//!
//! # Design Rules
//!
//! 1. Lines are immutable once appended.
//! 2. `append_line` is atomic with respect to `get_lines` / `get_last_line`:
//!    no reader ever observes a partially written line.
//! 3. The store never interprets line contents.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::{FileLineStore, SyncMode};
pub use memory::InMemoryLineStore;
pub use traits::LineStore;
