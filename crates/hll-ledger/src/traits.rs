use hll_types::LogEntry;

use crate::error::LogError;
use crate::log::ChainReport;

/// Write boundary for log append operations.
pub trait LogWriter: Send + Sync {
    /// Mine and commit a new entry carrying `message`.
    ///
    /// Returns the committed entry. Fails with `InvalidMessage`, `Outpaced`,
    /// `CorruptedLog`, or a store error; failures are never swallowed.
    fn append(&self, message: &str) -> Result<LogEntry, LogError>;
}

/// Read boundary for log queries.
pub trait LogReader: Send + Sync {
    /// Every entry in commit order, after full chain validation.
    fn read_all(&self) -> Result<Vec<LogEntry>, LogError>;

    /// Validate the full chain and summarize it.
    fn verify(&self) -> Result<ChainReport, LogError>;
}

/// A complete log handle, as passed to transports.
pub trait LogService: LogWriter + LogReader {}

impl<T: LogWriter + LogReader + ?Sized> LogService for T {}
