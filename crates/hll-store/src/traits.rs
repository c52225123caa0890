use crate::error::StoreResult;

/// Ordered, append-only sequence of text lines.
///
/// All implementations must satisfy these invariants:
/// - Lines are never mutated or removed once appended.
/// - `append_line` is atomic with respect to `get_lines` and
///   `get_last_line`: a reader sees either the whole line or none of it.
/// - Lines never contain `\n` or `\r`; implementations reject them.
/// - All I/O errors are propagated, never silently ignored.
pub trait LineStore: Send + Sync {
    /// All lines in append order. Empty for an empty store.
    fn get_lines(&self) -> StoreResult<Vec<String>>;

    /// The most recently appended line, or `None` for an empty store.
    ///
    /// Default implementation reads every line. Backends may override.
    fn get_last_line(&self) -> StoreResult<Option<String>> {
        Ok(self.get_lines()?.pop())
    }

    /// Append one line.
    fn append_line(&self, line: &str) -> StoreResult<()>;
}

/// Reject lines that would split into several physical lines.
pub(crate) fn check_single_line(line: &str) -> StoreResult<()> {
    if line.contains(['\n', '\r']) {
        return Err(crate::error::StoreError::EmbeddedNewline);
    }
    Ok(())
}
