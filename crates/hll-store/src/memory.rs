use std::sync::{PoisonError, RwLock};

use crate::error::{StoreError, StoreResult};
use crate::traits::{check_single_line, LineStore};

/// In-memory, `Vec`-based line store.
///
/// Intended for tests and embedding. Lines are held behind a `RwLock`, so an
/// append is atomic with respect to every read.
pub struct InMemoryLineStore {
    lines: RwLock<Vec<String>>,
}

impl InMemoryLineStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            lines: RwLock::new(Vec::new()),
        }
    }

    /// Create a store pre-populated with lines.
    pub fn with_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: RwLock::new(lines.into_iter().map(Into::into).collect()),
        }
    }

    /// Number of lines currently stored.
    ///
    /// Counts through a poisoned lock; a panicked writer never leaves a
    /// partial line behind.
    pub fn len(&self) -> usize {
        self.lines.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Overwrite the line at `index`, returning the previous value.
    ///
    /// Bypasses the append-only contract; exists so tests can simulate
    /// tampering with persisted data.
    pub fn replace_line(&self, index: usize, line: impl Into<String>) -> Option<String> {
        let mut lines = self.lines.write().unwrap_or_else(PoisonError::into_inner);
        let slot = lines.get_mut(index)?;
        Some(std::mem::replace(slot, line.into()))
    }
}

impl Default for InMemoryLineStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LineStore for InMemoryLineStore {
    fn get_lines(&self) -> StoreResult<Vec<String>> {
        let lines = self.lines.read().map_err(|_| StoreError::Poisoned)?;
        Ok(lines.clone())
    }

    fn get_last_line(&self) -> StoreResult<Option<String>> {
        let lines = self.lines.read().map_err(|_| StoreError::Poisoned)?;
        Ok(lines.last().cloned())
    }

    fn append_line(&self, line: &str) -> StoreResult<()> {
        check_single_line(line)?;
        let mut lines = self.lines.write().map_err(|_| StoreError::Poisoned)?;
        lines.push(line.to_string());
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryLineStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryLineStore")
            .field("line_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn empty_store() {
        let store = InMemoryLineStore::new();
        assert!(store.is_empty());
        assert!(store.get_lines().unwrap().is_empty());
        assert!(store.get_last_line().unwrap().is_none());
    }

    #[test]
    fn append_preserves_order() {
        let store = InMemoryLineStore::new();
        store.append_line("a").unwrap();
        store.append_line("b").unwrap();
        store.append_line("c").unwrap();

        assert_eq!(store.get_lines().unwrap(), vec!["a", "b", "c"]);
        assert_eq!(store.get_last_line().unwrap().as_deref(), Some("c"));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn rejects_embedded_newline() {
        let store = InMemoryLineStore::new();
        assert!(matches!(
            store.append_line("two\nlines"),
            Err(StoreError::EmbeddedNewline)
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn with_lines_and_replace() {
        let store = InMemoryLineStore::with_lines(["x", "y"]);
        assert_eq!(store.replace_line(1, "z").as_deref(), Some("y"));
        assert_eq!(store.get_lines().unwrap(), vec!["x", "z"]);
        assert!(store.replace_line(5, "nope").is_none());
    }

    #[test]
    fn poisoned_lock_counts_lines_but_fails_trait_calls() {
        let store = InMemoryLineStore::with_lines(["x", "y"]);
        let _ = std::thread::scope(|s| {
            s.spawn(|| {
                let _guard = store.lines.write().unwrap();
                panic!("writer died");
            })
            .join()
        });

        assert_eq!(store.len(), 2);
        assert!(!store.is_empty());
        assert!(matches!(store.get_lines(), Err(StoreError::Poisoned)));
        assert!(matches!(store.append_line("z"), Err(StoreError::Poisoned)));
    }

    #[test]
    fn concurrent_appends_are_all_kept() {
        let store = Arc::new(InMemoryLineStore::new());
        std::thread::scope(|s| {
            for t in 0..8 {
                let store = Arc::clone(&store);
                s.spawn(move || {
                    for i in 0..50 {
                        store.append_line(&format!("{t}-{i}")).unwrap();
                    }
                });
            }
        });
        assert_eq!(store.len(), 400);
    }
}
