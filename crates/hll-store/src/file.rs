use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::traits::{check_single_line, LineStore};

/// Flush/sync strategy for appends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncMode {
    /// `fsync` after every append (safest, highest latency).
    EveryWrite,
    /// Rely on OS page-cache buffering (fastest, least durable).
    #[default]
    OsDefault,
}

/// Chunk size for scanning backwards to the last line.
const TAIL_CHUNK: usize = 4096;

/// Append-only text file with one line per record.
///
/// On-disk format is plain UTF-8, each line terminated by `\n`. A single
/// mutex serializes appends and reads, so a reader never sees half a line.
/// On open, bytes after the last `\n` (a torn write from a crash) are
/// truncated away.
pub struct FileLineStore {
    path: PathBuf,
    file: Mutex<File>,
    sync_mode: SyncMode,
}

impl FileLineStore {
    /// Open (or create) a line file at the given path.
    pub fn open(path: &Path, sync_mode: SyncMode) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)?;

        repair_torn_tail(&mut file, path)?;

        debug!(path = %path.display(), "line store opened");
        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
            sync_mode,
        })
    }

    /// Path to the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn decode(&self, bytes: Vec<u8>) -> StoreResult<String> {
        String::from_utf8(bytes).map_err(|_| StoreError::InvalidUtf8 {
            path: self.path.clone(),
        })
    }
}

impl LineStore for FileLineStore {
    fn get_lines(&self) -> StoreResult<Vec<String>> {
        let mut file = self.file.lock().map_err(|_| StoreError::Poisoned)?;
        file.seek(SeekFrom::Start(0))?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        drop(file);

        let text = self.decode(bytes)?;
        Ok(text.lines().map(str::to_string).collect())
    }

    fn get_last_line(&self) -> StoreResult<Option<String>> {
        let mut file = self.file.lock().map_err(|_| StoreError::Poisoned)?;
        let tail = read_last_line(&mut file)?;
        drop(file);

        tail.map(|bytes| self.decode(bytes)).transpose()
    }

    fn append_line(&self, line: &str) -> StoreResult<()> {
        check_single_line(line)?;

        let mut record = Vec::with_capacity(line.len() + 1);
        record.extend_from_slice(line.as_bytes());
        record.push(b'\n');

        let mut file = self.file.lock().map_err(|_| StoreError::Poisoned)?;
        file.write_all(&record)?;
        file.flush()?;
        if self.sync_mode == SyncMode::EveryWrite {
            file.sync_all()?;
        }

        debug!(len = line.len(), "line appended");
        Ok(())
    }
}

impl std::fmt::Debug for FileLineStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileLineStore")
            .field("path", &self.path)
            .field("sync_mode", &self.sync_mode)
            .finish()
    }
}

/// Truncate any bytes following the final `\n`.
fn repair_torn_tail(file: &mut File, path: &Path) -> StoreResult<()> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(());
    }

    let mut last = [0u8; 1];
    file.seek(SeekFrom::Start(len - 1))?;
    file.read_exact(&mut last)?;
    if last[0] == b'\n' {
        return Ok(());
    }

    let keep = match read_last_newline_before(file, len)? {
        Some(pos) => pos + 1,
        None => 0,
    };
    warn!(
        path = %path.display(),
        torn_bytes = len - keep,
        "truncating incomplete trailing line"
    );
    file.set_len(keep)?;
    file.sync_all()?;
    Ok(())
}

/// Offset of the last `\n` strictly before `end`, scanning backwards.
fn read_last_newline_before(file: &mut File, end: u64) -> StoreResult<Option<u64>> {
    let mut chunk = vec![0u8; TAIL_CHUNK];
    let mut upto = end;

    while upto > 0 {
        let read_len = TAIL_CHUNK.min(upto as usize);
        let from = upto - read_len as u64;
        file.seek(SeekFrom::Start(from))?;
        file.read_exact(&mut chunk[..read_len])?;
        if let Some(pos) = chunk[..read_len].iter().rposition(|b| *b == b'\n') {
            return Ok(Some(from + pos as u64));
        }
        upto = from;
    }

    Ok(None)
}

/// Bytes of the last line, without its terminator.
fn read_last_line(file: &mut File) -> StoreResult<Option<Vec<u8>>> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(None);
    }

    // The file always ends with '\n'; the last line ends just before it.
    let end = len - 1;
    let start = match read_last_newline_before(file, end)? {
        Some(pos) => pos + 1,
        None => 0,
    };

    let mut line = vec![0u8; (end - start) as usize];
    file.seek(SeekFrom::Start(start))?;
    file.read_exact(&mut line)?;
    Ok(Some(line))
}
