//! Append-only entry store backed by a single JSON array file.
//!
//! Every append rewrites the whole file: read the current array, push the
//! new entry, write the result to a temp file in the same directory, fsync,
//! then rename it over the store. Writers are serialized twice: a mutex
//! inside the store for threads sharing one instance, and an exclusive
//! advisory lock on a `<file>.lock` sidecar for separate processes. The
//! sidecar is locked rather than the data file because the data file is
//! replaced on every write.
//!
//! Reads never fail on bad content. A store file that does not parse loads
//! as an empty list, and the next append copies the unparseable bytes to a
//! `<file>.corrupt-<timestamp>` sidecar before writing the new array.

use crate::{Entry, Error, Result};
use chrono::Utc;
use fs2::FileExt;
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

/// Persistence seam for saved entries
pub trait EntryStore {
    /// Read every stored entry in insertion order
    fn load(&self) -> Result<Vec<Entry>>;

    /// Add one entry to the end of the collection
    fn append(&self, entry: &Entry) -> Result<()>;

    /// All entries, newest first
    fn list_sorted_descending(&self) -> Result<Vec<Entry>> {
        let mut entries = self.load()?;
        sort_newest_first(&mut entries);
        Ok(entries)
    }
}

/// Stable sort by timestamp, newest first
pub fn sort_newest_first(entries: &mut [Entry]) {
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

/// Store file contents as found on disk
enum Contents {
    Entries(Vec<Entry>),
    Unparseable(Vec<u8>),
}

/// JSON-array file store with serialized writers
pub struct JsonFileStore {
    path: PathBuf,
    lock_path: PathBuf,
    writer: Mutex<()>,
}

impl JsonFileStore {
    /// Create a store for the given file path (nothing is touched on disk yet)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let lock_path = sidecar_path(&path, ".lock");
        Self {
            path,
            lock_path,
            writer: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        }
    }

    /// Open (creating if needed) the lock sidecar
    fn open_lock(&self) -> Result<File> {
        std::fs::create_dir_all(self.parent_dir())?;
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&self.lock_path)?;
        Ok(file)
    }

    /// Write `[]` if the store file does not exist yet
    fn ensure_initialized(&self, lock: &File) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }

        lock.lock_exclusive()?;
        let result = if self.path.exists() {
            Ok(())
        } else {
            tracing::info!("Initializing empty entry store at {:?}", self.path);
            self.write_entries(&[])
        };
        self.release(lock);
        result
    }

    /// Unlock the sidecar. A failure is only logged: closing the handle
    /// releases the lock anyway, and the guarded work already completed.
    fn release(&self, lock: &File) {
        if let Err(e) = lock.unlock() {
            tracing::warn!("Failed to unlock {:?}: {}", self.lock_path, e);
        }
    }

    fn read_contents(&self) -> Result<Contents> {
        let raw = std::fs::read(&self.path)?;

        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Contents::Entries(Vec::new()));
        }

        match serde_json::from_slice::<Vec<Entry>>(&raw) {
            Ok(entries) => Ok(Contents::Entries(entries)),
            Err(e) => {
                tracing::warn!(
                    "Failed to parse entry store {:?}: {}. Treating as empty.",
                    self.path,
                    e
                );
                Ok(Contents::Unparseable(raw))
            }
        }
    }

    /// Atomically replace the store file with `entries`
    fn write_entries(&self, entries: &[Entry]) -> Result<()> {
        let temp = NamedTempFile::new_in(self.parent_dir())?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, entries)?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }

    /// Copy unparseable store bytes aside so the next rewrite does not lose them
    fn preserve_unparseable(&self, raw: &[u8]) -> Result<PathBuf> {
        let suffix = format!(".corrupt-{}", Utc::now().format("%Y%m%dT%H%M%S%6fZ"));
        let backup = sidecar_path(&self.path, &suffix);
        std::fs::write(&backup, raw)?;
        tracing::warn!(
            "Preserved unparseable entry store contents at {:?}",
            backup
        );
        Ok(backup)
    }

    fn append_locked(&self, entry: &Entry) -> Result<usize> {
        let mut entries = if self.path.exists() {
            match self.read_contents()? {
                Contents::Entries(entries) => entries,
                Contents::Unparseable(raw) => {
                    self.preserve_unparseable(&raw)?;
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        entries.push(entry.clone());
        self.write_entries(&entries)?;
        Ok(entries.len())
    }
}

impl EntryStore for JsonFileStore {
    /// Creates the store as `[]` if it is missing. Unreadable or unparseable
    /// content loads as an empty list.
    fn load(&self) -> Result<Vec<Entry>> {
        let lock = self.open_lock()?;
        self.ensure_initialized(&lock)?;

        lock.lock_shared()?;
        let contents = self.read_contents();
        self.release(&lock);

        match contents {
            Ok(Contents::Entries(entries)) => {
                tracing::debug!("Loaded {} entries from {:?}", entries.len(), self.path);
                Ok(entries)
            }
            Ok(Contents::Unparseable(_)) => Ok(Vec::new()),
            Err(e) => {
                tracing::warn!(
                    "Unable to read entry store {:?}: {}. Using empty list.",
                    self.path,
                    e
                );
                Ok(Vec::new())
            }
        }
    }

    /// Rejects entries with NaN or infinite inputs: they cannot be stored as
    /// JSON numbers and would make the whole file unreadable.
    fn append(&self, entry: &Entry) -> Result<()> {
        if !entry.is_finite() {
            return Err(Error::Store("non-finite value in entry".into()));
        }

        let _guard = self
            .writer
            .lock()
            .map_err(|_| Error::Store("entry store writer lock poisoned".into()))?;

        let lock = self.open_lock()?;
        lock.lock_exclusive()?;
        let result = self.append_locked(entry);
        self.release(&lock);

        let count = result?;
        tracing::debug!(
            "Appended entry for {:?} to {:?} ({} total)",
            entry.name,
            self.path,
            count
        );
        Ok(())
    }
}

/// `users.json` + `.lock` → `users.json.lock`
fn sidecar_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("entries"));
    name.push(suffix);
    path.with_file_name(name)
}
