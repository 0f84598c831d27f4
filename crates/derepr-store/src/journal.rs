//! Journal-backed storage.

use crate::backend::{Backend, Entries};
use crate::error::StoreError;
use derepr_journal::{truncate_tail, JournalReader, JournalWriter, ReadMode, Record, WriteOptions};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Options for opening a [`JournalBackend`].
#[derive(Debug, Clone, Default)]
pub struct StoreOptions {
    /// How to treat a partially written tail on replay (default: strict).
    pub read_mode: ReadMode,
    /// Whether to fsync after each mutation (default: false).
    pub sync: bool,
}

struct State {
    index: BTreeMap<Vec<u8>, Vec<u8>>,
    writer: JournalWriter,
}

/// A backend persisted to a `.drj` journal.
///
/// Opening replays the journal into an in-memory index; every mutation is
/// appended as a record before the index changes. Reads never touch disk.
///
/// With [`ReadMode::Permissive`] a truncated tail left by an interrupted
/// write is logged and cut off so later appends land on a valid frame
/// boundary. With [`ReadMode::Strict`] it is an error.
pub struct JournalBackend {
    path: PathBuf,
    options: StoreOptions,
    state: RwLock<State>,
}

impl JournalBackend {
    /// Opens or creates the journal at `path`.
    pub fn open<P: AsRef<Path>>(path: P, options: StoreOptions) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let index = Self::replay(&path, options.read_mode)?;
        let writer = JournalWriter::open(&path, Self::write_options(&options, true))?;
        debug!(path = %path.display(), entries = index.len(), "opened journal store");
        Ok(Self {
            path,
            options,
            state: RwLock::new(State { index, writer }),
        })
    }

    fn write_options(options: &StoreOptions, append: bool) -> WriteOptions {
        WriteOptions {
            sync: options.sync,
            create: true,
            append,
        }
    }

    fn replay(path: &Path, mode: ReadMode) -> Result<BTreeMap<Vec<u8>, Vec<u8>>, StoreError> {
        let mut index = BTreeMap::new();
        let exists = match fs::metadata(path) {
            Ok(meta) => meta.len() > 0,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => return Err(StoreError::Journal(e.into())),
        };
        if !exists {
            return Ok(index);
        }

        let mut reader = JournalReader::open(path, mode)?;
        let mut records = 0usize;
        while let Some(record) = reader.read_record()? {
            records += 1;
            match record {
                Record::Put { key, value } => {
                    index.insert(key, value);
                }
                Record::Delete { key } => {
                    index.remove(&key);
                }
                Record::Clear => index.clear(),
            }
        }
        if reader.position() < reader.len() {
            warn!(
                path = %path.display(),
                valid = reader.position(),
                len = reader.len(),
                "journal has a partial tail"
            );
            truncate_tail(path, reader.position())?;
        }
        debug!(path = %path.display(), records, live = index.len(), "replayed journal");
        Ok(index)
    }

    /// Path of the underlying journal.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrites the journal so it holds one `Put` per live key.
    ///
    /// The new journal is written beside the old one and renamed over it.
    /// On failure the old journal and writer are left untouched.
    pub fn compact(&self) -> Result<(), StoreError> {
        let mut state = self.state.write();
        let mut scratch = self.path.clone().into_os_string();
        scratch.push(".compact");
        let scratch = PathBuf::from(scratch);

        let records: Vec<Record> = state
            .index
            .iter()
            .map(|(key, value)| Record::Put {
                key: key.clone(),
                value: value.clone(),
            })
            .collect();
        // The scratch writer stays open across the rename and becomes the
        // live writer, so no step after the swap can fail.
        let mut writer = JournalWriter::open(&scratch, Self::write_options(&self.options, false))?;
        if let Err(err) = writer.append_all(&records) {
            drop(writer);
            let _ = fs::remove_file(&scratch);
            return Err(err.into());
        }
        if let Err(err) = fs::rename(&scratch, &self.path) {
            drop(writer);
            let _ = fs::remove_file(&scratch);
            return Err(StoreError::Journal(err.into()));
        }
        state.writer = writer;
        debug!(path = %self.path.display(), live = records.len(), "compacted journal");
        Ok(())
    }
}

impl Backend for JournalBackend {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.state.read().index.get(key).cloned())
    }

    fn get_many(&self, keys: &[Vec<u8>]) -> Result<Vec<Option<Vec<u8>>>, StoreError> {
        let state = self.state.read();
        Ok(keys.iter().map(|key| state.index.get(key).cloned()).collect())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        let mut state = self.state.write();
        state.writer.append(&Record::Put {
            key: key.to_vec(),
            value: value.to_vec(),
        })?;
        state.index.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn put_many(&self, items: Entries) -> Result<(), StoreError> {
        if items.is_empty() {
            return Ok(());
        }
        let records: Vec<Record> = items
            .into_iter()
            .map(|(key, value)| Record::Put { key, value })
            .collect();
        let mut state = self.state.write();
        state.writer.append_all(&records)?;
        for record in records {
            if let Record::Put { key, value } = record {
                state.index.insert(key, value);
            }
        }
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<bool, StoreError> {
        let mut state = self.state.write();
        if !state.index.contains_key(key) {
            return Ok(false);
        }
        state.writer.append(&Record::Delete { key: key.to_vec() })?;
        state.index.remove(key);
        Ok(true)
    }

    fn count(&self) -> Result<usize, StoreError> {
        Ok(self.state.read().index.len())
    }

    fn entries(&self) -> Result<Entries, StoreError> {
        Ok(self
            .state
            .read()
            .index
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut state = self.state.write();
        state.writer.append(&Record::Clear)?;
        state.index.clear();
        Ok(())
    }

    fn contains(&self, key: &[u8]) -> Result<bool, StoreError> {
        Ok(self.state.read().index.contains_key(key))
    }
}
