//! Journal writer implementation.

use crate::errors::JournalError;
use crate::frame::{FrameKind, JournalHeader, RecordFrame, HEADER_SIZE};
use crate::record::Record;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, Write};
use std::path::Path;
use tracing::{debug, warn};

/// Options for journal writing.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Whether to fsync after each append (default: false).
    pub sync: bool,
    /// Whether to create the file if it doesn't exist (default: true).
    pub create: bool,
    /// Whether to keep existing records (default: true). When false the
    /// journal is reset to an empty one.
    pub append: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            sync: false,
            create: true,
            append: true,
        }
    }
}

/// Journal writer for append-only record storage.
///
/// # Example
///
/// ```rust
/// use derepr_journal::{JournalWriter, Record, WriteOptions};
///
/// let dir = tempfile::tempdir()?;
/// let mut writer = JournalWriter::open(dir.path().join("store.drj"), WriteOptions::default())?;
/// writer.append(&Record::Put { key: b"u'a'".to_vec(), value: b"1".to_vec() })?;
/// writer.append(&Record::Clear)?;
/// writer.finish()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct JournalWriter {
    file: File,
    sync: bool,
}

impl JournalWriter {
    /// Opens or creates a journal file for writing.
    ///
    /// An empty file gets a fresh header. An existing file must start with a
    /// valid header; it is then appended to, or reset when
    /// `options.append` is `false`.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError`](crate::JournalError) if the file cannot be
    /// opened, is not a journal, or is shorter than a header.
    pub fn open<P: AsRef<Path>>(path: P, options: WriteOptions) -> Result<Self, JournalError> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(options.create)
            .write(true)
            .read(true)
            .open(path)?;

        let mut writer = Self {
            file,
            sync: options.sync,
        };

        let len = writer.file.metadata()?.len();
        if len == 0 {
            writer.write_header()?;
        } else if len < HEADER_SIZE as u64 {
            return Err(JournalError::FileNotEmpty);
        } else {
            let mut header_bytes = [0u8; HEADER_SIZE];
            writer.file.seek(io::SeekFrom::Start(0))?;
            writer.file.read_exact(&mut header_bytes)?;
            JournalHeader::from_bytes(&header_bytes)?;
            if options.append {
                writer.file.seek(io::SeekFrom::End(0))?;
            } else {
                writer.file.set_len(HEADER_SIZE as u64)?;
                writer.file.seek(io::SeekFrom::Start(HEADER_SIZE as u64))?;
            }
        }
        debug!(path = %path.display(), len, append = options.append, "opened journal for writing");

        Ok(writer)
    }

    fn write_header(&mut self) -> Result<(), JournalError> {
        let bytes = JournalHeader::new().to_bytes();
        self.file.write_all(&bytes)?;
        self.flush()
    }

    fn flush(&mut self) -> Result<(), JournalError> {
        self.file.flush()?;
        if self.sync {
            self.file.sync_all()?;
        }
        Ok(())
    }

    /// Appends a record.
    pub fn append(&mut self, record: &Record) -> Result<(), JournalError> {
        let payload = record.to_payload()?;
        self.append_raw(record.kind(), &payload)
    }

    /// Appends several records with a single flush.
    ///
    /// Every record is encoded and size-checked before the first byte is
    /// written. If the write itself fails, the file is cut back to its
    /// length before the batch, so a batch lands completely or not at all.
    pub fn append_all<'a, I>(&mut self, records: I) -> Result<(), JournalError>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut batch = Vec::new();
        let mut count = 0usize;
        for record in records {
            let payload = record.to_payload()?;
            encode_frame(&mut batch, record.kind(), &payload)?;
            count += 1;
        }
        if count == 0 {
            return Ok(());
        }
        self.write_batch(&batch)?;
        debug!(records = count, bytes = batch.len(), "appended batch");
        Ok(())
    }

    /// Appends a raw frame with the given kind and payload.
    pub fn append_raw(&mut self, kind: FrameKind, payload: &[u8]) -> Result<(), JournalError> {
        let mut buf = Vec::new();
        encode_frame(&mut buf, kind, payload)?;
        self.write_batch(&buf)
    }

    fn write_batch(&mut self, bytes: &[u8]) -> Result<(), JournalError> {
        let start = self.file.stream_position()?;
        let mut written = self.file.write_all(bytes).map_err(JournalError::from);
        if written.is_ok() {
            written = self.flush();
        }
        if let Err(err) = written {
            warn!(offset = start, error = %err, "write failed, rolling back batch");
            self.file.set_len(start)?;
            self.file.seek(io::SeekFrom::Start(start))?;
            return Err(err);
        }
        Ok(())
    }

    /// Finishes writing and closes the file.
    pub fn finish(mut self) -> Result<(), JournalError> {
        self.flush()
    }
}

fn encode_frame(buf: &mut Vec<u8>, kind: FrameKind, payload: &[u8]) -> Result<(), JournalError> {
    let frame = RecordFrame::new(kind, payload.len())?;
    buf.extend_from_slice(&frame.to_bytes());
    buf.extend_from_slice(payload);
    Ok(())
}

impl Drop for JournalWriter {
    fn drop(&mut self) {
        let _ = self.file.flush();
        if self.sync {
            let _ = self.file.sync_all();
        }
    }
}

/// Cuts the journal at `valid_len`, dropping a partially written tail.
///
/// Returns the number of bytes discarded.
pub fn truncate_tail<P: AsRef<Path>>(path: P, valid_len: u64) -> Result<u64, JournalError> {
    if valid_len < HEADER_SIZE as u64 {
        return Err(JournalError::InvalidHeader(format!(
            "cannot truncate below header: {} bytes",
            valid_len
        )));
    }
    let file = OpenOptions::new().write(true).open(path.as_ref())?;
    let len = file.metadata()?.len();
    if len <= valid_len {
        return Ok(0);
    }
    file.set_len(valid_len)?;
    file.sync_all()?;
    warn!(
        path = %path.as_ref().display(),
        discarded = len - valid_len,
        "truncated partial journal tail"
    );
    Ok(len - valid_len)
}
