//! Journal reader implementation.

use crate::errors::JournalError;
use crate::frame::{FrameKind, JournalHeader, RecordFrame, FRAME_HEADER_SIZE, HEADER_SIZE};
use crate::record::Record;
use std::fs::File;
use std::io::{self, Read, Seek};
use std::path::Path;
use tracing::{debug, warn};

/// Read mode for handling truncation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadMode {
    /// Strict mode: truncated frames are errors.
    #[default]
    Strict,
    /// Permissive mode: truncation is treated as end-of-file.
    Permissive,
}

/// Journal reader for replaying records from a journal file.
///
/// The reader supports two modes:
/// - [`ReadMode::Strict`] - Truncated frames are errors
/// - [`ReadMode::Permissive`] - Truncation is treated as end-of-file
///
/// [`position`](JournalReader::position) always points just past the last
/// complete frame, so after a permissive read it marks where the valid
/// journal ends.
///
/// # Example
///
/// ```rust
/// use derepr_journal::{JournalReader, JournalWriter, ReadMode, Record, WriteOptions};
///
/// let dir = tempfile::tempdir()?;
/// let path = dir.path().join("store.drj");
/// let mut writer = JournalWriter::open(&path, WriteOptions::default())?;
/// writer.append(&Record::Delete { key: b"0".to_vec() })?;
/// writer.finish()?;
///
/// let mut reader = JournalReader::open(&path, ReadMode::Strict)?;
/// while let Some(record) = reader.read_record()? {
///     println!("{:?}", record);
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct JournalReader {
    file: File,
    mode: ReadMode,
    position: u64,
    len: u64,
}

impl JournalReader {
    /// Opens a journal file for reading.
    ///
    /// The file header is validated and the reader is positioned at the first
    /// record frame after the header.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError`](crate::JournalError) if the file cannot be
    /// opened or its header is invalid.
    pub fn open<P: AsRef<Path>>(path: P, mode: ReadMode) -> Result<Self, JournalError> {
        let path = path.as_ref();
        let mut file = File::open(path)?;
        Self::read_header(&mut file)?;
        let len = file.metadata()?.len();
        debug!(path = %path.display(), len, ?mode, "opened journal for reading");

        Ok(Self {
            file,
            mode,
            position: HEADER_SIZE as u64,
            len,
        })
    }

    fn read_header(file: &mut File) -> Result<JournalHeader, JournalError> {
        file.seek(io::SeekFrom::Start(0))?;
        let mut header_bytes = [0u8; HEADER_SIZE];
        match file.read_exact(&mut header_bytes) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                return Err(JournalError::InvalidHeader(
                    "file shorter than header".to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        }
        JournalHeader::from_bytes(&header_bytes)
    }

    /// Offset just past the last complete frame read.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// File length observed when the reader was opened.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the journal holds no frames.
    pub fn is_empty(&self) -> bool {
        self.len <= HEADER_SIZE as u64
    }

    fn truncated(&self, offset: u64) -> Result<Option<(FrameKind, Vec<u8>)>, JournalError> {
        if self.mode == ReadMode::Permissive {
            warn!(offset, "truncated frame, treating as end of journal");
            return Ok(None);
        }
        Err(JournalError::TruncatedFrame { offset })
    }

    /// Reads the next frame from the journal.
    ///
    /// Returns `Ok(None)` at end-of-file (or truncation in permissive mode).
    pub fn read_frame(&mut self) -> Result<Option<(FrameKind, Vec<u8>)>, JournalError> {
        if self.position >= self.len {
            return Ok(None);
        }
        let offset = self.position;
        self.file.seek(io::SeekFrom::Start(offset))?;

        let mut frame_header_bytes = [0u8; FRAME_HEADER_SIZE];
        match self.file.read_exact(&mut frame_header_bytes) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return self.truncated(offset),
            Err(e) => return Err(e.into()),
        }
        let frame = RecordFrame::from_bytes(&frame_header_bytes, offset)?;

        let mut payload = vec![0u8; frame.len as usize];
        match self.file.read_exact(&mut payload) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return self.truncated(offset),
            Err(e) => return Err(e.into()),
        }

        self.position = offset + FRAME_HEADER_SIZE as u64 + frame.len as u64;
        Ok(Some((frame.kind, payload)))
    }

    /// Reads the next record, skipping frames of unknown kind.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError`](crate::JournalError) if a frame is malformed,
    /// a record body does not parse, or (in strict mode) the journal is
    /// truncated.
    pub fn read_record(&mut self) -> Result<Option<Record>, JournalError> {
        loop {
            let offset = self.position;
            let Some((kind, payload)) = self.read_frame()? else {
                return Ok(None);
            };
            match Record::from_frame(kind, payload, offset)? {
                Some(record) => return Ok(Some(record)),
                None => {
                    warn!(offset, kind = kind.to_byte(), "skipping unknown frame kind");
                }
            }
        }
    }
}
