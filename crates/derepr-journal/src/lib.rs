//! Append-only record journal backing derepr stores.
//!
//! A journal (`.drj`) is a 16-byte header followed by framed records. Each
//! record is one mutation of a byte-keyed store: `Put`, `Delete` or `Clear`.
//! Replaying the records in order rebuilds the store.
//!
//! ## Quick Start
//!
//! ```rust
//! use derepr_journal::{JournalReader, JournalWriter, ReadMode, Record, WriteOptions};
//!
//! let dir = tempfile::tempdir()?;
//! let path = dir.path().join("store.drj");
//!
//! let mut writer = JournalWriter::open(&path, WriteOptions::default())?;
//! writer.append(&Record::Put { key: b"u'a'".to_vec(), value: b"1".to_vec() })?;
//! writer.append(&Record::Delete { key: b"u'a'".to_vec() })?;
//! writer.finish()?;
//!
//! let mut reader = JournalReader::open(&path, ReadMode::Strict)?;
//! let mut replayed = Vec::new();
//! while let Some(record) = reader.read_record()? {
//!     replayed.push(record);
//! }
//! assert_eq!(replayed.len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Layout
//!
//! - Header: magic `DRJ1`, version `u16` LE, flags `u16` LE, 8 reserved bytes.
//! - Frame: kind `u8`, 3 reserved bytes, payload length `u32` LE, payload.
//! - Kinds: `0x01` put, `0x02` delete, `0x03` clear. Unknown kinds are skipped.

#![deny(missing_docs)]

/// Error types for journal operations.
pub mod errors;
/// Frame structure and serialization.
pub mod frame;
/// Journal reader implementation.
pub mod reader;
pub mod record;
/// Journal writer implementation.
pub mod writer;

pub use errors::JournalError;
pub use frame::{FrameKind, JournalHeader, RecordFrame};
pub use reader::{JournalReader, ReadMode};
pub use record::Record;
pub use writer::{truncate_tail, JournalWriter, WriteOptions};
