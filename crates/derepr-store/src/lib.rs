//! Persistent mappings keyed by canonical literals.
//!
//! This crate provides:
//! - [`Backend`], a byte-keyed store, with in-memory and journal-backed
//!   implementations
//! - [`Codec`], the strategy that turns typed keys and values into bytes
//! - [`LiteMap`], a typed mapping over any backend and codec
//!
//! With [`ReprCodec`] keys are stored as their canonical key text, so two
//! structurally equal keys always address the same entry no matter how or
//! where they were built.
//!
//! ```rust
//! use derepr_canonical::Value;
//! use derepr_store::{JournalBackend, LiteMap, ReprCodec, StoreOptions};
//!
//! let dir = tempfile::tempdir()?;
//! let path = dir.path().join("words.drj");
//! {
//!     let map = LiteMap::open(&path)?;
//!     for (i, word) in "this is a sequence".split(' ').enumerate() {
//!         let key = Value::tuple([Value::text("word"), Value::from(i)]);
//!         map.insert(&key, &Value::text(word))?;
//!     }
//! }
//!
//! let backend = JournalBackend::open(&path, StoreOptions::default())?;
//! let map = LiteMap::new(backend, ReprCodec::default());
//! assert_eq!(map.len()?, 4);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]

/// Storage backend trait.
pub mod backend;
pub mod codec;
/// Error types for store operations.
pub mod error;
pub mod journal;
pub mod map;
/// In-memory backend.
pub mod memory;

pub use backend::{Backend, Entries};
pub use codec::{BytesCodec, Codec, JsonCodec, ReprCodec};
pub use derepr_journal::ReadMode;
pub use error::StoreError;
pub use journal::{JournalBackend, StoreOptions};
pub use map::LiteMap;
pub use memory::MemoryBackend;
