//! Key/value mutation records carried in journal frames.

use crate::errors::JournalError;
use crate::frame::{FrameKind, MAX_PAYLOAD_SIZE};

/// A single mutation of a byte-keyed store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    /// Store `value` under `key`, replacing any previous value.
    Put {
        /// Encoded key.
        key: Vec<u8>,
        /// Encoded value.
        value: Vec<u8>,
    },
    /// Remove `key` if present.
    Delete {
        /// Encoded key.
        key: Vec<u8>,
    },
    /// Remove every key.
    Clear,
}

impl Record {
    /// Frame kind used to store this record.
    pub fn kind(&self) -> FrameKind {
        match self {
            Record::Put { .. } => FrameKind::Put,
            Record::Delete { .. } => FrameKind::Delete,
            Record::Clear => FrameKind::Clear,
        }
    }

    /// Serializes the record body.
    ///
    /// `Put` payloads are `key_len: u32 LE | key | value`; `Delete` payloads
    /// are the bare key; `Clear` is empty.
    pub fn to_payload(&self) -> Result<Vec<u8>, JournalError> {
        match self {
            Record::Put { key, value } => {
                let size = 4 + key.len() as u64 + value.len() as u64;
                if size > MAX_PAYLOAD_SIZE as u64 {
                    return Err(JournalError::PayloadTooLarge {
                        size,
                        max: MAX_PAYLOAD_SIZE,
                    });
                }
                let mut payload = Vec::with_capacity(size as usize);
                payload.extend_from_slice(&(key.len() as u32).to_le_bytes());
                payload.extend_from_slice(key);
                payload.extend_from_slice(value);
                Ok(payload)
            }
            Record::Delete { key } => Ok(key.clone()),
            Record::Clear => Ok(Vec::new()),
        }
    }

    /// Parses a frame body. Returns `Ok(None)` for unknown kinds.
    pub fn from_frame(
        kind: FrameKind,
        payload: Vec<u8>,
        offset: u64,
    ) -> Result<Option<Self>, JournalError> {
        match kind {
            FrameKind::Put => {
                if payload.len() < 4 {
                    return Err(JournalError::InvalidRecord {
                        offset,
                        reason: format!("put payload too short: {} bytes", payload.len()),
                    });
                }
                let key_len =
                    u32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]]) as usize;
                if key_len > payload.len() - 4 {
                    return Err(JournalError::InvalidRecord {
                        offset,
                        reason: format!(
                            "key length {} exceeds payload of {} bytes",
                            key_len,
                            payload.len()
                        ),
                    });
                }
                let mut head = payload;
                let value = head.split_off(4 + key_len);
                let key = head.split_off(4);
                Ok(Some(Record::Put { key, value }))
            }
            FrameKind::Delete => Ok(Some(Record::Delete { key: payload })),
            FrameKind::Clear => {
                if !payload.is_empty() {
                    return Err(JournalError::InvalidRecord {
                        offset,
                        reason: "clear record carries a payload".to_string(),
                    });
                }
                Ok(Some(Record::Clear))
            }
            FrameKind::Unknown(_) => Ok(None),
        }
    }
}
