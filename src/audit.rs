//! Ring buffer of operation records, each carrying a recomputable hash.
//!
//! The hash is a corruption detector, not a signature: it catches an entry whose
//! fields were changed without updating the hash, but anyone able to write the
//! description can also write a matching hash. Being a byte sum, it also misses
//! edits that keep the sum, such as two swapped characters. Once more than
//! `capacity` entries have been written, the oldest are overwritten and cannot be
//! recovered.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::structs::InodeId;

/// Stands in for the inode id of operations that touch no inode.
pub const NO_INODE: i64 = -1;

/// Byte sum of the description XOR-ed with the inode id and the timestamp seconds.
pub fn compute_hash(description: &str, inode_id: Option<InodeId>, timestamp: DateTime<Utc>) -> u32 {
    let sum = description
        .bytes()
        .fold(0u32, |acc, b| acc.wrapping_add(b as u32));
    let id = inode_id.map_or(NO_INODE, |id| id.raw() as i64);
    (id ^ timestamp.timestamp() ^ sum as i64) as u32
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub description: String,
    pub inode_id: Option<InodeId>,
    pub timestamp: DateTime<Utc>,
    pub hash: u32,
}

impl LogEntry {
    pub fn new(description: String, inode_id: Option<InodeId>, timestamp: DateTime<Utc>) -> Self {
        let hash = compute_hash(&description, inode_id, timestamp);
        Self {
            description,
            inode_id,
            timestamp,
            hash,
        }
    }

    pub fn verify(&self) -> bool {
        compute_hash(&self.description, self.inode_id, self.timestamp) == self.hash
    }
}

/// What the log hands out for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub description: String,
    pub hash: u32,
    pub verified: bool,
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.verified { "OK" } else { "TAMPERED!" };
        write!(
            f,
            "[{}] {} | Hash: {} | Status: {}",
            self.timestamp.timestamp(),
            self.description,
            self.hash,
            status
        )
    }
}

#[derive(Debug)]
pub struct AuditLog {
    slots: Vec<LogEntry>,
    capacity: usize,
    total: u64,
}

impl AuditLog {
    /// `capacity` must be non-zero; `FsConfig::validate` enforces this for the filesystem.
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::new(),
            capacity,
            total: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries ever appended, overwritten ones included.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Physically populated slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Writes to slot `total % capacity`, overwriting once the buffer has wrapped.
    pub fn append(&mut self, description: String, inode_id: Option<InodeId>, timestamp: DateTime<Utc>) {
        let slot = (self.total % self.capacity as u64) as usize;
        let entry = LogEntry::new(description, inode_id, timestamp);
        if slot < self.slots.len() {
            self.slots[slot] = entry;
        } else {
            self.slots.push(entry);
        }
        self.total += 1;
    }

    /// Physical slot access, for inspecting or corrupting a stored entry.
    pub fn slot(&self, index: usize) -> Option<&LogEntry> {
        self.slots.get(index)
    }

    pub fn slot_mut(&mut self, index: usize) -> Option<&mut LogEntry> {
        self.slots.get_mut(index)
    }

    /// Populated entries from oldest to newest.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        let start = if self.total > self.capacity as u64 {
            (self.total % self.capacity as u64) as usize
        } else {
            0
        };
        self.slots[start..].iter().chain(self.slots[..start].iter())
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.entries()
            .map(|entry| LogRecord {
                timestamp: entry.timestamp,
                description: entry.description.clone(),
                hash: entry.hash,
                verified: entry.verify(),
            })
            .collect()
    }

    pub fn verify_all(&self) -> bool {
        self.slots.iter().all(LogEntry::verify)
    }
}
