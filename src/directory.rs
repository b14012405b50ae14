use alloc::vec::Vec;

use tracing::debug;

use crate::error::{FsError, Resource, Result};
use crate::structs::*;

/// One flat namespace of entries kept in insertion order.
/// Names are not required to be unique; lookups return the first match.
#[derive(Debug)]
pub struct DirectoryTable {
    entries: Vec<DirEntry>,
    capacity: usize,
}

impl DirectoryTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Finds the first entry called `name`, without following soft links.
    pub fn dir_lookup(&self, name: &str) -> Option<&DirEntry> {
        let found = self.entries.iter().find(|entry| entry.name_eq(name));
        debug!("[dir_lookup] query {}, found {:?}", name, found.map(|e| &e.kind));
        found
    }

    /// Appends an entry. Does not touch the links count of the inode it points to,
    /// which is the caller's responsibility.
    pub fn dir_add_entry(&mut self, entry: DirEntry) -> Result<()> {
        if self.is_full() {
            return Err(FsError::CapacityExceeded(Resource::DirectoryEntries));
        }
        debug!("adding entry {} -> {:?}", entry.name, entry.kind);
        self.entries.push(entry);
        Ok(())
    }

    pub fn read_dir(&self) -> &[DirEntry] {
        &self.entries
    }
}
