use alloc::format;
use alloc::vec;
use alloc::vec::Vec;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::access::{can_link, can_read};
use crate::audit::{AuditLog, LogRecord};
use crate::block::BlockStore;
use crate::config::FsConfig;
use crate::directory::DirectoryTable;
use crate::error::{FsError, Resource, Result};
use crate::file::{fread, fwrite};
use crate::inode::{pool_blocks_for, InodeTable};
use crate::path::resolve;
use crate::structs::*;

/// Counters and capacities of a filesystem instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Usage {
    pub blocks_used: usize,
    pub blocks_total: usize,
    pub inodes_used: usize,
    pub inodes_total: usize,
    pub dir_entries: usize,
    pub logs_written: u64,
}

/// All state of one filesystem. Operations run to completion on the caller's thread;
/// wrap the instance in a lock if it has to be shared.
#[derive(Debug)]
pub struct FileSystem {
    config: FsConfig,
    blocks: BlockStore,
    inodes: InodeTable,
    directory: DirectoryTable,
    logs: AuditLog,
}

impl Default for FileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem {
    /// An empty filesystem with the default capacities.
    pub fn new() -> Self {
        Self::build(FsConfig::default())
    }

    pub fn with_config(config: FsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: FsConfig) -> Self {
        Self {
            blocks: BlockStore::new(config.max_blocks),
            inodes: InodeTable::new(config.max_inodes),
            directory: DirectoryTable::new(config.max_dir_entries),
            logs: AuditLog::new(config.max_logs),
            config,
        }
    }

    /// Creates a file holding `data` and binds `name` to it.
    /// Every capacity is checked up front, so a failed call leaves no trace.
    pub fn create_file(
        &mut self,
        name: &str,
        permissions: &str,
        uid: u32,
        gid: u32,
        data: &[u8],
    ) -> Result<InodeId> {
        validate_name(name)?;
        let permissions: Permissions = permissions.parse()?;

        if self.inodes.is_full() {
            return Err(self.capacity_exceeded(name, Resource::Inodes));
        }
        if self.blocks.is_full() {
            return Err(self.capacity_exceeded(name, Resource::Blocks));
        }
        if self.directory.is_full() {
            return Err(self.capacity_exceeded(name, Resource::DirectoryEntries));
        }
        let needed = pool_blocks_for(data.len()).map_err(|e| {
            warn!("{} bytes do not fit in one file: {}", data.len(), e);
            e
        })?;
        if needed > self.blocks.free_blocks() {
            return Err(self.capacity_exceeded(name, Resource::Blocks));
        }

        let now = Utc::now();
        let inode_id = self.inodes.alloc_inode(permissions, uid, gid, now)?;
        let inode = self.inodes.get_inode_mut(inode_id)?;
        fwrite(&mut self.blocks, inode, data)?;
        self.directory.dir_add_entry(DirEntry::new(inode_id, name)?)?;

        self.logs.append(
            format!("Created file {} (UID:{} GID:{})", name, uid, gid),
            Some(inode_id),
            now,
        );
        info!("created {} as inode {} ({} bytes)", name, inode_id, data.len());
        Ok(inode_id)
    }

    /// Reads up to `max_len` bytes of `name`, following soft links.
    pub fn read_file(&mut self, name: &str, uid: u32, gid: u32, max_len: usize) -> Result<Vec<u8>> {
        let inode_id = self.open_for_read(name, uid, gid)?;
        let inode = self.inodes.get_inode(inode_id)?;
        let mut buf = vec![0u8; max_len.min(inode.size as usize)];
        let bytes_read = fread(&self.blocks, inode, 0, &mut buf)?;
        buf.truncate(bytes_read);
        self.log_read(name, uid, gid, inode_id, bytes_read);
        Ok(buf)
    }

    /// Reads `name` into `buf` and returns the byte count.
    /// If the content is shorter than `buf`, a NUL byte follows it.
    pub fn read_into(&mut self, name: &str, uid: u32, gid: u32, buf: &mut [u8]) -> Result<usize> {
        let inode_id = self.open_for_read(name, uid, gid)?;
        let inode = self.inodes.get_inode(inode_id)?;
        let bytes_read = fread(&self.blocks, inode, 0, buf)?;
        if let Some(terminator) = buf.get_mut(bytes_read) {
            *terminator = 0;
        }
        self.log_read(name, uid, gid, inode_id, bytes_read);
        Ok(bytes_read)
    }

    fn open_for_read(&self, name: &str, uid: u32, gid: u32) -> Result<InodeId> {
        let inode_id = self.lookup(name)?;
        let inode = self.inodes.get_inode(inode_id)?;
        if !can_read(inode, uid, gid) {
            warn!("read of {} denied for uid {} gid {}", name, uid, gid);
            return Err(FsError::PermissionDenied {
                name: name.to_string(),
                uid,
            });
        }
        Ok(inode_id)
    }

    fn log_read(&mut self, name: &str, uid: u32, gid: u32, inode_id: InodeId, bytes_read: usize) {
        self.logs.append(
            format!("Read file {} (UID:{} GID:{})", name, uid, gid),
            Some(inode_id),
            Utc::now(),
        );
        info!("read {} bytes from {} (inode {})", bytes_read, name, inode_id);
    }

    /// Binds `new_name` to the inode behind `existing_name`.
    pub fn create_hard_link(&mut self, existing_name: &str, new_name: &str, uid: u32) -> Result<()> {
        validate_name(new_name)?;
        let inode_id = self.lookup(existing_name)?;
        if !can_link(self.inodes.get_inode(inode_id)?, uid) {
            warn!("hard link to {} denied for uid {}", existing_name, uid);
            return Err(FsError::PermissionDenied {
                name: existing_name.to_string(),
                uid,
            });
        }
        if self.directory.is_full() {
            return Err(self.capacity_exceeded(new_name, Resource::DirectoryEntries));
        }

        self.directory.dir_add_entry(DirEntry::new(inode_id, new_name)?)?;
        self.inodes.get_inode_mut(inode_id)?.links_cnt += 1;

        self.logs.append(
            format!("Created hard link {} to {} by UID {}", new_name, existing_name, uid),
            Some(inode_id),
            Utc::now(),
        );
        info!("hard linked {} to inode {}", new_name, inode_id);
        Ok(())
    }

    /// Adds an entry that refers to `existing_name` by name.
    /// The target does not have to exist; it is looked up on every read.
    pub fn create_soft_link(&mut self, existing_name: &str, new_name: &str, uid: u32) -> Result<()> {
        let entry = DirEntry::soft_link(new_name, existing_name)?;
        if self.directory.is_full() {
            return Err(self.capacity_exceeded(new_name, Resource::DirectoryEntries));
        }
        self.directory.dir_add_entry(entry)?;

        self.logs.append(
            format!("Created soft link {} to {} by UID {}", new_name, existing_name, uid),
            None,
            Utc::now(),
        );
        info!("soft linked {} to {}", new_name, existing_name);
        Ok(())
    }

    /// Every populated log slot, oldest first, with its hash rechecked.
    pub fn list_logs(&self) -> Vec<LogRecord> {
        let records = self.logs.records();
        for record in records.iter().filter(|r| !r.verified) {
            warn!("log entry failed verification: {}", record);
        }
        records
    }

    pub fn verify_logs(&self) -> bool {
        self.logs.verify_all()
    }

    pub fn lookup(&self, name: &str) -> Result<InodeId> {
        resolve(&self.directory, name, self.config.max_link_depth)
    }

    /// Metadata of the inode behind `name`, following soft links.
    pub fn stat(&self, name: &str) -> Result<Inode> {
        let inode_id = self.lookup(name)?;
        self.inodes.get_inode(inode_id).cloned()
    }

    pub fn get_inode(&self, inode_id: InodeId) -> Result<&Inode> {
        self.inodes.get_inode(inode_id)
    }

    pub fn read_dir(&self) -> &[DirEntry] {
        self.directory.read_dir()
    }

    pub fn usage(&self) -> Usage {
        Usage {
            blocks_used: self.blocks.len(),
            blocks_total: self.blocks.capacity(),
            inodes_used: self.inodes.len(),
            inodes_total: self.inodes.capacity(),
            dir_entries: self.directory.len(),
            logs_written: self.logs.total(),
        }
    }

    pub fn config(&self) -> &FsConfig {
        &self.config
    }

    pub fn blocks(&self) -> &BlockStore {
        &self.blocks
    }

    pub fn audit_log(&self) -> &AuditLog {
        &self.logs
    }

    pub fn audit_log_mut(&mut self) -> &mut AuditLog {
        &mut self.logs
    }

    fn capacity_exceeded(&self, name: &str, resource: Resource) -> FsError {
        warn!("cannot add {}: {} is full", name, resource);
        FsError::CapacityExceeded(resource)
    }
}
