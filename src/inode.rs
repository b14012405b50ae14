//! The inode table and the mapping of file block indices to block ids.

use alloc::format;
use alloc::vec::Vec;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::block::BlockStore;
use crate::config::*;
use crate::error::{FsError, Resource, Result};
use crate::structs::{BlockId, Inode, InodeId, Permissions};

/// Number of data blocks needed to hold `size` bytes.
pub fn data_blocks_for(size: usize) -> usize {
    size.div_ceil(BLOCK_SIZE)
}

/// Number of blocks a file of `size` bytes takes from the pool, indirect block included.
/// Fails when the file cannot be addressed by the direct and indirect pointers.
pub fn pool_blocks_for(size: usize) -> Result<usize> {
    let data_blocks = data_blocks_for(size);
    if data_blocks > MAX_FILE_BLOCKS {
        return Err(FsError::CapacityExceeded(Resource::FileSize));
    }
    if data_blocks > NUM_DIRECT_PTRS {
        Ok(data_blocks + NUM_INDIRECT_PTRS)
    } else {
        Ok(data_blocks)
    }
}

#[derive(Debug)]
pub struct InodeTable {
    inodes: Vec<Inode>,
    capacity: usize,
}

impl InodeTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            inodes: Vec::new(),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.inodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inodes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.inodes.len() >= self.capacity
    }

    /// Allocates an empty inode with one link. Ids follow creation order.
    pub fn alloc_inode(
        &mut self,
        permissions: Permissions,
        owner_uid: u32,
        group_gid: u32,
        created_at: DateTime<Utc>,
    ) -> Result<InodeId> {
        if self.is_full() {
            return Err(FsError::CapacityExceeded(Resource::Inodes));
        }
        let id = InodeId::from_raw(self.inodes.len() as u32);
        self.inodes.push(Inode {
            id,
            size: 0,
            blocks: 0,
            permissions,
            owner_uid,
            group_gid,
            links_cnt: 1,
            created_at,
            direct_ptrs: [None; NUM_DIRECT_PTRS],
            indirect_ptr: None,
        });
        debug!("allocated inode {}", id);
        Ok(id)
    }

    pub fn get_inode(&self, inode_id: InodeId) -> Result<&Inode> {
        self.inodes
            .get(inode_id.raw() as usize)
            .ok_or(FsError::InvalidInodeId(inode_id.raw()))
    }

    pub fn get_inode_mut(&mut self, inode_id: InodeId) -> Result<&mut Inode> {
        self.inodes
            .get_mut(inode_id.raw() as usize)
            .ok_or(FsError::InvalidInodeId(inode_id.raw()))
    }
}

/// Maps the `block_index`-th block of a file to its block id.
/// Indices below NUM_DIRECT_PTRS come from the inode, the rest from its indirect block.
pub fn bmap(blocks: &BlockStore, inode: &Inode, block_index: usize) -> Result<BlockId> {
    let unmapped = || FsError::NotFound(format!("block {} of inode {}", block_index, inode.id));

    // Direct blocks
    if block_index < NUM_DIRECT_PTRS {
        return inode.direct_ptrs[block_index].ok_or_else(unmapped);
    }

    // Indirect blocks
    let indirect_offset = block_index - NUM_DIRECT_PTRS;
    if indirect_offset >= PTRS_PER_BLOCK {
        return Err(FsError::CapacityExceeded(Resource::FileSize));
    }
    let indirect_block_id = inode.indirect_ptr.ok_or_else(unmapped)?;
    blocks
        .pointers(indirect_block_id)?
        .get(indirect_offset)
        .copied()
        .ok_or_else(unmapped)
}
