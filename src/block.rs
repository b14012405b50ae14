//! The block pool.
//! Blocks are handed out with monotonically increasing ids and never freed.
//! File data is stored XOR-ed with a fixed key; this hides nothing from anyone who knows the key.

use alloc::vec::Vec;

use tracing::debug;

use crate::config::*;
use crate::error::{FsError, Resource, Result};
use crate::structs::{Block, BlockId};

/// Applies the storage transform to one byte. Applying it twice yields the input.
#[inline]
pub const fn transform(byte: u8) -> u8 {
    byte ^ XOR_KEY
}

#[derive(Debug)]
pub struct BlockStore {
    blocks: Vec<Block>,
    capacity: usize,
}

impl BlockStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            blocks: Vec::new(),
            capacity,
        }
    }

    /// Number of blocks handed out so far.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn free_blocks(&self) -> usize {
        self.capacity - self.blocks.len()
    }

    pub fn is_full(&self) -> bool {
        self.blocks.len() >= self.capacity
    }

    fn push(&mut self, block: Block) -> Result<BlockId> {
        if self.is_full() {
            return Err(FsError::CapacityExceeded(Resource::Blocks));
        }
        let block_id = BlockId::from_raw(self.blocks.len() as u32);
        self.blocks.push(block);
        Ok(block_id)
    }

    /// Allocates a zeroed data block.
    pub fn alloc_data_block(&mut self) -> Result<BlockId> {
        let block_id = self.push(Block::zeroed())?;
        debug!("allocated data block {}", block_id);
        Ok(block_id)
    }

    /// Allocates an empty indirect block.
    pub fn alloc_pointer_block(&mut self) -> Result<BlockId> {
        let block_id = self.push(Block::Pointers(Vec::with_capacity(PTRS_PER_BLOCK)))?;
        debug!("allocated indirect block {}", block_id);
        Ok(block_id)
    }

    pub fn get(&self, block_id: BlockId) -> Result<&Block> {
        self.blocks
            .get(block_id.raw() as usize)
            .ok_or(FsError::InvalidBlockId(block_id.raw()))
    }

    fn get_mut(&mut self, block_id: BlockId) -> Result<&mut Block> {
        self.blocks
            .get_mut(block_id.raw() as usize)
            .ok_or(FsError::InvalidBlockId(block_id.raw()))
    }

    /// Writes `buf` into a data block starting at byte 0, applying the transform.
    /// `buf.len()` must not exceed BLOCK_SIZE.
    pub fn write_data(&mut self, block_id: BlockId, buf: &[u8]) -> Result<()> {
        if buf.len() > BLOCK_SIZE {
            return Err(FsError::CapacityExceeded(Resource::FileSize));
        }
        match self.get_mut(block_id)? {
            Block::Data(data) => {
                for (dst, &src) in data.iter_mut().zip(buf) {
                    *dst = transform(src);
                }
                Ok(())
            }
            Block::Pointers(_) => Err(FsError::NotDataBlock(block_id.raw())),
        }
    }

    /// Reads `buf.len()` bytes from the start of a data block, reversing the transform.
    pub fn read_data(&self, block_id: BlockId, buf: &mut [u8]) -> Result<()> {
        if buf.len() > BLOCK_SIZE {
            return Err(FsError::CapacityExceeded(Resource::FileSize));
        }
        match self.get(block_id)? {
            Block::Data(data) => {
                for (dst, &src) in buf.iter_mut().zip(data.iter()) {
                    *dst = transform(src);
                }
                Ok(())
            }
            Block::Pointers(_) => Err(FsError::NotDataBlock(block_id.raw())),
        }
    }

    /// Raw stored bytes of a data block, transform not reversed.
    pub fn raw_data(&self, block_id: BlockId) -> Result<&[u8; BLOCK_SIZE]> {
        match self.get(block_id)? {
            Block::Data(data) => Ok(&**data),
            Block::Pointers(_) => Err(FsError::NotDataBlock(block_id.raw())),
        }
    }

    pub fn pointers(&self, block_id: BlockId) -> Result<&[BlockId]> {
        match self.get(block_id)? {
            Block::Pointers(ptrs) => Ok(ptrs.as_slice()),
            Block::Data(_) => Err(FsError::NotPointerBlock(block_id.raw())),
        }
    }

    /// Appends a pointer to an indirect block.
    pub fn push_pointer(&mut self, block_id: BlockId, target: BlockId) -> Result<()> {
        match self.get_mut(block_id)? {
            Block::Pointers(ptrs) => {
                if ptrs.len() >= PTRS_PER_BLOCK {
                    return Err(FsError::CapacityExceeded(Resource::FileSize));
                }
                ptrs.push(target);
                Ok(())
            }
            Block::Data(_) => Err(FsError::NotPointerBlock(block_id.raw())),
        }
    }
}
