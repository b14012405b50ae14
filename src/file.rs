//! Moving file payloads in and out of blocks.

use tracing::debug;

use crate::block::BlockStore;
use crate::config::*;
use crate::error::{FsError, Resource, Result};
use crate::inode::{bmap, data_blocks_for, pool_blocks_for};
use crate::structs::Inode;

/// Lays `data` out over freshly allocated blocks and records them in `inode`.
/// The first NUM_DIRECT_PTRS blocks go to direct pointers; if more are needed,
/// one indirect block is allocated and the rest are listed in it.
/// Nothing is allocated unless the whole payload fits.
pub fn fwrite(blocks: &mut BlockStore, inode: &mut Inode, data: &[u8]) -> Result<usize> {
    let needed = pool_blocks_for(data.len())?;
    if needed > blocks.free_blocks() {
        return Err(FsError::CapacityExceeded(Resource::Blocks));
    }

    let num_blocks = data_blocks_for(data.len());
    debug!(
        "writing {} bytes to inode {} over {} data blocks",
        data.len(),
        inode.id,
        num_blocks
    );

    let mut chunks = data.chunks(BLOCK_SIZE);

    for (slot, chunk) in inode.direct_ptrs.iter_mut().zip(chunks.by_ref()) {
        let block_id = blocks.alloc_data_block()?;
        blocks.write_data(block_id, chunk)?;
        *slot = Some(block_id);
    }

    if num_blocks > NUM_DIRECT_PTRS {
        let indirect_block_id = blocks.alloc_pointer_block()?;
        inode.indirect_ptr = Some(indirect_block_id);
        for chunk in chunks {
            let block_id = blocks.alloc_data_block()?;
            blocks.write_data(block_id, chunk)?;
            blocks.push_pointer(indirect_block_id, block_id)?;
        }
    }

    inode.size = data.len() as u64;
    inode.blocks = num_blocks as u32;
    Ok(data.len())
}

/// Reads file bytes starting at `offset` into `buffer`.
/// Stops at the end of the file or of the buffer, whichever comes first.
/// Returns the number of bytes read.
pub fn fread(blocks: &BlockStore, inode: &Inode, offset: usize, buffer: &mut [u8]) -> Result<usize> {
    let size = inode.size as usize;
    if offset >= size {
        return Ok(0);
    }
    let to_read = buffer.len().min(size - offset);

    let mut bytes_read = 0;
    let mut current_offset = offset;

    while bytes_read < to_read {
        let block_index = current_offset / BLOCK_SIZE;
        let start_offset = current_offset % BLOCK_SIZE;
        let bytes_in_block = (BLOCK_SIZE - start_offset).min(to_read - bytes_read);

        let block_id = bmap(blocks, inode, block_index)?;
        let mut block_buf = [0u8; BLOCK_SIZE];
        blocks.read_data(block_id, &mut block_buf[..start_offset + bytes_in_block])?;
        buffer[bytes_read..bytes_read + bytes_in_block]
            .copy_from_slice(&block_buf[start_offset..start_offset + bytes_in_block]);

        bytes_read += bytes_in_block;
        current_offset += bytes_in_block;
    }

    Ok(bytes_read)
}
