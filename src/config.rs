use serde::{Deserialize, Serialize};

use crate::error::{FsError, Result};

pub const BLOCK_SIZE: usize = 4096;
pub const MAX_BLOCKS: usize = 1024; // Size of the block pool
pub const MAX_INODES: usize = 128; // Size of the inode table
pub const MAX_DIR_ENTRIES: usize = MAX_INODES; // One flat directory, sized like the inode table
pub const MAX_LOGS: usize = 100; // Physical slots in the audit ring buffer
pub const MAX_NAME_LEN: usize = 255;

pub const NUM_DIRECT_PTRS: usize = 12; // Number of direct pointers in an inode
pub const NUM_INDIRECT_PTRS: usize = 1; // Number of indirect pointers in an inode
pub const PTRS_PER_BLOCK: usize = BLOCK_SIZE / 4; // Number of pointers per block (32-bit block ids)
pub const MAX_FILE_BLOCKS: usize = NUM_DIRECT_PTRS + NUM_INDIRECT_PTRS * PTRS_PER_BLOCK;

pub const XOR_KEY: u8 = 0x55; // Byte-wise obfuscation applied to stored data
pub const PERMISSIONS_LEN: usize = 9;
pub const MAX_LINK_DEPTH: usize = 40; // Soft link hops before giving up

/// Capacities of one filesystem instance.
/// Block size is fixed at compile time, everything else can be shrunk for experiments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FsConfig {
    pub max_blocks: usize,
    pub max_inodes: usize,
    pub max_dir_entries: usize,
    pub max_logs: usize,
    pub max_link_depth: usize,
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            max_blocks: MAX_BLOCKS,
            max_inodes: MAX_INODES,
            max_dir_entries: MAX_DIR_ENTRIES,
            max_logs: MAX_LOGS,
            max_link_depth: MAX_LINK_DEPTH,
        }
    }
}

impl FsConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: FsConfig = serde_json::from_str(json)
            .map_err(|e| FsError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("max_blocks", self.max_blocks),
            ("max_inodes", self.max_inodes),
            ("max_dir_entries", self.max_dir_entries),
            ("max_logs", self.max_logs),
            ("max_link_depth", self.max_link_depth),
        ];
        for (field, value) in fields {
            if value == 0 {
                return Err(FsError::InvalidConfig(format!("{} must be non-zero", field)));
            }
        }
        // Block ids are stored as u32 inside pointer blocks.
        if self.max_blocks > u32::MAX as usize || self.max_inodes > u32::MAX as usize {
            return Err(FsError::InvalidConfig("capacity exceeds 32-bit identifier range".to_string()));
        }
        Ok(())
    }
}
