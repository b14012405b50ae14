use core::fmt;

/// The table or limit that ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Inodes,
    Blocks,
    DirectoryEntries,
    FileSize,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::Inodes => "inode table",
            Resource::Blocks => "block pool",
            Resource::DirectoryEntries => "directory table",
            Resource::FileSize => "direct + indirect block capacity",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FsError {
    #[error("Capacity exceeded: {0}")]
    CapacityExceeded(Resource),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: uid {uid} on {name}")]
    PermissionDenied { name: String, uid: u32 },

    #[error("Too many levels of soft links resolving {0}")]
    LinkCycle(String),

    #[error("Invalid file name")]
    InvalidFileName,

    #[error("Invalid permission string: {0:?}")]
    InvalidPermissions(String),

    #[error("Invalid inode id: {0}")]
    InvalidInodeId(u32),

    #[error("Invalid block id: {0}")]
    InvalidBlockId(u32),

    #[error("Block {0} does not hold file data")]
    NotDataBlock(u32),

    #[error("Block {0} does not hold block pointers")]
    NotPointerBlock(u32),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = core::result::Result<T, FsError>;
