use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::*;
use crate::Error;
use crate::Result;

/// Handle to a slot of the inode table.
/// Only the inode table hands these out; anything else must go through its bounds check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct InodeId(u32);

/// Handle to a slot of the block store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BlockId(u32);

impl InodeId {
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl BlockId {
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for InodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A block is either file data or the pointer list of an indirect block, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Data(Box<[u8; BLOCK_SIZE]>),
    Pointers(Vec<BlockId>),
}

impl Block {
    pub fn zeroed() -> Self {
        Block::Data(Box::new([0u8; BLOCK_SIZE]))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Read,
    Write,
    Execute,
}

impl Mode {
    /// Offset of this bit's character inside one `rwx` triplet.
    const fn offset(self) -> usize {
        match self {
            Mode::Read => 0,
            Mode::Write => 1,
            Mode::Execute => 2,
        }
    }
}

/// Who the requester is relative to an inode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Owner,
    Group,
    Other,
}

impl Role {
    /// Index of the first character of this role's triplet.
    const fn offset(self) -> usize {
        match self {
            Role::Owner => 0,
            Role::Group => 3,
            Role::Other => 6,
        }
    }
}

/// Owner/group/other permission bits, parsed from strings like `rw-r--r--`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub struct Permissions {
    bits: [bool; PERMISSIONS_LEN],
}

const PERMISSION_LETTERS: &[u8; 3] = b"rwx";

impl Permissions {
    /// Tests the character at `role offset + mode offset`, i.e. index 0/3/6 for reads.
    pub fn allows(&self, role: Role, mode: Mode) -> bool {
        self.bits[role.offset() + mode.offset()]
    }

    /// Unix-style octal rendering, e.g. `0o644`.
    pub fn octal(&self) -> u16 {
        self.bits
            .iter()
            .fold(0u16, |acc, &bit| (acc << 1) | bit as u16)
    }
}

impl FromStr for Permissions {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != PERMISSIONS_LEN {
            return Err(Error::InvalidPermissions(s.to_string()));
        }
        let mut bits = [false; PERMISSIONS_LEN];
        for (i, &c) in bytes.iter().enumerate() {
            bits[i] = match c {
                b'-' => false,
                c if c == PERMISSION_LETTERS[i % 3] => true,
                _ => return Err(Error::InvalidPermissions(s.to_string())),
            };
        }
        Ok(Self { bits })
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &set) in self.bits.iter().enumerate() {
            let c = if set { PERMISSION_LETTERS[i % 3] as char } else { '-' };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl From<Permissions> for String {
    fn from(perms: Permissions) -> Self {
        perms.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inode {
    pub id: InodeId,
    pub size: u64,            // Payload length in bytes
    pub blocks: u32,          // Data blocks in use, the indirect block not included
    pub permissions: Permissions,
    pub owner_uid: u32,
    pub group_gid: u32,
    pub links_cnt: u32,       // Directory entries bound to this inode
    pub created_at: DateTime<Utc>,
    pub direct_ptrs: [Option<BlockId>; NUM_DIRECT_PTRS],
    pub indirect_ptr: Option<BlockId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum EntryKind {
    /// Regular file or hard link.
    Inode(InodeId),
    /// Soft link holding the target's name, resolved at access time.
    SoftLink(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
}

impl DirEntry {
    pub fn new(inode_id: InodeId, name: &str) -> Result<Self> {
        validate_name(name)?;
        Ok(Self {
            name: name.to_string(),
            kind: EntryKind::Inode(inode_id),
        })
    }

    pub fn soft_link(name: &str, target: &str) -> Result<Self> {
        validate_name(name)?;
        validate_name(target)?;
        Ok(Self {
            name: name.to_string(),
            kind: EntryKind::SoftLink(target.to_string()),
        })
    }

    pub fn is_soft_link(&self) -> bool {
        matches!(self.kind, EntryKind::SoftLink(_))
    }

    pub fn name_eq(&self, name: &str) -> bool {
        self.name == name
    }
}

pub(crate) fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.len() > MAX_NAME_LEN || name.contains('\0') {
        return Err(Error::InvalidFileName);
    }
    Ok(())
}
