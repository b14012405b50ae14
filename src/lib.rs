//! simfs is an in-memory simulation of a Unix-like filesystem, built for teaching.
//! Nothing is persisted, and a single owner drives every operation.
//!
//! State owned by one `FileSystem`:
//! - Block store: fixed pool of BLOCK_SIZE blocks, data or pointer lists
//! - Inode table: size, permissions, owner, links, block layout
//! - Directory table: one flat list of name bindings
//! - Audit log: ring buffer of hashed operation records
//!
//! Layers (from bottom to top):
//! 1. Block: Allocation and transformed storage of block contents.
//! 2. Inode: File metadata and block index mapping (12 direct + 1 indirect).
//! 3. File: Laying payloads out over blocks and reading them back.
//! 4. Directory/Path: Name bindings, hard links and soft link resolution.
//! 5. Access/Audit: Permission checks and the tamper-evident log.
//! 6. FileSystem: The aggregate and the public operations.

extern crate alloc;

mod config;
mod error;
mod structs;
mod block;
mod inode;
mod file;
mod directory;
mod path;
mod access;
mod audit;
mod fs;

pub use config::*;
pub use structs::*;
pub use block::*;
pub use inode::*;
pub use file::*;
pub use directory::*;
pub use path::*;
pub use access::*;
pub use audit::*;
pub use fs::*;
pub use error::FsError as Error;
pub use error::{Resource, Result};
