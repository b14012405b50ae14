//! Name resolution through soft links.

use alloc::string::String;

use tracing::{debug, warn};

use crate::directory::DirectoryTable;
use crate::error::{FsError, Result};
use crate::structs::{EntryKind, InodeId};

/// Resolves `name` to an inode id, following soft links by target name.
/// More than `max_depth` hops is reported as a cycle.
pub fn resolve(dir: &DirectoryTable, name: &str, max_depth: usize) -> Result<InodeId> {
    let mut current: &str = name;

    for hops in 0..=max_depth {
        let entry = dir
            .dir_lookup(current)
            .ok_or_else(|| FsError::NotFound(String::from(current)))?;
        match &entry.kind {
            EntryKind::Inode(inode_id) => {
                debug!("resolved {} to inode {} after {} hops", name, inode_id, hops);
                return Ok(*inode_id);
            }
            EntryKind::SoftLink(target) => current = target.as_str(),
        }
    }

    warn!("soft link cycle while resolving {}", name);
    Err(FsError::LinkCycle(String::from(name)))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::structs::DirEntry;

    fn dir_with(entries: &[DirEntry]) -> DirectoryTable {
        let mut dir = DirectoryTable::new(16);
        for entry in entries {
            dir.dir_add_entry(entry.clone()).unwrap();
        }
        dir
    }

    #[test]
    fn test_resolve_chain() {
        let dir = dir_with(&[
            DirEntry::new(InodeId::from_raw(3), "a").unwrap(),
            DirEntry::soft_link("b", "a").unwrap(),
            DirEntry::soft_link("c", "b").unwrap(),
        ]);
        assert_eq!(resolve(&dir, "a", 8).unwrap(), InodeId::from_raw(3));
        assert_eq!(resolve(&dir, "c", 8).unwrap(), InodeId::from_raw(3));
        // Two hops needed, only one allowed.
        assert_eq!(resolve(&dir, "c", 1), Err(FsError::LinkCycle("c".into())));
    }

    #[test]
    fn test_resolve_cycle_and_dangling() {
        let dir = dir_with(&[
            DirEntry::soft_link("x", "y").unwrap(),
            DirEntry::soft_link("y", "x").unwrap(),
            DirEntry::soft_link("self", "self").unwrap(),
            DirEntry::soft_link("dangling", "missing").unwrap(),
        ]);
        assert_eq!(resolve(&dir, "x", 40), Err(FsError::LinkCycle("x".into())));
        assert_eq!(resolve(&dir, "self", 40), Err(FsError::LinkCycle("self".into())));
        assert_eq!(resolve(&dir, "dangling", 40), Err(FsError::NotFound("missing".into())));
        assert_eq!(resolve(&dir, "nope", 40), Err(FsError::NotFound("nope".into())));
    }
}
