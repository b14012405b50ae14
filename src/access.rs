//! Permission checks. Nothing here mutates state.

use crate::structs::{Inode, Mode, Role};

/// The requester's role: owner if the uid matches, else group if the gid matches, else other.
pub fn role_of(inode: &Inode, uid: u32, gid: Option<u32>) -> Role {
    if uid == inode.owner_uid {
        Role::Owner
    } else if gid == Some(inode.group_gid) {
        Role::Group
    } else {
        Role::Other
    }
}

/// Read access tests exactly one bit: owner, group or other read, by role.
pub fn can_read(inode: &Inode, uid: u32, gid: u32) -> bool {
    let role = role_of(inode, uid, Some(gid));
    inode.permissions.allows(role, Mode::Read)
}

/// Hard links need the owner, or an inode granting write to others.
/// Link requests carry no gid, so a non-owner is always judged as other.
pub fn can_link(inode: &Inode, uid: u32) -> bool {
    match role_of(inode, uid, None) {
        Role::Owner => true,
        role => inode.permissions.allows(role, Mode::Write),
    }
}
