#![allow(unused)]

mod common;

use common::{new_fs, small_fs};
use simfs::EntryKind;
use simfs::Error;
use simfs::Resource;

#[test]
fn test_hard_link_shares_inode() {
    let mut fs = new_fs();
    let inode_id = fs.create_file("a.txt", "rw-r--r--", 1000, 100, b"shared").unwrap();
    let before = fs.stat("a.txt").unwrap().links_cnt;

    fs.create_hard_link("a.txt", "b.txt", 1000).unwrap();

    assert_eq!(fs.lookup("b.txt").unwrap(), inode_id);
    assert_eq!(fs.stat("a.txt").unwrap().links_cnt, before + 1);
    assert_eq!(fs.stat("b.txt").unwrap(), fs.stat("a.txt").unwrap());
    assert_eq!(fs.read_file("b.txt", 1000, 100, 64).unwrap(), b"shared");
    assert_eq!(fs.read_file("a.txt", 1000, 100, 64).unwrap(), b"shared");
    // No blocks or inodes were allocated for the link.
    assert_eq!(fs.usage().inodes_used, 1);
    assert_eq!(fs.usage().blocks_used, 1);
}

#[test]
fn test_hard_link_permissions() {
    let mut fs = new_fs();
    fs.create_file("private.txt", "rw-rw-r--", 1000, 100, b"p").unwrap();
    fs.create_file("open.txt", "rw-rw-rw-", 1000, 100, b"o").unwrap();

    assert_eq!(
        fs.create_hard_link("private.txt", "stolen.txt", 2000),
        Err(Error::PermissionDenied { name: "private.txt".into(), uid: 2000 })
    );
    assert!(fs.lookup("stolen.txt").is_err());
    assert_eq!(fs.stat("private.txt").unwrap().links_cnt, 1);

    fs.create_hard_link("open.txt", "mine.txt", 2000).unwrap();
    assert_eq!(fs.stat("open.txt").unwrap().links_cnt, 2);

    // Owners may link regardless of the mode bits.
    fs.create_file("locked.txt", "---------", 1000, 100, b"l").unwrap();
    fs.create_hard_link("locked.txt", "locked2.txt", 1000).unwrap();
}

#[test]
fn test_hard_link_to_missing_file() {
    let mut fs = new_fs();
    assert_eq!(
        fs.create_hard_link("ghost.txt", "b.txt", 0),
        Err(Error::NotFound("ghost.txt".into()))
    );
    assert!(fs.read_dir().is_empty());
    assert_eq!(fs.usage().logs_written, 0);
}

#[test]
fn test_hard_link_through_soft_link() {
    let mut fs = new_fs();
    let inode_id = fs.create_file("a.txt", "rw-r--r--", 1000, 100, b"x").unwrap();
    fs.create_soft_link("a.txt", "s.txt", 1000).unwrap();
    fs.create_hard_link("s.txt", "h.txt", 1000).unwrap();

    assert_eq!(fs.lookup("h.txt").unwrap(), inode_id);
    assert_eq!(fs.stat("a.txt").unwrap().links_cnt, 2);
}

#[test]
fn test_soft_link_reads_target() {
    let mut fs = new_fs();
    fs.create_file("a.txt", "rw-r--r--", 1000, 100, b"soft content").unwrap();
    fs.create_soft_link("a.txt", "b.txt", 1000).unwrap();

    assert_eq!(
        fs.read_file("b.txt", 1000, 100, 64).unwrap(),
        fs.read_file("a.txt", 1000, 100, 64).unwrap()
    );
    // Soft links do not count as links of the target.
    assert_eq!(fs.stat("a.txt").unwrap().links_cnt, 1);

    let entry = &fs.read_dir()[1];
    assert!(entry.is_soft_link());
    assert_eq!(entry.kind, EntryKind::SoftLink("a.txt".into()));
}

#[test]
fn test_soft_link_permissions_follow_target() {
    let mut fs = new_fs();
    fs.create_file("secret.txt", "rw-------", 1000, 100, b"s").unwrap();
    fs.create_soft_link("secret.txt", "alias.txt", 2000).unwrap();
    assert!(matches!(
        fs.read_file("alias.txt", 2000, 200, 8),
        Err(Error::PermissionDenied { .. })
    ));
}

#[test]
fn test_dangling_soft_link() {
    let mut fs = new_fs();
    fs.create_soft_link("later.txt", "early.txt", 1000).unwrap();
    assert_eq!(
        fs.read_file("early.txt", 1000, 100, 8),
        Err(Error::NotFound("later.txt".into()))
    );

    // Resolution is deferred, so creating the target fixes the link.
    fs.create_file("later.txt", "rw-r--r--", 1000, 100, b"now here").unwrap();
    assert_eq!(fs.read_file("early.txt", 1000, 100, 64).unwrap(), b"now here");
}

#[test]
fn test_soft_link_cycle() {
    let mut fs = new_fs();
    fs.create_soft_link("b", "a", 1).unwrap();
    fs.create_soft_link("a", "b", 1).unwrap();
    fs.create_soft_link("loop", "loop", 1).unwrap();

    assert_eq!(fs.read_file("a", 1, 1, 8), Err(Error::LinkCycle("a".into())));
    assert_eq!(fs.read_file("loop", 1, 1, 8), Err(Error::LinkCycle("loop".into())));
    assert!(matches!(fs.create_hard_link("a", "c", 1), Err(Error::LinkCycle(_))));
}

#[test]
fn test_long_soft_link_chain_within_limit() {
    let mut fs = new_fs();
    fs.create_file("l0", "rw-r--r--", 1, 1, b"end").unwrap();
    let depth = fs.config().max_link_depth;
    for i in 1..=depth {
        fs.create_soft_link(&format!("l{}", i - 1), &format!("l{}", i), 1).unwrap();
    }
    assert_eq!(fs.read_file(&format!("l{}", depth), 1, 1, 8).unwrap(), b"end");

    fs.create_soft_link(&format!("l{}", depth), "too_far", 1).unwrap();
    assert!(matches!(fs.read_file("too_far", 1, 1, 8), Err(Error::LinkCycle(_))));
}

#[test]
fn test_soft_link_log_has_no_inode() {
    let mut fs = new_fs();
    fs.create_soft_link("a.txt", "b.txt", 42).unwrap();
    let entry = fs.audit_log().slot(0).unwrap();
    assert_eq!(entry.inode_id, None);
    assert_eq!(entry.description, "Created soft link b.txt to a.txt by UID 42");
    assert!(entry.verify());
}

#[test]
fn test_links_need_directory_space() {
    let mut fs = small_fs(8, 8, 2);
    fs.create_file("a.txt", "rw-r--r--", 1, 1, b"a").unwrap();
    fs.create_hard_link("a.txt", "b.txt", 1).unwrap();

    assert_eq!(
        fs.create_hard_link("a.txt", "c.txt", 1),
        Err(Error::CapacityExceeded(Resource::DirectoryEntries))
    );
    assert_eq!(
        fs.create_soft_link("a.txt", "d.txt", 1),
        Err(Error::CapacityExceeded(Resource::DirectoryEntries))
    );
    assert_eq!(fs.stat("a.txt").unwrap().links_cnt, 2);
    assert_eq!(fs.usage().logs_written, 2);
}
