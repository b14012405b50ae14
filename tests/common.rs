//! Common utilities for tests

use std::sync::Once;

use simfs::{FileSystem, FsConfig};

pub const ORANGE: &str = "\x1b[38;5;214m";
pub const RESET: &str = "\x1b[0m";

/// Provides a macro for logging messages during tests.
/// e.g. log!("placeholder") -> println!("[test] placeholder");
#[macro_export]
macro_rules! log {
    ($msg:expr) => {
        println!("{}[test] {}{}", crate::common::ORANGE, $msg, crate::common::RESET)
    };
    ($msg:expr, $($arg:tt)*) => {
        println!("{}[test] {}{}", crate::common::ORANGE, format!($msg, $($arg)*), crate::common::RESET)
    };
}

static TRACING: Once = Once::new();

/// Routes the crate's tracing output to the test harness.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

pub fn new_fs() -> FileSystem {
    init_tracing();
    FileSystem::new()
}

pub fn small_fs(max_blocks: usize, max_inodes: usize, max_dir_entries: usize) -> FileSystem {
    init_tracing();
    FileSystem::with_config(FsConfig {
        max_blocks,
        max_inodes,
        max_dir_entries,
        ..FsConfig::default()
    })
    .unwrap()
}
