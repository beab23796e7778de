//! # File System Operations Module / 文件系统操作模块
//!
//! This module opens the files recorders write to. Paths may start with `~`
//! and may name a pre-existing FIFO for streaming consumers.
//!
//! 此模块打开记录器写入的文件。路径可以以 `~` 开头，
//! 也可以指向一个已存在的 FIFO，供流式消费者读取。

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Expands a leading `~` in a user-supplied path.
///
/// # Arguments
/// * `path` - The path as given on the command line or in a configuration file
///
/// # Returns
/// The expanded path
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Opens an output file for writing, truncating any previous content.
///
/// Missing parent directories are created first. An existing named pipe is
/// opened as-is, so a reader on the other end receives the output as it is
/// written.
///
/// # Arguments
/// * `path` - Path of the output file, `~` already expanded
///
/// # Returns
/// The opened file, or the I/O error that prevented opening it
pub fn open_output_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}
