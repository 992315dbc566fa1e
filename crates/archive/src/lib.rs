//! Content archive accessor.
//!
//! A content package at rest is a zip container with one manifest entry at a
//! well-known name, blob entries under `{Folder}/{Id}` (Folder one of
//! `Archives`, `Media`, `Scripts`, `Saves`), and free-form entries under
//! `Files/` mirrored verbatim into a server's working directory.
//!
//! The archive handle is opened once per sync job and owned exclusively by
//! it; dropping the handle releases it on every exit path.

mod checksum;
mod reader;
mod writer;

pub use checksum::{crc32_bytes, crc32_file};
pub use reader::ContentArchive;
pub use writer::ArchiveBuilder;

/// Well-known name of the manifest entry.
pub const MANIFEST_ENTRY: &str = "manifest.json";

/// Folder prefix for free-form server working-directory content.
pub const FILES_FOLDER: &str = "Files";

/// Errors produced by the archive crate.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive entry {0} is missing")]
    EntryMissing(String),

    #[error("container error: {0}")]
    Container(#[from] zip::result::ZipError),
}
