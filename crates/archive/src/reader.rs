use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::{ArchiveError, MANIFEST_ENTRY};

/// Read-side handle to a content package.
///
/// Opened once per import job; the job owns it exclusively for its lifetime.
pub struct ContentArchive {
    inner: ZipArchive<File>,
    path: PathBuf,
}

impl ContentArchive {
    /// Opens the container at `path`.
    pub fn open(path: &Path) -> Result<Self, ArchiveError> {
        let file = File::open(path)?;
        let inner = ZipArchive::new(file)?;
        Ok(Self {
            inner,
            path: path.to_path_buf(),
        })
    }

    /// Path of the underlying container file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the manifest entry.
    pub fn manifest_bytes(&mut self) -> Result<Vec<u8>, ArchiveError> {
        self.read_entry(MANIFEST_ENTRY)
    }

    /// Whether a named entry exists.
    pub fn has_entry(&self, entry: &str) -> bool {
        self.inner.index_for_name(entry).is_some()
    }

    /// Uncompressed size of a named entry, if present.
    pub fn entry_size(&mut self, entry: &str) -> Option<u64> {
        self.inner.by_name(entry).ok().map(|f| f.size())
    }

    /// Reads a named entry fully into memory.
    pub fn read_entry(&mut self, entry: &str) -> Result<Vec<u8>, ArchiveError> {
        let mut file = self
            .inner
            .by_name(entry)
            .map_err(|e| missing_or_container(entry, e))?;
        let mut buf = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut buf)?;
        Ok(buf)
    }

    /// Extracts a named entry to `dest`, overwriting any existing file.
    ///
    /// The entry is streamed to a sibling `.part` file and renamed into
    /// place once fully written, so an interrupted extraction never leaves a
    /// partial file at `dest`. Parent directories are created as needed.
    /// Returns the number of bytes written.
    pub fn extract_entry(&mut self, entry: &str, dest: &Path) -> Result<u64, ArchiveError> {
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut source = self
            .inner
            .by_name(entry)
            .map_err(|e| missing_or_container(entry, e))?;
        let part = part_path(dest);

        let written = (|| -> Result<u64, ArchiveError> {
            let mut out = File::create(&part)?;
            let written = std::io::copy(&mut source, &mut out)?;
            out.sync_all()?;
            Ok(written)
        })();

        match written {
            Ok(n) => {
                std::fs::rename(&part, dest)?;
                debug!(entry, dest = %dest.display(), bytes = n, "extracted archive entry");
                Ok(n)
            }
            Err(e) => {
                let _ = std::fs::remove_file(&part);
                Err(e)
            }
        }
    }

    /// Names of all entries below `prefix` (files only, no directory rows).
    pub fn entries_under(&self, prefix: &str) -> Vec<String> {
        let prefix = format!("{}/", prefix.trim_end_matches('/'));
        self.inner
            .file_names()
            .filter(|name| name.starts_with(&prefix) && !name.ends_with('/'))
            .map(str::to_owned)
            .collect()
    }

}

fn missing_or_container(entry: &str, e: ZipError) -> ArchiveError {
    match e {
        ZipError::FileNotFound => ArchiveError::EntryMissing(entry.to_owned()),
        other => ArchiveError::Container(other),
    }
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}
