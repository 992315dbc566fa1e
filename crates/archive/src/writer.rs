use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::{ArchiveError, MANIFEST_ENTRY};

/// Write-side handle used by export jobs to assemble a content package.
///
/// Entries are written as they are produced; the manifest entry is written
/// last via [`ArchiveBuilder::finish`], which consumes the builder.
pub struct ArchiveBuilder {
    writer: ZipWriter<File>,
    path: PathBuf,
}

impl ArchiveBuilder {
    /// Creates a new container at `path`, truncating any existing file.
    pub fn create(path: &Path) -> Result<Self, ArchiveError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        Ok(Self {
            writer: ZipWriter::new(file),
            path: path.to_path_buf(),
        })
    }

    /// Path of the container file being written.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Adds an entry from an in-memory buffer.
    pub fn add_entry(&mut self, name: &str, data: &[u8]) -> Result<(), ArchiveError> {
        self.writer.start_file(name, SimpleFileOptions::default())?;
        self.writer.write_all(data)?;
        Ok(())
    }

    /// Adds an entry streamed from a file on disk. Returns the bytes copied.
    ///
    /// The source is opened before the entry is started, so a missing source
    /// file leaves the container untouched.
    pub fn add_file(&mut self, name: &str, source: &Path) -> Result<u64, ArchiveError> {
        let mut file = File::open(source)?;
        self.writer.start_file(name, SimpleFileOptions::default())?;
        let copied = std::io::copy(&mut file, &mut self.writer)?;
        debug!(name, source = %source.display(), bytes = copied, "packed archive entry");
        Ok(copied)
    }

    /// Recursively adds every file under `dir` as `{prefix}/{relative path}`,
    /// using forward slashes. Returns the number of files added.
    pub fn add_dir_tree(&mut self, prefix: &str, dir: &Path) -> Result<usize, ArchiveError> {
        let prefix = prefix.trim_end_matches('/');
        let mut count = 0;
        let mut pending = vec![dir.to_path_buf()];
        while let Some(current) = pending.pop() {
            for entry in std::fs::read_dir(&current)? {
                let entry = entry?;
                let path = entry.path();
                if entry.file_type()?.is_dir() {
                    pending.push(path);
                    continue;
                }
                let relative = path
                    .strip_prefix(dir)
                    .map_err(|_| std::io::Error::other("path escaped source directory"))?;
                let name = format!(
                    "{prefix}/{}",
                    relative.to_string_lossy().replace('\\', "/")
                );
                self.add_file(&name, &path)?;
                count += 1;
            }
        }
        Ok(count)
    }

    /// Writes the manifest entry and closes the container.
    pub fn finish(mut self, manifest: &[u8]) -> Result<(), ArchiveError> {
        self.add_entry(MANIFEST_ENTRY, manifest)?;
        self.writer.finish()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ContentArchive;

    #[test]
    fn builder_roundtrips_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pkg.zip");

        let mut builder = ArchiveBuilder::create(&path).unwrap();
        builder.add_entry("Archives/a1", b"payload").unwrap();
        builder.finish(b"{}").unwrap();

        let mut archive = ContentArchive::open(&path).unwrap();
        assert_eq!(archive.read_entry("Archives/a1").unwrap(), b"payload");
        assert_eq!(archive.manifest_bytes().unwrap(), b"{}");
    }

    #[test]
    fn add_file_streams_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("blob.bin");
        std::fs::write(&source, b"0123456789").unwrap();

        let path = dir.path().join("pkg.zip");
        let mut builder = ArchiveBuilder::create(&path).unwrap();
        let copied = builder.add_file("Saves/s1", &source).unwrap();
        assert_eq!(copied, 10);
        builder.finish(b"{}").unwrap();

        let mut archive = ContentArchive::open(&path).unwrap();
        assert_eq!(archive.read_entry("Saves/s1").unwrap(), b"0123456789");
    }

    #[test]
    fn add_dir_tree_mirrors_layout() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("workdir");
        std::fs::create_dir_all(root.join("maps")).unwrap();
        std::fs::write(root.join("server.cfg"), b"cfg").unwrap();
        std::fs::write(root.join("maps/de_dust.bsp"), b"map").unwrap();

        let path = dir.path().join("pkg.zip");
        let mut builder = ArchiveBuilder::create(&path).unwrap();
        let count = builder.add_dir_tree("Files", &root).unwrap();
        assert_eq!(count, 2);
        builder.finish(b"{}").unwrap();

        let mut archive = ContentArchive::open(&path).unwrap();
        assert_eq!(archive.read_entry("Files/server.cfg").unwrap(), b"cfg");
        assert_eq!(archive.read_entry("Files/maps/de_dust.bsp").unwrap(), b"map");
    }

    #[test]
    fn create_makes_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/dir/pkg.zip");
        let builder = ArchiveBuilder::create(&path).unwrap();
        builder.finish(b"{}").unwrap();
        assert!(path.exists());
    }
}
