//! Storage-location resolver: maps a logical blob category to a physical
//! root path. The launcher supplies its own resolver; [`FixedRoots`] covers
//! tests and single-directory deployments.

use std::path::{Path, PathBuf};

/// Logical category of stored blob data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKind {
    Archive,
    Media,
    Save,
}

/// Resolves where blob files of a given category live on disk.
pub trait StorageLocations: Send + Sync {
    fn root(&self, kind: StorageKind) -> PathBuf;
}

/// Resolver with all categories under one base directory.
#[derive(Debug, Clone)]
pub struct FixedRoots {
    base: PathBuf,
}

impl FixedRoots {
    pub fn new(base: &Path) -> Self {
        Self {
            base: base.to_path_buf(),
        }
    }
}

impl StorageLocations for FixedRoots {
    fn root(&self, kind: StorageKind) -> PathBuf {
        let dir = match kind {
            StorageKind::Archive => "Archives",
            StorageKind::Media => "Media",
            StorageKind::Save => "Saves",
        };
        self.base.join(dir)
    }
}
