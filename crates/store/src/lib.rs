//! Entity model and persistence contracts for the LANshelf library.
//!
//! The sync engine consumes typed CRUD repositories (one per entity kind)
//! and a storage-location resolver through the traits defined here. A full
//! in-memory implementation backs the test suite and small deployments; a
//! relational backend can substitute its own [`Repository`] implementations
//! without touching the engine.

mod content;
mod entities;
mod locations;
mod repository;

pub use content::ContentStore;
pub use entities::{
    Action, ArchiveRecord, Collection, Company, CustomField, Engine, Entity, Game, Genre, Key,
    Media, MultiplayerMode, Platform, PlaySession, Redistributable, Save, SavePath, Script,
    Server, ServerConsole, ServerHttpPath, Tag,
};
pub use locations::{FixedRoots, StorageKind, StorageLocations};
pub use repository::{MemoryRepository, Repository};

/// Errors produced by repository implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record {0} already exists")]
    Duplicate(uuid::Uuid),

    #[error("record {0} not found")]
    NotFound(uuid::Uuid),

    #[error("backend error: {0}")]
    Backend(String),
}
