//! Bundle of one repository per entity kind.

use std::sync::Arc;

use crate::entities::*;
use crate::repository::{MemoryRepository, Repository};

/// Every repository the sync engine needs, one per entity kind.
///
/// The engine only ever talks to the [`Repository`] trait; swap in your own
/// implementations to back the store with a real database.
#[derive(Clone)]
pub struct ContentStore {
    pub games: Arc<dyn Repository<Game>>,
    pub redistributables: Arc<dyn Repository<Redistributable>>,
    pub servers: Arc<dyn Repository<Server>>,

    pub actions: Arc<dyn Repository<Action>>,
    pub archives: Arc<dyn Repository<ArchiveRecord>>,
    pub media: Arc<dyn Repository<Media>>,
    pub scripts: Arc<dyn Repository<Script>>,
    pub keys: Arc<dyn Repository<Key>>,
    pub saves: Arc<dyn Repository<Save>>,
    pub save_paths: Arc<dyn Repository<SavePath>>,
    pub multiplayer_modes: Arc<dyn Repository<MultiplayerMode>>,
    pub play_sessions: Arc<dyn Repository<PlaySession>>,
    pub custom_fields: Arc<dyn Repository<CustomField>>,
    pub server_consoles: Arc<dyn Repository<ServerConsole>>,
    pub server_http_paths: Arc<dyn Repository<ServerHttpPath>>,

    pub companies: Arc<dyn Repository<Company>>,
    pub tags: Arc<dyn Repository<Tag>>,
    pub genres: Arc<dyn Repository<Genre>>,
    pub platforms: Arc<dyn Repository<Platform>>,
    pub engines: Arc<dyn Repository<Engine>>,
    pub collections: Arc<dyn Repository<Collection>>,
}

impl ContentStore {
    /// Builds a store backed entirely by in-memory repositories.
    pub fn in_memory() -> Self {
        Self {
            games: Arc::new(MemoryRepository::new()),
            redistributables: Arc::new(MemoryRepository::new()),
            servers: Arc::new(MemoryRepository::new()),
            actions: Arc::new(MemoryRepository::new()),
            archives: Arc::new(MemoryRepository::new()),
            media: Arc::new(MemoryRepository::new()),
            scripts: Arc::new(MemoryRepository::new()),
            keys: Arc::new(MemoryRepository::new()),
            saves: Arc::new(MemoryRepository::new()),
            save_paths: Arc::new(MemoryRepository::new()),
            multiplayer_modes: Arc::new(MemoryRepository::new()),
            play_sessions: Arc::new(MemoryRepository::new()),
            custom_fields: Arc::new(MemoryRepository::new()),
            server_consoles: Arc::new(MemoryRepository::new()),
            server_http_paths: Arc::new(MemoryRepository::new()),
            companies: Arc::new(MemoryRepository::new()),
            tags: Arc::new(MemoryRepository::new()),
            genres: Arc::new(MemoryRepository::new()),
            platforms: Arc::new(MemoryRepository::new()),
            engines: Arc::new(MemoryRepository::new()),
            collections: Arc::new(MemoryRepository::new()),
        }
    }
}
