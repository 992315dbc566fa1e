//! Persisted entity shapes.
//!
//! Child entities reference their parent unit through nullable foreign-key
//! fields; a record belongs to exactly one parent. Shared reference entities
//! (company, tag, genre, platform, engine, collection) are identified by
//! name and carry membership collections of unit ids instead.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use lanshelf_manifest::{
    KeyAllocationMethod, MediaKind, MultiplayerKind, SavePathKind, ScriptKind, ServerConsoleKind,
};

/// Anything storable in a [`Repository`](crate::Repository).
pub trait Entity: Clone + Send + Sync + 'static {
    /// Stable identifier, preserved across import/export round trips.
    fn id(&self) -> Uuid;
}

macro_rules! impl_entity {
    ($($ty:ty),+ $(,)?) => {
        $(impl Entity for $ty {
            fn id(&self) -> Uuid {
                self.id
            }
        })+
    };
}

// ---------------------------------------------------------------------------
// Content units
// ---------------------------------------------------------------------------

/// A game in the library.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Game {
    pub id: Uuid,
    pub title: String,
    pub sort_title: String,
    pub directory_name: String,
    pub description: String,
    pub notes: String,
    pub released_on: Option<DateTime<Utc>>,
    pub singleplayer: bool,
}

/// A redistributable dependency (runtime, driver).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Redistributable {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub notes: String,
}

/// A dedicated server installation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Server {
    pub id: Uuid,
    pub name: String,
    pub arguments: String,
    pub working_directory: String,
    pub autostart: bool,
    pub autostart_delay: i32,
}

// ---------------------------------------------------------------------------
// Child records
// ---------------------------------------------------------------------------

/// A launchable action. Owned by a game or a server.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Action {
    pub id: Uuid,
    pub game_id: Option<Uuid>,
    pub server_id: Option<Uuid>,
    pub name: String,
    pub arguments: String,
    pub path: String,
    pub working_directory: String,
    pub primary_action: bool,
    pub sort_order: i32,
}

/// An installer payload version. Owned by a game or a redistributable.
///
/// The payload bytes live at `{archive root}/{object_key}`; a fresh
/// `object_key` is assigned whenever the payload is (re)written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArchiveRecord {
    pub id: Uuid,
    pub game_id: Option<Uuid>,
    pub redistributable_id: Option<Uuid>,
    pub version: String,
    pub changelog: String,
    pub object_key: String,
    pub compressed_size: i64,
    pub created_on: Option<DateTime<Utc>>,
}

/// Artwork or documentation. Owned by a game.
///
/// The file lives at `{media root}/{file_id}`; `crc32` is computed from the
/// stored bytes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Media {
    pub id: Uuid,
    pub game_id: Uuid,
    pub file_id: Uuid,
    pub kind: MediaKind,
    pub source_url: String,
    pub mime_type: String,
    pub crc32: String,
    pub created_on: Option<DateTime<Utc>>,
}

/// An automation script. The script text lives on the entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    pub id: Uuid,
    pub game_id: Option<Uuid>,
    pub redistributable_id: Option<Uuid>,
    pub server_id: Option<Uuid>,
    pub kind: ScriptKind,
    pub name: String,
    pub description: String,
    pub requires_admin: bool,
    pub contents: String,
    pub created_on: Option<DateTime<Utc>>,
}

/// A product key. Owned by a game.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Key {
    pub id: Uuid,
    pub game_id: Uuid,
    pub value: String,
    pub allocation_method: KeyAllocationMethod,
    pub claimed_by_mac_address: String,
    pub claimed_by_ipv4_address: String,
    pub claimed_by_computer_name: String,
    pub claimed_on: Option<DateTime<Utc>>,
}

/// A captured save snapshot. Owned by a game; blob at
/// `{save root}/{game_id}/{id}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Save {
    pub id: Uuid,
    pub game_id: Uuid,
    pub user_name: String,
    pub size: i64,
    pub created_on: Option<DateTime<Utc>>,
}

/// A watched save location. Owned by a game.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SavePath {
    pub id: Uuid,
    pub game_id: Uuid,
    pub kind: SavePathKind,
    pub path: String,
    pub working_directory: String,
    pub regex: bool,
}

/// A supported multiplayer mode. Owned by a game.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiplayerMode {
    pub id: Uuid,
    pub game_id: Uuid,
    pub kind: MultiplayerKind,
    pub min_players: i32,
    pub max_players: i32,
    pub spectators: i32,
    pub description: String,
    pub network_protocol: String,
}

/// A recorded play session. Owned by a game.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaySession {
    pub id: Uuid,
    pub game_id: Uuid,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// A free-form name/value pair. Owned by a game.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomField {
    pub id: Uuid,
    pub game_id: Uuid,
    pub name: String,
    pub value: String,
}

/// A console endpoint. Owned by a server.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerConsole {
    pub id: Uuid,
    pub server_id: Uuid,
    pub name: String,
    pub kind: ServerConsoleKind,
    pub path: String,
    pub host: String,
    pub port: u16,
}

/// A directory a server exposes over HTTP. Owned by a server.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerHttpPath {
    pub id: Uuid,
    pub server_id: Uuid,
    pub local_path: String,
    pub path: String,
}

// ---------------------------------------------------------------------------
// Shared reference data (name-identified, at most one row per name)
// ---------------------------------------------------------------------------

/// A developer/publisher. Games reference it from both roles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub developed_game_ids: Vec<Uuid>,
    pub published_game_ids: Vec<Uuid>,
}

/// A descriptive tag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub game_ids: Vec<Uuid>,
}

/// A genre.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Genre {
    pub id: Uuid,
    pub name: String,
    pub game_ids: Vec<Uuid>,
}

/// A platform a game runs on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Platform {
    pub id: Uuid,
    pub name: String,
    pub game_ids: Vec<Uuid>,
}

/// A game engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Engine {
    pub id: Uuid,
    pub name: String,
    pub game_ids: Vec<Uuid>,
}

/// A curated collection of games.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    pub id: Uuid,
    pub name: String,
    pub game_ids: Vec<Uuid>,
}

impl_entity!(
    Game,
    Redistributable,
    Server,
    Action,
    ArchiveRecord,
    Media,
    Script,
    Key,
    Save,
    SavePath,
    MultiplayerMode,
    PlaySession,
    CustomField,
    ServerConsole,
    ServerHttpPath,
    Company,
    Tag,
    Genre,
    Platform,
    Engine,
    Collection,
);
