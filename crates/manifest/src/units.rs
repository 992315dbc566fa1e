//! Top-level content unit manifests and structural classification.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::records::{
    ActionManifest, ArchiveManifest, CustomFieldManifest, KeyManifest, MediaManifest,
    MultiplayerModeManifest, PlaySessionManifest, SaveManifest, SavePathManifest, ScriptManifest,
    ServerConsoleManifest, ServerHttpPathManifest,
};

/// The three importable/exportable content unit types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    Game,
    Redistributable,
    Server,
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitKind::Game => write!(f, "game"),
            UnitKind::Redistributable => write!(f, "redistributable"),
            UnitKind::Server => write!(f, "server"),
        }
    }
}

/// Manifest for a game. `title` is required and doubles as the structural
/// discriminator against the other unit shapes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameManifest {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sort_title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub directory_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub released_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub singleplayer: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<ActionManifest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub archives: Vec<ArchiveManifest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collections: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_fields: Vec<CustomFieldManifest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub developers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keys: Vec<KeyManifest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<MediaManifest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub multiplayer_modes: Vec<MultiplayerModeManifest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub platforms: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub play_sessions: Vec<PlaySessionManifest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub publishers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub saves: Vec<SaveManifest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub save_paths: Vec<SavePathManifest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scripts: Vec<ScriptManifest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Manifest for a redistributable (runtime, driver, shared dependency).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedistributableManifest {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub archives: Vec<ArchiveManifest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scripts: Vec<ScriptManifest>,
}

/// Manifest for a dedicated server. `autostart` is required so a server
/// manifest never classifies as the (smaller) redistributable shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerManifest {
    pub id: Uuid,
    pub name: String,
    pub autostart: bool,
    #[serde(default)]
    pub autostart_delay: i32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub arguments: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub working_directory: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<ActionManifest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scripts: Vec<ScriptManifest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub server_consoles: Vec<ServerConsoleManifest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub server_http_paths: Vec<ServerHttpPathManifest>,
}

/// No known unit shape matched the manifest document.
#[derive(Debug, thiserror::Error)]
#[error("manifest does not match any known content unit shape")]
pub struct UnknownKind;

/// A classified content unit manifest.
#[derive(Debug, Clone, PartialEq)]
pub enum Manifest {
    Game(GameManifest),
    Redistributable(RedistributableManifest),
    Server(ServerManifest),
}

impl Manifest {
    /// Classifies a manifest document by trying each known unit shape in
    /// turn; the first successful deserialize wins.
    ///
    /// A server manifest also satisfies the redistributable shape (both
    /// require only `name`), so the stricter server shape is tried first.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, UnknownKind> {
        if let Ok(game) = serde_json::from_slice::<GameManifest>(bytes) {
            return Ok(Manifest::Game(game));
        }
        if let Ok(server) = serde_json::from_slice::<ServerManifest>(bytes) {
            return Ok(Manifest::Server(server));
        }
        if let Ok(redist) = serde_json::from_slice::<RedistributableManifest>(bytes) {
            return Ok(Manifest::Redistributable(redist));
        }
        Err(UnknownKind)
    }

    /// Serializes the manifest document (pretty-printed JSON).
    pub fn to_vec(&self) -> Result<Vec<u8>, serde_json::Error> {
        match self {
            Manifest::Game(m) => serde_json::to_vec_pretty(m),
            Manifest::Redistributable(m) => serde_json::to_vec_pretty(m),
            Manifest::Server(m) => serde_json::to_vec_pretty(m),
        }
    }

    /// The unit type this manifest describes.
    pub fn unit_kind(&self) -> UnitKind {
        match self {
            Manifest::Game(_) => UnitKind::Game,
            Manifest::Redistributable(_) => UnitKind::Redistributable,
            Manifest::Server(_) => UnitKind::Server,
        }
    }

    /// Stable identifier of the content unit.
    pub fn id(&self) -> Uuid {
        match self {
            Manifest::Game(m) => m.id,
            Manifest::Redistributable(m) => m.id,
            Manifest::Server(m) => m.id,
        }
    }

    /// Human-readable name of the content unit.
    pub fn display_name(&self) -> &str {
        match self {
            Manifest::Game(m) => &m.title,
            Manifest::Redistributable(m) => &m.name,
            Manifest::Server(m) => &m.name,
        }
    }
}
