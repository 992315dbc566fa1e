//! Child record manifests — one kind-tagged record per importable child item.
//!
//! Blob-bearing kinds (archive payloads, media, scripts, saves) reference an
//! archive entry named `{Folder}/{Id}`; the entry path is derived, never
//! stored in the manifest.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A launchable action attached to a game or server (e.g. "Play", "Editor").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionManifest {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub arguments: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub working_directory: String,
    #[serde(default)]
    pub primary_action: bool,
    #[serde(default)]
    pub sort_order: i32,
}

/// An installer payload version. Blob at `Archives/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveManifest {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub changelog: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub object_key: String,
    #[serde(default)]
    pub compressed_size: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<DateTime<Utc>>,
}

/// Category of a media file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    #[default]
    Icon,
    Cover,
    Background,
    Logo,
    Manual,
}

/// Artwork or documentation attached to a game. Blob at `Media/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaManifest {
    pub id: Uuid,
    pub file_id: Uuid,
    #[serde(default)]
    pub kind: MediaKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub crc32: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<DateTime<Utc>>,
}

/// Lifecycle hook a script runs at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScriptKind {
    #[default]
    Install,
    Uninstall,
    NameChange,
    KeyChange,
    BeforeStart,
    AfterStop,
}

/// An automation script. The script text is the blob at `Scripts/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptManifest {
    pub id: Uuid,
    #[serde(default)]
    pub kind: ScriptKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub requires_admin: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<DateTime<Utc>>,
}

/// How a key is matched to a claimant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyAllocationMethod {
    #[default]
    UserAccount,
    MacAddress,
}

/// A product key belonging to a game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyManifest {
    pub id: Uuid,
    pub value: String,
    #[serde(default)]
    pub allocation_method: KeyAllocationMethod,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub claimed_by_mac_address: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub claimed_by_ipv4_address: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub claimed_by_computer_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimed_on: Option<DateTime<Utc>>,
}

/// A captured save-game snapshot. Blob at `Saves/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveManifest {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user_name: String,
    #[serde(default)]
    pub size: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<DateTime<Utc>>,
}

/// Where save data lives on an installed machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SavePathKind {
    #[default]
    File,
    Registry,
}

/// One location (file glob or registry path) that save capture watches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePathManifest {
    pub id: Uuid,
    #[serde(default)]
    pub kind: SavePathKind,
    pub path: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub working_directory: String,
    #[serde(default)]
    pub regex: bool,
}

/// Multiplayer session topology.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MultiplayerKind {
    #[default]
    Local,
    Lan,
    Online,
}

/// A supported multiplayer mode and its player bounds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiplayerModeManifest {
    pub id: Uuid,
    #[serde(default)]
    pub kind: MultiplayerKind,
    #[serde(default)]
    pub min_players: i32,
    #[serde(default)]
    pub max_players: i32,
    #[serde(default)]
    pub spectators: i32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub network_protocol: String,
}

/// A recorded play session interval.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaySessionManifest {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
}

/// A free-form name/value pair attached to a game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFieldManifest {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
}

/// How a server console is reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServerConsoleKind {
    #[default]
    LogFile,
    Rcon,
}

/// A console attached to a dedicated server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConsoleManifest {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub kind: ServerConsoleKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub host: String,
    #[serde(default)]
    pub port: u16,
}

/// A local directory a server exposes over HTTP.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerHttpPathManifest {
    pub id: Uuid,
    pub local_path: String,
    pub path: String,
}
