//! Closed sum type over every child record kind.
//!
//! The sync engine's work queue holds [`ManifestNode`] values and dispatches
//! on [`RecordKind`] by pattern matching, so adding a kind is a compile-time
//! checked, single-point change.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::records::{
    ActionManifest, ArchiveManifest, CustomFieldManifest, KeyManifest, MediaManifest,
    MultiplayerModeManifest, PlaySessionManifest, SaveManifest, SavePathManifest, ScriptManifest,
    ServerConsoleManifest, ServerHttpPathManifest,
};

/// Every child record kind a content unit can own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    Action,
    Archive,
    Collection,
    CustomField,
    Developer,
    Engine,
    Genre,
    Key,
    Media,
    MultiplayerMode,
    Platform,
    PlaySession,
    Publisher,
    Save,
    SavePath,
    Script,
    ServerConsole,
    ServerHttpPath,
    Tag,
}

impl RecordKind {
    /// Archive folder holding this kind's blobs, for blob-bearing kinds.
    pub const fn folder(self) -> Option<&'static str> {
        match self {
            RecordKind::Archive => Some("Archives"),
            RecordKind::Media => Some("Media"),
            RecordKind::Script => Some("Scripts"),
            RecordKind::Save => Some("Saves"),
            _ => None,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Action => "action",
            RecordKind::Archive => "archive",
            RecordKind::Collection => "collection",
            RecordKind::CustomField => "custom field",
            RecordKind::Developer => "developer",
            RecordKind::Engine => "engine",
            RecordKind::Genre => "genre",
            RecordKind::Key => "key",
            RecordKind::Media => "media",
            RecordKind::MultiplayerMode => "multiplayer mode",
            RecordKind::Platform => "platform",
            RecordKind::PlaySession => "play session",
            RecordKind::Publisher => "publisher",
            RecordKind::Save => "save",
            RecordKind::SavePath => "save path",
            RecordKind::Script => "script",
            RecordKind::ServerConsole => "server console",
            RecordKind::ServerHttpPath => "server HTTP path",
            RecordKind::Tag => "tag",
        };
        write!(f, "{name}")
    }
}

/// One queued unit of import work: a child record plus its kind tag.
///
/// Shared-reference kinds (collection, developer, engine, genre, platform,
/// publisher, tag) carry only their identifying name.
#[derive(Debug, Clone, PartialEq)]
pub enum ManifestNode {
    Action(ActionManifest),
    Archive(ArchiveManifest),
    Collection(String),
    CustomField(CustomFieldManifest),
    Developer(String),
    Engine(String),
    Genre(String),
    Key(KeyManifest),
    Media(MediaManifest),
    MultiplayerMode(MultiplayerModeManifest),
    Platform(String),
    PlaySession(PlaySessionManifest),
    Publisher(String),
    Save(SaveManifest),
    SavePath(SavePathManifest),
    Script(ScriptManifest),
    ServerConsole(ServerConsoleManifest),
    ServerHttpPath(ServerHttpPathManifest),
    Tag(String),
}

impl ManifestNode {
    /// The kind tag used for adapter dispatch and progress reporting.
    pub fn kind(&self) -> RecordKind {
        match self {
            ManifestNode::Action(_) => RecordKind::Action,
            ManifestNode::Archive(_) => RecordKind::Archive,
            ManifestNode::Collection(_) => RecordKind::Collection,
            ManifestNode::CustomField(_) => RecordKind::CustomField,
            ManifestNode::Developer(_) => RecordKind::Developer,
            ManifestNode::Engine(_) => RecordKind::Engine,
            ManifestNode::Genre(_) => RecordKind::Genre,
            ManifestNode::Key(_) => RecordKind::Key,
            ManifestNode::Media(_) => RecordKind::Media,
            ManifestNode::MultiplayerMode(_) => RecordKind::MultiplayerMode,
            ManifestNode::Platform(_) => RecordKind::Platform,
            ManifestNode::PlaySession(_) => RecordKind::PlaySession,
            ManifestNode::Publisher(_) => RecordKind::Publisher,
            ManifestNode::Save(_) => RecordKind::Save,
            ManifestNode::SavePath(_) => RecordKind::SavePath,
            ManifestNode::Script(_) => RecordKind::Script,
            ManifestNode::ServerConsole(_) => RecordKind::ServerConsole,
            ManifestNode::ServerHttpPath(_) => RecordKind::ServerHttpPath,
            ManifestNode::Tag(_) => RecordKind::Tag,
        }
    }

    /// Record identifier, for kinds that carry one.
    pub fn id(&self) -> Option<Uuid> {
        match self {
            ManifestNode::Action(m) => Some(m.id),
            ManifestNode::Archive(m) => Some(m.id),
            ManifestNode::Key(m) => Some(m.id),
            ManifestNode::Media(m) => Some(m.id),
            ManifestNode::MultiplayerMode(m) => Some(m.id),
            ManifestNode::PlaySession(m) => Some(m.id),
            ManifestNode::Save(m) => Some(m.id),
            ManifestNode::SavePath(m) => Some(m.id),
            ManifestNode::Script(m) => Some(m.id),
            ManifestNode::ServerConsole(m) => Some(m.id),
            ManifestNode::ServerHttpPath(m) => Some(m.id),
            ManifestNode::Collection(_)
            | ManifestNode::CustomField(_)
            | ManifestNode::Developer(_)
            | ManifestNode::Engine(_)
            | ManifestNode::Genre(_)
            | ManifestNode::Platform(_)
            | ManifestNode::Publisher(_)
            | ManifestNode::Tag(_) => None,
        }
    }

    /// Human-readable label for progress display.
    pub fn display_name(&self) -> String {
        match self {
            ManifestNode::Action(m) => m.name.clone(),
            ManifestNode::Archive(m) => {
                if m.version.is_empty() {
                    m.id.to_string()
                } else {
                    m.version.clone()
                }
            }
            ManifestNode::Collection(name) => name.clone(),
            ManifestNode::CustomField(m) => m.name.clone(),
            ManifestNode::Developer(name) => name.clone(),
            ManifestNode::Engine(name) => name.clone(),
            ManifestNode::Genre(name) => name.clone(),
            ManifestNode::Key(m) => m.value.clone(),
            ManifestNode::Media(m) => format!("{:?}", m.kind),
            ManifestNode::MultiplayerMode(m) => format!("{:?}", m.kind),
            ManifestNode::Platform(name) => name.clone(),
            ManifestNode::PlaySession(m) => m.id.to_string(),
            ManifestNode::Publisher(name) => name.clone(),
            ManifestNode::Save(m) => m.id.to_string(),
            ManifestNode::SavePath(m) => m.path.clone(),
            ManifestNode::Script(m) => {
                if m.name.is_empty() {
                    format!("{:?}", m.kind)
                } else {
                    m.name.clone()
                }
            }
            ManifestNode::ServerConsole(m) => m.name.clone(),
            ManifestNode::ServerHttpPath(m) => m.path.clone(),
            ManifestNode::Tag(name) => name.clone(),
        }
    }

    /// Archive entry path of this node's blob, for blob-bearing kinds.
    pub fn blob_path(&self) -> Option<String> {
        let folder = self.kind().folder()?;
        let id = self.id()?;
        Some(format!("{folder}/{id}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{MediaKind, ScriptKind};

    #[test]
    fn folder_only_for_blob_kinds() {
        assert_eq!(RecordKind::Archive.folder(), Some("Archives"));
        assert_eq!(RecordKind::Media.folder(), Some("Media"));
        assert_eq!(RecordKind::Script.folder(), Some("Scripts"));
        assert_eq!(RecordKind::Save.folder(), Some("Saves"));
        assert_eq!(RecordKind::Tag.folder(), None);
        assert_eq!(RecordKind::Action.folder(), None);
    }

    #[test]
    fn blob_path_uses_folder_and_id() {
        let id = Uuid::new_v4();
        let node = ManifestNode::Media(MediaManifest {
            id,
            file_id: Uuid::new_v4(),
            kind: MediaKind::Cover,
            ..Default::default()
        });
        assert_eq!(node.blob_path(), Some(format!("Media/{id}")));
    }

    #[test]
    fn blob_path_absent_for_plain_kinds() {
        assert_eq!(ManifestNode::Tag("Action".into()).blob_path(), None);
        assert_eq!(
            ManifestNode::CustomField(CustomFieldManifest {
                name: "hltb".into(),
                value: "12h".into(),
            })
            .blob_path(),
            None
        );
    }

    #[test]
    fn display_name_prefers_human_fields() {
        let node = ManifestNode::Script(ScriptManifest {
            id: Uuid::new_v4(),
            kind: ScriptKind::Install,
            name: "setup".into(),
            ..Default::default()
        });
        assert_eq!(node.display_name(), "setup");

        let unnamed = ManifestNode::Script(ScriptManifest {
            id: Uuid::new_v4(),
            kind: ScriptKind::Uninstall,
            ..Default::default()
        });
        assert_eq!(unnamed.display_name(), "Uninstall");
    }

    #[test]
    fn kind_display() {
        assert_eq!(RecordKind::SavePath.to_string(), "save path");
        assert_eq!(RecordKind::ServerHttpPath.to_string(), "server HTTP path");
    }
}
