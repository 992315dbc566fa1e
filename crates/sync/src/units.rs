//! Top-level unit handling: resolving the parent entity, copying its scalar
//! fields, and enumerating child records in the fixed queue order.
//!
//! Children are queued in a deterministic order (actions → archives →
//! collections → custom fields → developers → engine → genres → keys →
//! media → multiplayer modes → platforms → play sessions → publishers →
//! saves → save paths → scripts → server consoles → server HTTP paths →
//! tags) so progress reporting is stable; adapters never depend on sibling
//! completion.

use tracing::info;
use uuid::Uuid;

use lanshelf_manifest::{
    GameManifest, IncludeFlags, Manifest, ManifestNode, RecordKind, RedistributableManifest,
    ServerManifest, UnitKind,
};
use lanshelf_store::{
    Action, ArchiveRecord, Collection, Company, ContentStore, CustomField, Engine, Game, Genre,
    Key, Media, MultiplayerMode, Platform, PlaySession, Redistributable, Save, SavePath, Script,
    Server, ServerConsole, ServerHttpPath, Tag,
};

use crate::SyncError;

/// Reference to a persisted content unit, used to start an export job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitRef {
    Game(Uuid),
    Redistributable(Uuid),
    Server(Uuid),
}

/// The resolved top-level unit a job is running against.
///
/// Resolved synchronously before any child record is processed; every child
/// adapter scopes its work to this unit.
#[derive(Debug, Clone)]
pub enum ParentUnit {
    Game(Game),
    Redistributable(Redistributable),
    Server(Server),
}

impl ParentUnit {
    pub fn kind(&self) -> UnitKind {
        match self {
            ParentUnit::Game(_) => UnitKind::Game,
            ParentUnit::Redistributable(_) => UnitKind::Redistributable,
            ParentUnit::Server(_) => UnitKind::Server,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            ParentUnit::Game(g) => g.id,
            ParentUnit::Redistributable(r) => r.id,
            ParentUnit::Server(s) => s.id,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            ParentUnit::Game(g) => &g.title,
            ParentUnit::Redistributable(r) => &r.name,
            ParentUnit::Server(s) => &s.name,
        }
    }
}

/// Resolves (get-or-create) the top-level unit described by `manifest` and
/// copies its scalar fields. Must succeed before any child is queued.
pub(crate) async fn resolve_unit(
    store: &ContentStore,
    manifest: &Manifest,
) -> Result<ParentUnit, SyncError> {
    let parent = match manifest {
        Manifest::Game(m) => {
            let game = Game {
                id: m.id,
                title: m.title.clone(),
                sort_title: m.sort_title.clone(),
                directory_name: m.directory_name.clone(),
                description: m.description.clone(),
                notes: m.notes.clone(),
                released_on: m.released_on,
                singleplayer: m.singleplayer,
            };
            let game = if store.games.exists(m.id).await? {
                store.games.update(game).await?
            } else {
                store.games.add(game).await?
            };
            ParentUnit::Game(game)
        }
        Manifest::Redistributable(m) => {
            let redist = Redistributable {
                id: m.id,
                name: m.name.clone(),
                description: m.description.clone(),
                notes: m.notes.clone(),
            };
            let redist = if store.redistributables.exists(m.id).await? {
                store.redistributables.update(redist).await?
            } else {
                store.redistributables.add(redist).await?
            };
            ParentUnit::Redistributable(redist)
        }
        Manifest::Server(m) => {
            let server = Server {
                id: m.id,
                name: m.name.clone(),
                arguments: m.arguments.clone(),
                working_directory: m.working_directory.clone(),
                autostart: m.autostart,
                autostart_delay: m.autostart_delay,
            };
            let server = if store.servers.exists(m.id).await? {
                store.servers.update(server).await?
            } else {
                store.servers.add(server).await?
            };
            ParentUnit::Server(server)
        }
    };

    info!(
        unit = %parent.kind(),
        id = %parent.id(),
        name = parent.display_name(),
        "resolved content unit"
    );
    Ok(parent)
}

/// Loads an existing unit for export. Fails with [`SyncError::UnitNotFound`]
/// when the id is absent.
pub(crate) async fn load_unit(
    store: &ContentStore,
    unit: UnitRef,
) -> Result<ParentUnit, SyncError> {
    match unit {
        UnitRef::Game(id) => store
            .games
            .get(id)
            .await?
            .map(ParentUnit::Game)
            .ok_or(SyncError::UnitNotFound {
                unit: UnitKind::Game,
                id,
            }),
        UnitRef::Redistributable(id) => store
            .redistributables
            .get(id)
            .await?
            .map(ParentUnit::Redistributable)
            .ok_or(SyncError::UnitNotFound {
                unit: UnitKind::Redistributable,
                id,
            }),
        UnitRef::Server(id) => store
            .servers
            .get(id)
            .await?
            .map(ParentUnit::Server)
            .ok_or(SyncError::UnitNotFound {
                unit: UnitKind::Server,
                id,
            }),
    }
}

/// Enumerates a manifest's child records in queue order, gated per kind by
/// the inclusion flags.
pub(crate) fn selected_nodes(manifest: &Manifest, flags: IncludeFlags) -> Vec<ManifestNode> {
    let mut nodes = Vec::new();
    let on = |flag: IncludeFlags| flags.contains(flag);

    match manifest {
        Manifest::Game(m) => {
            if on(IncludeFlags::ACTIONS) {
                nodes.extend(m.actions.iter().cloned().map(ManifestNode::Action));
            }
            if on(IncludeFlags::ARCHIVES) {
                nodes.extend(m.archives.iter().cloned().map(ManifestNode::Archive));
            }
            if on(IncludeFlags::COLLECTIONS) {
                nodes.extend(m.collections.iter().cloned().map(ManifestNode::Collection));
            }
            if on(IncludeFlags::CUSTOM_FIELDS) {
                nodes.extend(m.custom_fields.iter().cloned().map(ManifestNode::CustomField));
            }
            if on(IncludeFlags::DEVELOPERS) {
                nodes.extend(m.developers.iter().cloned().map(ManifestNode::Developer));
            }
            if on(IncludeFlags::ENGINE)
                && let Some(engine) = &m.engine
            {
                nodes.push(ManifestNode::Engine(engine.clone()));
            }
            if on(IncludeFlags::GENRES) {
                nodes.extend(m.genres.iter().cloned().map(ManifestNode::Genre));
            }
            if on(IncludeFlags::KEYS) {
                nodes.extend(m.keys.iter().cloned().map(ManifestNode::Key));
            }
            if on(IncludeFlags::MEDIA) {
                nodes.extend(m.media.iter().cloned().map(ManifestNode::Media));
            }
            if on(IncludeFlags::MULTIPLAYER_MODES) {
                nodes.extend(
                    m.multiplayer_modes
                        .iter()
                        .cloned()
                        .map(ManifestNode::MultiplayerMode),
                );
            }
            if on(IncludeFlags::PLATFORMS) {
                nodes.extend(m.platforms.iter().cloned().map(ManifestNode::Platform));
            }
            if on(IncludeFlags::PLAY_SESSIONS) {
                nodes.extend(m.play_sessions.iter().cloned().map(ManifestNode::PlaySession));
            }
            if on(IncludeFlags::PUBLISHERS) {
                nodes.extend(m.publishers.iter().cloned().map(ManifestNode::Publisher));
            }
            if on(IncludeFlags::SAVES) {
                nodes.extend(m.saves.iter().cloned().map(ManifestNode::Save));
            }
            if on(IncludeFlags::SAVE_PATHS) {
                nodes.extend(m.save_paths.iter().cloned().map(ManifestNode::SavePath));
            }
            if on(IncludeFlags::SCRIPTS) {
                nodes.extend(m.scripts.iter().cloned().map(ManifestNode::Script));
            }
            if on(IncludeFlags::TAGS) {
                nodes.extend(m.tags.iter().cloned().map(ManifestNode::Tag));
            }
        }
        Manifest::Redistributable(m) => {
            if on(IncludeFlags::ARCHIVES) {
                nodes.extend(m.archives.iter().cloned().map(ManifestNode::Archive));
            }
            if on(IncludeFlags::SCRIPTS) {
                nodes.extend(m.scripts.iter().cloned().map(ManifestNode::Script));
            }
        }
        Manifest::Server(m) => {
            if on(IncludeFlags::ACTIONS) {
                nodes.extend(m.actions.iter().cloned().map(ManifestNode::Action));
            }
            if on(IncludeFlags::SCRIPTS) {
                nodes.extend(m.scripts.iter().cloned().map(ManifestNode::Script));
            }
            if on(IncludeFlags::SERVER_CONSOLES) {
                nodes.extend(
                    m.server_consoles
                        .iter()
                        .cloned()
                        .map(ManifestNode::ServerConsole),
                );
            }
            if on(IncludeFlags::SERVER_HTTP_PATHS) {
                nodes.extend(
                    m.server_http_paths
                        .iter()
                        .cloned()
                        .map(ManifestNode::ServerHttpPath),
                );
            }
        }
    }

    nodes
}

/// Every child record of a manifest, regardless of flags (preview listing).
pub(crate) fn all_nodes(manifest: &Manifest) -> Vec<ManifestNode> {
    selected_nodes(manifest, IncludeFlags::all())
}

// ---------------------------------------------------------------------------
// Export side
// ---------------------------------------------------------------------------

/// One queued unit of export work: a persisted child entity plus its kind.
#[derive(Debug, Clone)]
pub(crate) enum ExportItem {
    Action(Action),
    Archive(ArchiveRecord),
    Collection(Collection),
    CustomField(CustomField),
    Developer(Company),
    Engine(Engine),
    Genre(Genre),
    Key(Key),
    Media(Media),
    MultiplayerMode(MultiplayerMode),
    Platform(Platform),
    PlaySession(PlaySession),
    Publisher(Company),
    Save(Save),
    SavePath(SavePath),
    Script(Script),
    ServerConsole(ServerConsole),
    ServerHttpPath(ServerHttpPath),
    Tag(Tag),
}

impl ExportItem {
    pub(crate) fn kind(&self) -> RecordKind {
        match self {
            ExportItem::Action(_) => RecordKind::Action,
            ExportItem::Archive(_) => RecordKind::Archive,
            ExportItem::Collection(_) => RecordKind::Collection,
            ExportItem::CustomField(_) => RecordKind::CustomField,
            ExportItem::Developer(_) => RecordKind::Developer,
            ExportItem::Engine(_) => RecordKind::Engine,
            ExportItem::Genre(_) => RecordKind::Genre,
            ExportItem::Key(_) => RecordKind::Key,
            ExportItem::Media(_) => RecordKind::Media,
            ExportItem::MultiplayerMode(_) => RecordKind::MultiplayerMode,
            ExportItem::Platform(_) => RecordKind::Platform,
            ExportItem::PlaySession(_) => RecordKind::PlaySession,
            ExportItem::Publisher(_) => RecordKind::Publisher,
            ExportItem::Save(_) => RecordKind::Save,
            ExportItem::SavePath(_) => RecordKind::SavePath,
            ExportItem::Script(_) => RecordKind::Script,
            ExportItem::ServerConsole(_) => RecordKind::ServerConsole,
            ExportItem::ServerHttpPath(_) => RecordKind::ServerHttpPath,
            ExportItem::Tag(_) => RecordKind::Tag,
        }
    }

    pub(crate) fn display_name(&self) -> String {
        match self {
            ExportItem::Action(e) => e.name.clone(),
            ExportItem::Archive(e) => {
                if e.version.is_empty() {
                    e.id.to_string()
                } else {
                    e.version.clone()
                }
            }
            ExportItem::Collection(e) => e.name.clone(),
            ExportItem::CustomField(e) => e.name.clone(),
            ExportItem::Developer(e) | ExportItem::Publisher(e) => e.name.clone(),
            ExportItem::Engine(e) => e.name.clone(),
            ExportItem::Genre(e) => e.name.clone(),
            ExportItem::Key(e) => e.value.clone(),
            ExportItem::Media(e) => format!("{:?}", e.kind),
            ExportItem::MultiplayerMode(e) => format!("{:?}", e.kind),
            ExportItem::Platform(e) => e.name.clone(),
            ExportItem::PlaySession(e) => e.id.to_string(),
            ExportItem::Save(e) => e.id.to_string(),
            ExportItem::SavePath(e) => e.path.clone(),
            ExportItem::Script(e) => {
                if e.name.is_empty() {
                    format!("{:?}", e.kind)
                } else {
                    e.name.clone()
                }
            }
            ExportItem::ServerConsole(e) => e.name.clone(),
            ExportItem::ServerHttpPath(e) => e.path.clone(),
            ExportItem::Tag(e) => e.name.clone(),
        }
    }
}

/// Enumerates a unit's persisted child entities in queue order, gated per
/// kind by the inclusion flags.
pub(crate) async fn collect_export_items(
    store: &ContentStore,
    parent: &ParentUnit,
    flags: IncludeFlags,
) -> Result<Vec<ExportItem>, SyncError> {
    let mut items = Vec::new();
    let on = |flag: IncludeFlags| flags.contains(flag);

    match parent {
        ParentUnit::Game(game) => {
            let gid = game.id;
            if on(IncludeFlags::ACTIONS) {
                let found = store
                    .actions
                    .all_where(&|a: &Action| a.game_id == Some(gid))
                    .await?;
                items.extend(found.into_iter().map(ExportItem::Action));
            }
            if on(IncludeFlags::ARCHIVES) {
                let found = store
                    .archives
                    .all_where(&|a: &ArchiveRecord| a.game_id == Some(gid))
                    .await?;
                items.extend(found.into_iter().map(ExportItem::Archive));
            }
            if on(IncludeFlags::COLLECTIONS) {
                let found = store
                    .collections
                    .all_where(&|c: &Collection| c.game_ids.contains(&gid))
                    .await?;
                items.extend(found.into_iter().map(ExportItem::Collection));
            }
            if on(IncludeFlags::CUSTOM_FIELDS) {
                let found = store
                    .custom_fields
                    .all_where(&|f: &CustomField| f.game_id == gid)
                    .await?;
                items.extend(found.into_iter().map(ExportItem::CustomField));
            }
            if on(IncludeFlags::DEVELOPERS) {
                let found = store
                    .companies
                    .all_where(&|c: &Company| c.developed_game_ids.contains(&gid))
                    .await?;
                items.extend(found.into_iter().map(ExportItem::Developer));
            }
            if on(IncludeFlags::ENGINE) {
                let found = store
                    .engines
                    .all_where(&|e: &Engine| e.game_ids.contains(&gid))
                    .await?;
                // The manifest carries at most one engine.
                items.extend(found.into_iter().next().map(ExportItem::Engine));
            }
            if on(IncludeFlags::GENRES) {
                let found = store
                    .genres
                    .all_where(&|g: &Genre| g.game_ids.contains(&gid))
                    .await?;
                items.extend(found.into_iter().map(ExportItem::Genre));
            }
            if on(IncludeFlags::KEYS) {
                let found = store.keys.all_where(&|k: &Key| k.game_id == gid).await?;
                items.extend(found.into_iter().map(ExportItem::Key));
            }
            if on(IncludeFlags::MEDIA) {
                let found = store.media.all_where(&|m: &Media| m.game_id == gid).await?;
                items.extend(found.into_iter().map(ExportItem::Media));
            }
            if on(IncludeFlags::MULTIPLAYER_MODES) {
                let found = store
                    .multiplayer_modes
                    .all_where(&|m: &MultiplayerMode| m.game_id == gid)
                    .await?;
                items.extend(found.into_iter().map(ExportItem::MultiplayerMode));
            }
            if on(IncludeFlags::PLATFORMS) {
                let found = store
                    .platforms
                    .all_where(&|p: &Platform| p.game_ids.contains(&gid))
                    .await?;
                items.extend(found.into_iter().map(ExportItem::Platform));
            }
            if on(IncludeFlags::PLAY_SESSIONS) {
                let found = store
                    .play_sessions
                    .all_where(&|p: &PlaySession| p.game_id == gid)
                    .await?;
                items.extend(found.into_iter().map(ExportItem::PlaySession));
            }
            if on(IncludeFlags::PUBLISHERS) {
                let found = store
                    .companies
                    .all_where(&|c: &Company| c.published_game_ids.contains(&gid))
                    .await?;
                items.extend(found.into_iter().map(ExportItem::Publisher));
            }
            if on(IncludeFlags::SAVES) {
                let found = store.saves.all_where(&|s: &Save| s.game_id == gid).await?;
                items.extend(found.into_iter().map(ExportItem::Save));
            }
            if on(IncludeFlags::SAVE_PATHS) {
                let found = store
                    .save_paths
                    .all_where(&|p: &SavePath| p.game_id == gid)
                    .await?;
                items.extend(found.into_iter().map(ExportItem::SavePath));
            }
            if on(IncludeFlags::SCRIPTS) {
                let found = store
                    .scripts
                    .all_where(&|s: &Script| s.game_id == Some(gid))
                    .await?;
                items.extend(found.into_iter().map(ExportItem::Script));
            }
            if on(IncludeFlags::TAGS) {
                let found = store
                    .tags
                    .all_where(&|t: &Tag| t.game_ids.contains(&gid))
                    .await?;
                items.extend(found.into_iter().map(ExportItem::Tag));
            }
        }
        ParentUnit::Redistributable(redist) => {
            let rid = redist.id;
            if on(IncludeFlags::ARCHIVES) {
                let found = store
                    .archives
                    .all_where(&|a: &ArchiveRecord| a.redistributable_id == Some(rid))
                    .await?;
                items.extend(found.into_iter().map(ExportItem::Archive));
            }
            if on(IncludeFlags::SCRIPTS) {
                let found = store
                    .scripts
                    .all_where(&|s: &Script| s.redistributable_id == Some(rid))
                    .await?;
                items.extend(found.into_iter().map(ExportItem::Script));
            }
        }
        ParentUnit::Server(server) => {
            let sid = server.id;
            if on(IncludeFlags::ACTIONS) {
                let found = store
                    .actions
                    .all_where(&|a: &Action| a.server_id == Some(sid))
                    .await?;
                items.extend(found.into_iter().map(ExportItem::Action));
            }
            if on(IncludeFlags::SCRIPTS) {
                let found = store
                    .scripts
                    .all_where(&|s: &Script| s.server_id == Some(sid))
                    .await?;
                items.extend(found.into_iter().map(ExportItem::Script));
            }
            if on(IncludeFlags::SERVER_CONSOLES) {
                let found = store
                    .server_consoles
                    .all_where(&|c: &ServerConsole| c.server_id == sid)
                    .await?;
                items.extend(found.into_iter().map(ExportItem::ServerConsole));
            }
            if on(IncludeFlags::SERVER_HTTP_PATHS) {
                let found = store
                    .server_http_paths
                    .all_where(&|p: &ServerHttpPath| p.server_id == sid)
                    .await?;
                items.extend(found.into_iter().map(ExportItem::ServerHttpPath));
            }
        }
    }

    Ok(items)
}

/// Builds the manifest skeleton for an export: scalar fields copied from the
/// unit entity, every child collection empty.
pub(crate) fn manifest_for(parent: &ParentUnit) -> Manifest {
    match parent {
        ParentUnit::Game(g) => Manifest::Game(GameManifest {
            id: g.id,
            title: g.title.clone(),
            sort_title: g.sort_title.clone(),
            directory_name: g.directory_name.clone(),
            description: g.description.clone(),
            notes: g.notes.clone(),
            released_on: g.released_on,
            singleplayer: g.singleplayer,
            ..Default::default()
        }),
        ParentUnit::Redistributable(r) => Manifest::Redistributable(RedistributableManifest {
            id: r.id,
            name: r.name.clone(),
            description: r.description.clone(),
            notes: r.notes.clone(),
            ..Default::default()
        }),
        ParentUnit::Server(s) => Manifest::Server(ServerManifest {
            id: s.id,
            name: s.name.clone(),
            arguments: s.arguments.clone(),
            working_directory: s.working_directory.clone(),
            autostart: s.autostart,
            autostart_delay: s.autostart_delay,
            ..Default::default()
        }),
    }
}

/// Files an exported node into the manifest collection it belongs to.
pub(crate) fn append_node(manifest: &mut Manifest, node: ManifestNode) -> Result<(), SyncError> {
    let kind = node.kind();
    match (manifest, node) {
        (Manifest::Game(m), ManifestNode::Action(n)) => m.actions.push(n),
        (Manifest::Game(m), ManifestNode::Archive(n)) => m.archives.push(n),
        (Manifest::Game(m), ManifestNode::Collection(n)) => m.collections.push(n),
        (Manifest::Game(m), ManifestNode::CustomField(n)) => m.custom_fields.push(n),
        (Manifest::Game(m), ManifestNode::Developer(n)) => m.developers.push(n),
        (Manifest::Game(m), ManifestNode::Engine(n)) => m.engine = Some(n),
        (Manifest::Game(m), ManifestNode::Genre(n)) => m.genres.push(n),
        (Manifest::Game(m), ManifestNode::Key(n)) => m.keys.push(n),
        (Manifest::Game(m), ManifestNode::Media(n)) => m.media.push(n),
        (Manifest::Game(m), ManifestNode::MultiplayerMode(n)) => m.multiplayer_modes.push(n),
        (Manifest::Game(m), ManifestNode::Platform(n)) => m.platforms.push(n),
        (Manifest::Game(m), ManifestNode::PlaySession(n)) => m.play_sessions.push(n),
        (Manifest::Game(m), ManifestNode::Publisher(n)) => m.publishers.push(n),
        (Manifest::Game(m), ManifestNode::Save(n)) => m.saves.push(n),
        (Manifest::Game(m), ManifestNode::SavePath(n)) => m.save_paths.push(n),
        (Manifest::Game(m), ManifestNode::Script(n)) => m.scripts.push(n),
        (Manifest::Game(m), ManifestNode::Tag(n)) => m.tags.push(n),
        (Manifest::Redistributable(m), ManifestNode::Archive(n)) => m.archives.push(n),
        (Manifest::Redistributable(m), ManifestNode::Script(n)) => m.scripts.push(n),
        (Manifest::Server(m), ManifestNode::Action(n)) => m.actions.push(n),
        (Manifest::Server(m), ManifestNode::Script(n)) => m.scripts.push(n),
        (Manifest::Server(m), ManifestNode::ServerConsole(n)) => m.server_consoles.push(n),
        (Manifest::Server(m), ManifestNode::ServerHttpPath(n)) => m.server_http_paths.push(n),
        (manifest, _) => {
            return Err(SyncError::ParentMismatch {
                kind,
                parent: manifest.unit_kind(),
            });
        }
    }
    Ok(())
}
