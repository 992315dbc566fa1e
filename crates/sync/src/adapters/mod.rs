//! Per-kind record adapters.
//!
//! Each adapter knows how to test existence, add, update, and export one
//! record kind against one parent content unit. The drain loops in
//! [`crate::import`] and [`crate::export`] dispatch to these modules by
//! pattern matching on the node kind.
//!
//! Every adapter operation guards the parent unit type first: a record kind
//! that is not legal under the current unit fails fast with a parent
//! mismatch instead of touching the store.

pub(crate) mod action;
pub(crate) mod archive;
pub(crate) mod custom_field;
pub(crate) mod key;
pub(crate) mod media;
pub(crate) mod multiplayer;
pub(crate) mod play_session;
pub(crate) mod save;
pub(crate) mod save_path;
pub(crate) mod script;
pub(crate) mod server_console;
pub(crate) mod server_http_path;
pub(crate) mod shared;

use lanshelf_archive::{ArchiveBuilder, ArchiveError, ContentArchive};
use lanshelf_manifest::RecordKind;
use lanshelf_store::{ContentStore, Game, Server, StorageLocations};
use uuid::Uuid;

use crate::units::ParentUnit;
use crate::SyncError;

/// Everything an import adapter needs for one record.
pub(crate) struct ImportCtx<'a> {
    pub store: &'a ContentStore,
    pub locations: &'a dyn StorageLocations,
    pub archive: &'a mut ContentArchive,
    pub parent: &'a ParentUnit,
}

/// Everything an export adapter needs for one record.
pub(crate) struct ExportCtx<'a> {
    pub store: &'a ContentStore,
    pub locations: &'a dyn StorageLocations,
    pub builder: &'a mut ArchiveBuilder,
    pub parent: &'a ParentUnit,
}

/// Parent guard: the record kind is legal under games only.
pub(crate) fn require_game(parent: &ParentUnit, kind: RecordKind) -> Result<&Game, SyncError> {
    match parent {
        ParentUnit::Game(game) => Ok(game),
        other => Err(SyncError::ParentMismatch {
            kind,
            parent: other.kind(),
        }),
    }
}

/// Parent guard: the record kind is legal under servers only.
pub(crate) fn require_server(parent: &ParentUnit, kind: RecordKind) -> Result<&Server, SyncError> {
    match parent {
        ParentUnit::Server(server) => Ok(server),
        other => Err(SyncError::ParentMismatch {
            kind,
            parent: other.kind(),
        }),
    }
}

/// Parent guard for actions: legal under games and servers.
/// Returns `(game_id, server_id)` foreign keys, exactly one set.
pub(crate) fn require_action_parent(
    parent: &ParentUnit,
    kind: RecordKind,
) -> Result<(Option<Uuid>, Option<Uuid>), SyncError> {
    match parent {
        ParentUnit::Game(game) => Ok((Some(game.id), None)),
        ParentUnit::Server(server) => Ok((None, Some(server.id))),
        other => Err(SyncError::ParentMismatch {
            kind,
            parent: other.kind(),
        }),
    }
}

/// Parent guard for archive payloads: legal under games and
/// redistributables. Returns `(game_id, redistributable_id)`.
pub(crate) fn require_archive_parent(
    parent: &ParentUnit,
    kind: RecordKind,
) -> Result<(Option<Uuid>, Option<Uuid>), SyncError> {
    match parent {
        ParentUnit::Game(game) => Ok((Some(game.id), None)),
        ParentUnit::Redistributable(redist) => Ok((None, Some(redist.id))),
        other => Err(SyncError::ParentMismatch {
            kind,
            parent: other.kind(),
        }),
    }
}

/// Scripts are legal under every unit type. Returns
/// `(game_id, redistributable_id, server_id)`, exactly one set.
pub(crate) fn script_parent(parent: &ParentUnit) -> (Option<Uuid>, Option<Uuid>, Option<Uuid>) {
    match parent {
        ParentUnit::Game(game) => (Some(game.id), None, None),
        ParentUnit::Redistributable(redist) => (None, Some(redist.id), None),
        ParentUnit::Server(server) => (None, None, Some(server.id)),
    }
}

/// Maps a missing archive entry to the dedicated missing-blob failure so the
/// per-record reason names the entry path.
pub(crate) fn blob_err(e: ArchiveError) -> SyncError {
    match e {
        ArchiveError::EntryMissing(path) => SyncError::MissingBlob { path },
        other => SyncError::Archive(other),
    }
}
