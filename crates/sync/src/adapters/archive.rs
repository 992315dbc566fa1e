//! Adapter for installer payloads (legal under games and redistributables).
//!
//! The payload blob is stored under the archive storage root with a fresh
//! `object_key` file name on every write, so an update writes the new file
//! before the old one is deleted and a failed extraction leaves the previous
//! payload untouched.

use std::io::ErrorKind;

use tracing::warn;
use uuid::Uuid;

use lanshelf_manifest::{ArchiveManifest, RecordKind};
use lanshelf_store::{ArchiveRecord, StorageKind};

use crate::SyncError;
use crate::adapters::{ExportCtx, ImportCtx, blob_err, require_archive_parent};

const KIND: RecordKind = RecordKind::Archive;

fn entry_path(id: Uuid) -> String {
    format!("Archives/{id}")
}

pub(crate) async fn exists(ctx: &ImportCtx<'_>, node: &ArchiveManifest) -> Result<bool, SyncError> {
    let (game_id, redistributable_id) = require_archive_parent(ctx.parent, KIND)?;
    let found = ctx
        .store
        .archives
        .first_where(&|a: &ArchiveRecord| {
            a.id == node.id && a.game_id == game_id && a.redistributable_id == redistributable_id
        })
        .await?;
    Ok(found.is_some())
}

pub(crate) async fn add(ctx: &mut ImportCtx<'_>, node: &ArchiveManifest) -> Result<(), SyncError> {
    let (game_id, redistributable_id) = require_archive_parent(ctx.parent, KIND)?;

    let object_key = Uuid::new_v4().to_string();
    let dest = ctx.locations.root(StorageKind::Archive).join(&object_key);
    let written = ctx
        .archive
        .extract_entry(&entry_path(node.id), &dest)
        .map_err(blob_err)?;

    ctx.store
        .archives
        .add(ArchiveRecord {
            id: node.id,
            game_id,
            redistributable_id,
            version: node.version.clone(),
            changelog: node.changelog.clone(),
            object_key,
            compressed_size: written as i64,
            created_on: node.created_on,
        })
        .await?;
    Ok(())
}

pub(crate) async fn update(
    ctx: &mut ImportCtx<'_>,
    node: &ArchiveManifest,
) -> Result<(), SyncError> {
    let (game_id, redistributable_id) = require_archive_parent(ctx.parent, KIND)?;
    let existing = ctx
        .store
        .archives
        .first_where(&|a: &ArchiveRecord| {
            a.id == node.id && a.game_id == game_id && a.redistributable_id == redistributable_id
        })
        .await?
        .ok_or_else(|| SyncError::RecordVanished {
            kind: KIND,
            id: node.id.to_string(),
        })?;

    let root = ctx.locations.root(StorageKind::Archive);
    let object_key = Uuid::new_v4().to_string();
    let written = ctx
        .archive
        .extract_entry(&entry_path(node.id), &root.join(&object_key))
        .map_err(blob_err)?;

    ctx.store
        .archives
        .update(ArchiveRecord {
            version: node.version.clone(),
            changelog: node.changelog.clone(),
            object_key: object_key.clone(),
            compressed_size: written as i64,
            created_on: node.created_on,
            ..existing.clone()
        })
        .await?;

    // The old payload goes away only after the new file and the record are
    // both in place.
    if !existing.object_key.is_empty() && existing.object_key != object_key {
        let old = root.join(&existing.object_key);
        if let Err(e) = std::fs::remove_file(&old)
            && e.kind() != ErrorKind::NotFound
        {
            warn!(path = %old.display(), error = %e, "failed to remove replaced payload");
        }
    }
    Ok(())
}

pub(crate) async fn export(
    ctx: &mut ExportCtx<'_>,
    entity: &ArchiveRecord,
) -> Result<ArchiveManifest, SyncError> {
    require_archive_parent(ctx.parent, KIND)?;

    let source = ctx
        .locations
        .root(StorageKind::Archive)
        .join(&entity.object_key);
    ctx.builder.add_file(&entry_path(entity.id), &source)?;

    Ok(ArchiveManifest {
        id: entity.id,
        version: entity.version.clone(),
        changelog: entity.changelog.clone(),
        object_key: entity.object_key.clone(),
        compressed_size: entity.compressed_size,
        created_on: entity.created_on,
    })
}
