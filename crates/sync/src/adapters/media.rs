//! Adapter for media files (legal under games only).
//!
//! Media files are stored under the media root keyed by `file_id`, which is
//! reassigned on every write. The stored CRC32 is computed from the bytes
//! actually extracted, not trusted from the manifest.

use std::io::ErrorKind;

use tracing::warn;
use uuid::Uuid;

use lanshelf_archive::crc32_file;
use lanshelf_manifest::{MediaManifest, RecordKind};
use lanshelf_store::{Media, StorageKind};

use crate::SyncError;
use crate::adapters::{ExportCtx, ImportCtx, blob_err, require_game};

const KIND: RecordKind = RecordKind::Media;

fn entry_path(id: Uuid) -> String {
    format!("Media/{id}")
}

pub(crate) async fn exists(ctx: &ImportCtx<'_>, node: &MediaManifest) -> Result<bool, SyncError> {
    let game = require_game(ctx.parent, KIND)?;
    let game_id = game.id;
    let found = ctx
        .store
        .media
        .first_where(&|m: &Media| m.id == node.id && m.game_id == game_id)
        .await?;
    Ok(found.is_some())
}

pub(crate) async fn add(ctx: &mut ImportCtx<'_>, node: &MediaManifest) -> Result<(), SyncError> {
    let game = require_game(ctx.parent, KIND)?;

    let file_id = Uuid::new_v4();
    let dest = ctx
        .locations
        .root(StorageKind::Media)
        .join(file_id.to_string());
    ctx.archive
        .extract_entry(&entry_path(node.id), &dest)
        .map_err(blob_err)?;
    let crc32 = crc32_file(&dest)?;

    ctx.store
        .media
        .add(Media {
            id: node.id,
            game_id: game.id,
            file_id,
            kind: node.kind,
            source_url: node.source_url.clone(),
            mime_type: node.mime_type.clone(),
            crc32,
            created_on: node.created_on,
        })
        .await?;
    Ok(())
}

pub(crate) async fn update(ctx: &mut ImportCtx<'_>, node: &MediaManifest) -> Result<(), SyncError> {
    let game = require_game(ctx.parent, KIND)?;
    let game_id = game.id;
    let existing = ctx
        .store
        .media
        .first_where(&|m: &Media| m.id == node.id && m.game_id == game_id)
        .await?
        .ok_or_else(|| SyncError::RecordVanished {
            kind: KIND,
            id: node.id.to_string(),
        })?;

    let root = ctx.locations.root(StorageKind::Media);
    let file_id = Uuid::new_v4();
    ctx.archive
        .extract_entry(&entry_path(node.id), &root.join(file_id.to_string()))
        .map_err(blob_err)?;
    let crc32 = crc32_file(&root.join(file_id.to_string()))?;

    ctx.store
        .media
        .update(Media {
            file_id,
            kind: node.kind,
            source_url: node.source_url.clone(),
            mime_type: node.mime_type.clone(),
            crc32,
            created_on: node.created_on,
            ..existing
        })
        .await?;

    // New file written and record updated; now the stale file can go.
    if existing.file_id != file_id {
        let old = root.join(existing.file_id.to_string());
        if let Err(e) = std::fs::remove_file(&old)
            && e.kind() != ErrorKind::NotFound
        {
            warn!(path = %old.display(), error = %e, "failed to remove replaced media file");
        }
    }
    Ok(())
}

pub(crate) async fn export(
    ctx: &mut ExportCtx<'_>,
    entity: &Media,
) -> Result<MediaManifest, SyncError> {
    require_game(ctx.parent, KIND)?;

    let source = ctx
        .locations
        .root(StorageKind::Media)
        .join(entity.file_id.to_string());
    ctx.builder.add_file(&entry_path(entity.id), &source)?;

    Ok(MediaManifest {
        id: entity.id,
        file_id: entity.file_id,
        kind: entity.kind,
        source_url: entity.source_url.clone(),
        mime_type: entity.mime_type.clone(),
        crc32: entity.crc32.clone(),
        created_on: entity.created_on,
    })
}
