//! Adapter for save snapshots (legal under games only).
//!
//! Save blobs live at `{save root}/{game_id}/{save_id}`; the path is derived
//! from stable ids, so an update replaces the file in place (atomically, via
//! the extractor's write-then-rename).

use uuid::Uuid;

use lanshelf_manifest::{RecordKind, SaveManifest};
use lanshelf_store::{Save, StorageKind};

use crate::SyncError;
use crate::adapters::{ExportCtx, ImportCtx, blob_err, require_game};

const KIND: RecordKind = RecordKind::Save;

fn entry_path(id: Uuid) -> String {
    format!("Saves/{id}")
}

pub(crate) async fn exists(ctx: &ImportCtx<'_>, node: &SaveManifest) -> Result<bool, SyncError> {
    let game = require_game(ctx.parent, KIND)?;
    let game_id = game.id;
    let found = ctx
        .store
        .saves
        .first_where(&|s: &Save| s.id == node.id && s.game_id == game_id)
        .await?;
    Ok(found.is_some())
}

pub(crate) async fn add(ctx: &mut ImportCtx<'_>, node: &SaveManifest) -> Result<(), SyncError> {
    let game = require_game(ctx.parent, KIND)?;

    let dest = ctx
        .locations
        .root(StorageKind::Save)
        .join(game.id.to_string())
        .join(node.id.to_string());
    let written = ctx
        .archive
        .extract_entry(&entry_path(node.id), &dest)
        .map_err(blob_err)?;

    ctx.store
        .saves
        .add(Save {
            id: node.id,
            game_id: game.id,
            user_name: node.user_name.clone(),
            size: written as i64,
            created_on: node.created_on,
        })
        .await?;
    Ok(())
}

pub(crate) async fn update(ctx: &mut ImportCtx<'_>, node: &SaveManifest) -> Result<(), SyncError> {
    let game = require_game(ctx.parent, KIND)?;
    let game_id = game.id;
    let existing = ctx
        .store
        .saves
        .first_where(&|s: &Save| s.id == node.id && s.game_id == game_id)
        .await?
        .ok_or_else(|| SyncError::RecordVanished {
            kind: KIND,
            id: node.id.to_string(),
        })?;

    let dest = ctx
        .locations
        .root(StorageKind::Save)
        .join(game_id.to_string())
        .join(node.id.to_string());
    let written = ctx
        .archive
        .extract_entry(&entry_path(node.id), &dest)
        .map_err(blob_err)?;

    ctx.store
        .saves
        .update(Save {
            user_name: node.user_name.clone(),
            size: written as i64,
            created_on: node.created_on,
            ..existing
        })
        .await?;
    Ok(())
}

pub(crate) async fn export(
    ctx: &mut ExportCtx<'_>,
    entity: &Save,
) -> Result<SaveManifest, SyncError> {
    require_game(ctx.parent, KIND)?;

    let source = ctx
        .locations
        .root(StorageKind::Save)
        .join(entity.game_id.to_string())
        .join(entity.id.to_string());
    ctx.builder.add_file(&entry_path(entity.id), &source)?;

    Ok(SaveManifest {
        id: entity.id,
        user_name: entity.user_name.clone(),
        size: entity.size,
        created_on: entity.created_on,
    })
}
