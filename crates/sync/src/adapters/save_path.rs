//! Adapter for save paths (legal under games only).

use lanshelf_manifest::{RecordKind, SavePathManifest};
use lanshelf_store::SavePath;

use crate::SyncError;
use crate::adapters::{ExportCtx, ImportCtx, require_game};

const KIND: RecordKind = RecordKind::SavePath;

pub(crate) async fn exists(
    ctx: &ImportCtx<'_>,
    node: &SavePathManifest,
) -> Result<bool, SyncError> {
    let game = require_game(ctx.parent, KIND)?;
    let game_id = game.id;
    let found = ctx
        .store
        .save_paths
        .first_where(&|p: &SavePath| p.id == node.id && p.game_id == game_id)
        .await?;
    Ok(found.is_some())
}

pub(crate) async fn add(ctx: &mut ImportCtx<'_>, node: &SavePathManifest) -> Result<(), SyncError> {
    let game = require_game(ctx.parent, KIND)?;
    ctx.store
        .save_paths
        .add(SavePath {
            id: node.id,
            game_id: game.id,
            kind: node.kind,
            path: node.path.clone(),
            working_directory: node.working_directory.clone(),
            regex: node.regex,
        })
        .await?;
    Ok(())
}

pub(crate) async fn update(
    ctx: &mut ImportCtx<'_>,
    node: &SavePathManifest,
) -> Result<(), SyncError> {
    let game = require_game(ctx.parent, KIND)?;
    let game_id = game.id;
    let existing = ctx
        .store
        .save_paths
        .first_where(&|p: &SavePath| p.id == node.id && p.game_id == game_id)
        .await?
        .ok_or_else(|| SyncError::RecordVanished {
            kind: KIND,
            id: node.id.to_string(),
        })?;

    ctx.store
        .save_paths
        .update(SavePath {
            kind: node.kind,
            path: node.path.clone(),
            working_directory: node.working_directory.clone(),
            regex: node.regex,
            ..existing
        })
        .await?;
    Ok(())
}

pub(crate) async fn export(
    ctx: &mut ExportCtx<'_>,
    entity: &SavePath,
) -> Result<SavePathManifest, SyncError> {
    require_game(ctx.parent, KIND)?;
    Ok(SavePathManifest {
        id: entity.id,
        kind: entity.kind,
        path: entity.path.clone(),
        working_directory: entity.working_directory.clone(),
        regex: entity.regex,
    })
}
