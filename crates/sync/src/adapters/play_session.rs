//! Adapter for play sessions (legal under games only).

use lanshelf_manifest::{PlaySessionManifest, RecordKind};
use lanshelf_store::PlaySession;

use crate::SyncError;
use crate::adapters::{ExportCtx, ImportCtx, require_game};

const KIND: RecordKind = RecordKind::PlaySession;

pub(crate) async fn exists(
    ctx: &ImportCtx<'_>,
    node: &PlaySessionManifest,
) -> Result<bool, SyncError> {
    let game = require_game(ctx.parent, KIND)?;
    let game_id = game.id;
    let found = ctx
        .store
        .play_sessions
        .first_where(&|p: &PlaySession| p.id == node.id && p.game_id == game_id)
        .await?;
    Ok(found.is_some())
}

pub(crate) async fn add(
    ctx: &mut ImportCtx<'_>,
    node: &PlaySessionManifest,
) -> Result<(), SyncError> {
    let game = require_game(ctx.parent, KIND)?;
    ctx.store
        .play_sessions
        .add(PlaySession {
            id: node.id,
            game_id: game.id,
            start: node.start,
            end: node.end,
        })
        .await?;
    Ok(())
}

pub(crate) async fn update(
    ctx: &mut ImportCtx<'_>,
    node: &PlaySessionManifest,
) -> Result<(), SyncError> {
    let game = require_game(ctx.parent, KIND)?;
    let game_id = game.id;
    let existing = ctx
        .store
        .play_sessions
        .first_where(&|p: &PlaySession| p.id == node.id && p.game_id == game_id)
        .await?
        .ok_or_else(|| SyncError::RecordVanished {
            kind: KIND,
            id: node.id.to_string(),
        })?;

    ctx.store
        .play_sessions
        .update(PlaySession {
            start: node.start,
            end: node.end,
            ..existing
        })
        .await?;
    Ok(())
}

pub(crate) async fn export(
    ctx: &mut ExportCtx<'_>,
    entity: &PlaySession,
) -> Result<PlaySessionManifest, SyncError> {
    require_game(ctx.parent, KIND)?;
    Ok(PlaySessionManifest {
        id: entity.id,
        start: entity.start,
        end: entity.end,
    })
}
