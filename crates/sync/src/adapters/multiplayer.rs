//! Adapter for multiplayer modes (legal under games only).

use lanshelf_manifest::{MultiplayerModeManifest, RecordKind};
use lanshelf_store::MultiplayerMode;

use crate::SyncError;
use crate::adapters::{ExportCtx, ImportCtx, require_game};

const KIND: RecordKind = RecordKind::MultiplayerMode;

pub(crate) async fn exists(
    ctx: &ImportCtx<'_>,
    node: &MultiplayerModeManifest,
) -> Result<bool, SyncError> {
    let game = require_game(ctx.parent, KIND)?;
    let game_id = game.id;
    let found = ctx
        .store
        .multiplayer_modes
        .first_where(&|m: &MultiplayerMode| m.id == node.id && m.game_id == game_id)
        .await?;
    Ok(found.is_some())
}

pub(crate) async fn add(
    ctx: &mut ImportCtx<'_>,
    node: &MultiplayerModeManifest,
) -> Result<(), SyncError> {
    let game = require_game(ctx.parent, KIND)?;
    ctx.store
        .multiplayer_modes
        .add(MultiplayerMode {
            id: node.id,
            game_id: game.id,
            kind: node.kind,
            min_players: node.min_players,
            max_players: node.max_players,
            spectators: node.spectators,
            description: node.description.clone(),
            network_protocol: node.network_protocol.clone(),
        })
        .await?;
    Ok(())
}

pub(crate) async fn update(
    ctx: &mut ImportCtx<'_>,
    node: &MultiplayerModeManifest,
) -> Result<(), SyncError> {
    let game = require_game(ctx.parent, KIND)?;
    let game_id = game.id;
    let existing = ctx
        .store
        .multiplayer_modes
        .first_where(&|m: &MultiplayerMode| m.id == node.id && m.game_id == game_id)
        .await?
        .ok_or_else(|| SyncError::RecordVanished {
            kind: KIND,
            id: node.id.to_string(),
        })?;

    ctx.store
        .multiplayer_modes
        .update(MultiplayerMode {
            kind: node.kind,
            min_players: node.min_players,
            max_players: node.max_players,
            spectators: node.spectators,
            description: node.description.clone(),
            network_protocol: node.network_protocol.clone(),
            ..existing
        })
        .await?;
    Ok(())
}

pub(crate) async fn export(
    ctx: &mut ExportCtx<'_>,
    entity: &MultiplayerMode,
) -> Result<MultiplayerModeManifest, SyncError> {
    require_game(ctx.parent, KIND)?;
    Ok(MultiplayerModeManifest {
        id: entity.id,
        kind: entity.kind,
        min_players: entity.min_players,
        max_players: entity.max_players,
        spectators: entity.spectators,
        description: entity.description.clone(),
        network_protocol: entity.network_protocol.clone(),
    })
}
