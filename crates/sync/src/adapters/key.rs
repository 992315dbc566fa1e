//! Adapter for product keys (legal under games only).

use lanshelf_manifest::{KeyManifest, RecordKind};
use lanshelf_store::Key;

use crate::SyncError;
use crate::adapters::{ExportCtx, ImportCtx, require_game};

const KIND: RecordKind = RecordKind::Key;

pub(crate) async fn exists(ctx: &ImportCtx<'_>, node: &KeyManifest) -> Result<bool, SyncError> {
    let game = require_game(ctx.parent, KIND)?;
    let game_id = game.id;
    let found = ctx
        .store
        .keys
        .first_where(&|k: &Key| k.id == node.id && k.game_id == game_id)
        .await?;
    Ok(found.is_some())
}

pub(crate) async fn add(ctx: &mut ImportCtx<'_>, node: &KeyManifest) -> Result<(), SyncError> {
    let game = require_game(ctx.parent, KIND)?;
    ctx.store
        .keys
        .add(Key {
            id: node.id,
            game_id: game.id,
            value: node.value.clone(),
            allocation_method: node.allocation_method,
            claimed_by_mac_address: node.claimed_by_mac_address.clone(),
            claimed_by_ipv4_address: node.claimed_by_ipv4_address.clone(),
            claimed_by_computer_name: node.claimed_by_computer_name.clone(),
            claimed_on: node.claimed_on,
        })
        .await?;
    Ok(())
}

pub(crate) async fn update(ctx: &mut ImportCtx<'_>, node: &KeyManifest) -> Result<(), SyncError> {
    let game = require_game(ctx.parent, KIND)?;
    let game_id = game.id;
    let existing = ctx
        .store
        .keys
        .first_where(&|k: &Key| k.id == node.id && k.game_id == game_id)
        .await?
        .ok_or_else(|| SyncError::RecordVanished {
            kind: KIND,
            id: node.id.to_string(),
        })?;

    ctx.store
        .keys
        .update(Key {
            value: node.value.clone(),
            allocation_method: node.allocation_method,
            claimed_by_mac_address: node.claimed_by_mac_address.clone(),
            claimed_by_ipv4_address: node.claimed_by_ipv4_address.clone(),
            claimed_by_computer_name: node.claimed_by_computer_name.clone(),
            claimed_on: node.claimed_on,
            ..existing
        })
        .await?;
    Ok(())
}

pub(crate) async fn export(ctx: &mut ExportCtx<'_>, entity: &Key) -> Result<KeyManifest, SyncError> {
    require_game(ctx.parent, KIND)?;
    Ok(KeyManifest {
        id: entity.id,
        value: entity.value.clone(),
        allocation_method: entity.allocation_method,
        claimed_by_mac_address: entity.claimed_by_mac_address.clone(),
        claimed_by_ipv4_address: entity.claimed_by_ipv4_address.clone(),
        claimed_by_computer_name: entity.claimed_by_computer_name.clone(),
        claimed_on: entity.claimed_on,
    })
}
