//! Adapter for automation scripts (legal under every unit type).
//!
//! The blob is UTF-8 script text; it lives on the entity's `contents` field
//! rather than on disk, so no storage location is involved.

use uuid::Uuid;

use lanshelf_manifest::{RecordKind, ScriptManifest};
use lanshelf_store::Script;

use crate::SyncError;
use crate::adapters::{ExportCtx, ImportCtx, blob_err, script_parent};

const KIND: RecordKind = RecordKind::Script;

fn entry_path(id: Uuid) -> String {
    format!("Scripts/{id}")
}

pub(crate) async fn exists(ctx: &ImportCtx<'_>, node: &ScriptManifest) -> Result<bool, SyncError> {
    let (game_id, redistributable_id, server_id) = script_parent(ctx.parent);
    let found = ctx
        .store
        .scripts
        .first_where(&|s: &Script| {
            s.id == node.id
                && s.game_id == game_id
                && s.redistributable_id == redistributable_id
                && s.server_id == server_id
        })
        .await?;
    Ok(found.is_some())
}

pub(crate) async fn add(ctx: &mut ImportCtx<'_>, node: &ScriptManifest) -> Result<(), SyncError> {
    let (game_id, redistributable_id, server_id) = script_parent(ctx.parent);

    let bytes = ctx
        .archive
        .read_entry(&entry_path(node.id))
        .map_err(blob_err)?;
    let contents = String::from_utf8_lossy(&bytes).into_owned();

    ctx.store
        .scripts
        .add(Script {
            id: node.id,
            game_id,
            redistributable_id,
            server_id,
            kind: node.kind,
            name: node.name.clone(),
            description: node.description.clone(),
            requires_admin: node.requires_admin,
            contents,
            created_on: node.created_on,
        })
        .await?;
    Ok(())
}

pub(crate) async fn update(ctx: &mut ImportCtx<'_>, node: &ScriptManifest) -> Result<(), SyncError> {
    let (game_id, redistributable_id, server_id) = script_parent(ctx.parent);
    let existing = ctx
        .store
        .scripts
        .first_where(&|s: &Script| {
            s.id == node.id
                && s.game_id == game_id
                && s.redistributable_id == redistributable_id
                && s.server_id == server_id
        })
        .await?
        .ok_or_else(|| SyncError::RecordVanished {
            kind: KIND,
            id: node.id.to_string(),
        })?;

    let bytes = ctx
        .archive
        .read_entry(&entry_path(node.id))
        .map_err(blob_err)?;
    let contents = String::from_utf8_lossy(&bytes).into_owned();

    ctx.store
        .scripts
        .update(Script {
            kind: node.kind,
            name: node.name.clone(),
            description: node.description.clone(),
            requires_admin: node.requires_admin,
            contents,
            created_on: node.created_on,
            ..existing
        })
        .await?;
    Ok(())
}

pub(crate) async fn export(
    ctx: &mut ExportCtx<'_>,
    entity: &Script,
) -> Result<ScriptManifest, SyncError> {
    ctx.builder
        .add_entry(&entry_path(entity.id), entity.contents.as_bytes())?;

    Ok(ScriptManifest {
        id: entity.id,
        kind: entity.kind,
        name: entity.name.clone(),
        description: entity.description.clone(),
        requires_admin: entity.requires_admin,
        created_on: entity.created_on,
    })
}
