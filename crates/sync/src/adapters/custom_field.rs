//! Adapter for custom fields (legal under games only).
//!
//! Custom fields have no manifest id; identity is the field name scoped to
//! the owning game.

use uuid::Uuid;

use lanshelf_manifest::{CustomFieldManifest, RecordKind};
use lanshelf_store::CustomField;

use crate::SyncError;
use crate::adapters::{ExportCtx, ImportCtx, require_game};

const KIND: RecordKind = RecordKind::CustomField;

pub(crate) async fn exists(
    ctx: &ImportCtx<'_>,
    node: &CustomFieldManifest,
) -> Result<bool, SyncError> {
    let game = require_game(ctx.parent, KIND)?;
    let game_id = game.id;
    let found = ctx
        .store
        .custom_fields
        .first_where(&|f: &CustomField| f.game_id == game_id && f.name == node.name)
        .await?;
    Ok(found.is_some())
}

pub(crate) async fn add(
    ctx: &mut ImportCtx<'_>,
    node: &CustomFieldManifest,
) -> Result<(), SyncError> {
    let game = require_game(ctx.parent, KIND)?;
    ctx.store
        .custom_fields
        .add(CustomField {
            id: Uuid::new_v4(),
            game_id: game.id,
            name: node.name.clone(),
            value: node.value.clone(),
        })
        .await?;
    Ok(())
}

pub(crate) async fn update(
    ctx: &mut ImportCtx<'_>,
    node: &CustomFieldManifest,
) -> Result<(), SyncError> {
    let game = require_game(ctx.parent, KIND)?;
    let game_id = game.id;
    let existing = ctx
        .store
        .custom_fields
        .first_where(&|f: &CustomField| f.game_id == game_id && f.name == node.name)
        .await?
        .ok_or_else(|| SyncError::RecordVanished {
            kind: KIND,
            id: node.name.clone(),
        })?;

    ctx.store
        .custom_fields
        .update(CustomField {
            value: node.value.clone(),
            ..existing
        })
        .await?;
    Ok(())
}

pub(crate) async fn export(
    ctx: &mut ExportCtx<'_>,
    entity: &CustomField,
) -> Result<CustomFieldManifest, SyncError> {
    require_game(ctx.parent, KIND)?;
    Ok(CustomFieldManifest {
        name: entity.name.clone(),
        value: entity.value.clone(),
    })
}
