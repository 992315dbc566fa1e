//! Adapter for launch actions (legal under games and servers).

use lanshelf_manifest::{ActionManifest, RecordKind};
use lanshelf_store::Action;

use crate::SyncError;
use crate::adapters::{ExportCtx, ImportCtx, require_action_parent};

const KIND: RecordKind = RecordKind::Action;

pub(crate) async fn exists(ctx: &ImportCtx<'_>, node: &ActionManifest) -> Result<bool, SyncError> {
    let (game_id, server_id) = require_action_parent(ctx.parent, KIND)?;
    let found = ctx
        .store
        .actions
        .first_where(&|a: &Action| {
            a.id == node.id && a.game_id == game_id && a.server_id == server_id
        })
        .await?;
    Ok(found.is_some())
}

pub(crate) async fn add(ctx: &mut ImportCtx<'_>, node: &ActionManifest) -> Result<(), SyncError> {
    let (game_id, server_id) = require_action_parent(ctx.parent, KIND)?;
    ctx.store
        .actions
        .add(Action {
            id: node.id,
            game_id,
            server_id,
            name: node.name.clone(),
            arguments: node.arguments.clone(),
            path: node.path.clone(),
            working_directory: node.working_directory.clone(),
            primary_action: node.primary_action,
            sort_order: node.sort_order,
        })
        .await?;
    Ok(())
}

pub(crate) async fn update(ctx: &mut ImportCtx<'_>, node: &ActionManifest) -> Result<(), SyncError> {
    let (game_id, server_id) = require_action_parent(ctx.parent, KIND)?;
    let existing = ctx
        .store
        .actions
        .first_where(&|a: &Action| {
            a.id == node.id && a.game_id == game_id && a.server_id == server_id
        })
        .await?
        .ok_or_else(|| SyncError::RecordVanished {
            kind: KIND,
            id: node.id.to_string(),
        })?;

    ctx.store
        .actions
        .update(Action {
            name: node.name.clone(),
            arguments: node.arguments.clone(),
            path: node.path.clone(),
            working_directory: node.working_directory.clone(),
            primary_action: node.primary_action,
            sort_order: node.sort_order,
            ..existing
        })
        .await?;
    Ok(())
}

pub(crate) async fn export(
    ctx: &mut ExportCtx<'_>,
    entity: &Action,
) -> Result<ActionManifest, SyncError> {
    require_action_parent(ctx.parent, KIND)?;
    Ok(ActionManifest {
        id: entity.id,
        name: entity.name.clone(),
        arguments: entity.arguments.clone(),
        path: entity.path.clone(),
        working_directory: entity.working_directory.clone(),
        primary_action: entity.primary_action,
        sort_order: entity.sort_order,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil;
    use lanshelf_store::{ContentStore, FixedRoots};
    use uuid::Uuid;

    fn node() -> ActionManifest {
        ActionManifest {
            id: Uuid::new_v4(),
            name: "Play".into(),
            path: "bin/game".into(),
            primary_action: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn add_then_exists_then_update() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContentStore::in_memory();
        let locations = FixedRoots::new(dir.path());
        let mut archive = testutil::archive_with(dir.path(), &[]);
        let parent = testutil::game_parent(&store, "Quake").await;
        let mut ctx = ImportCtx {
            store: &store,
            locations: &locations,
            archive: &mut archive,
            parent: &parent,
        };

        let mut action = node();
        assert!(!exists(&ctx, &action).await.unwrap());
        add(&mut ctx, &action).await.unwrap();
        assert!(exists(&ctx, &action).await.unwrap());

        action.name = "Launch".into();
        update(&mut ctx, &action).await.unwrap();

        let stored = store.actions.get(action.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Launch");
        assert_eq!(stored.game_id, Some(parent.id()));
        assert_eq!(store.actions.all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rejected_under_redistributable() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContentStore::in_memory();
        let locations = FixedRoots::new(dir.path());
        let mut archive = testutil::archive_with(dir.path(), &[]);
        let parent = testutil::redistributable_parent(&store, "DirectX").await;
        let mut ctx = ImportCtx {
            store: &store,
            locations: &locations,
            archive: &mut archive,
            parent: &parent,
        };

        let err = add(&mut ctx, &node()).await.unwrap_err();
        assert!(matches!(err, SyncError::ParentMismatch { .. }));
        assert!(store.actions.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn scoped_to_parent_unit() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContentStore::in_memory();
        let locations = FixedRoots::new(dir.path());
        let mut archive = testutil::archive_with(dir.path(), &[]);

        let game = testutil::game_parent(&store, "Quake").await;
        let mut ctx = ImportCtx {
            store: &store,
            locations: &locations,
            archive: &mut archive,
            parent: &game,
        };
        let action = node();
        add(&mut ctx, &action).await.unwrap();

        // Same record id under a different unit does not exist.
        let other = testutil::server_parent(&store, "srcds", "").await;
        let ctx = ImportCtx {
            store: &store,
            locations: &locations,
            archive: &mut archive,
            parent: &other,
        };
        assert!(!exists(&ctx, &action).await.unwrap());
    }
}
