//! Adapter for server HTTP paths (legal under servers only).

use lanshelf_manifest::{RecordKind, ServerHttpPathManifest};
use lanshelf_store::ServerHttpPath;

use crate::SyncError;
use crate::adapters::{ExportCtx, ImportCtx, require_server};

const KIND: RecordKind = RecordKind::ServerHttpPath;

pub(crate) async fn exists(
    ctx: &ImportCtx<'_>,
    node: &ServerHttpPathManifest,
) -> Result<bool, SyncError> {
    let server = require_server(ctx.parent, KIND)?;
    let server_id = server.id;
    let found = ctx
        .store
        .server_http_paths
        .first_where(&|p: &ServerHttpPath| p.id == node.id && p.server_id == server_id)
        .await?;
    Ok(found.is_some())
}

pub(crate) async fn add(
    ctx: &mut ImportCtx<'_>,
    node: &ServerHttpPathManifest,
) -> Result<(), SyncError> {
    let server = require_server(ctx.parent, KIND)?;
    ctx.store
        .server_http_paths
        .add(ServerHttpPath {
            id: node.id,
            server_id: server.id,
            local_path: node.local_path.clone(),
            path: node.path.clone(),
        })
        .await?;
    Ok(())
}

pub(crate) async fn update(
    ctx: &mut ImportCtx<'_>,
    node: &ServerHttpPathManifest,
) -> Result<(), SyncError> {
    let server = require_server(ctx.parent, KIND)?;
    let server_id = server.id;
    let existing = ctx
        .store
        .server_http_paths
        .first_where(&|p: &ServerHttpPath| p.id == node.id && p.server_id == server_id)
        .await?
        .ok_or_else(|| SyncError::RecordVanished {
            kind: KIND,
            id: node.id.to_string(),
        })?;

    ctx.store
        .server_http_paths
        .update(ServerHttpPath {
            local_path: node.local_path.clone(),
            path: node.path.clone(),
            ..existing
        })
        .await?;
    Ok(())
}

pub(crate) async fn export(
    ctx: &mut ExportCtx<'_>,
    entity: &ServerHttpPath,
) -> Result<ServerHttpPathManifest, SyncError> {
    require_server(ctx.parent, KIND)?;
    Ok(ServerHttpPathManifest {
        id: entity.id,
        local_path: entity.local_path.clone(),
        path: entity.path.clone(),
    })
}
