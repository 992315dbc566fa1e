//! Adapter for server consoles (legal under servers only).

use lanshelf_manifest::{RecordKind, ServerConsoleManifest};
use lanshelf_store::ServerConsole;

use crate::SyncError;
use crate::adapters::{ExportCtx, ImportCtx, require_server};

const KIND: RecordKind = RecordKind::ServerConsole;

pub(crate) async fn exists(
    ctx: &ImportCtx<'_>,
    node: &ServerConsoleManifest,
) -> Result<bool, SyncError> {
    let server = require_server(ctx.parent, KIND)?;
    let server_id = server.id;
    let found = ctx
        .store
        .server_consoles
        .first_where(&|c: &ServerConsole| c.id == node.id && c.server_id == server_id)
        .await?;
    Ok(found.is_some())
}

pub(crate) async fn add(
    ctx: &mut ImportCtx<'_>,
    node: &ServerConsoleManifest,
) -> Result<(), SyncError> {
    let server = require_server(ctx.parent, KIND)?;
    ctx.store
        .server_consoles
        .add(ServerConsole {
            id: node.id,
            server_id: server.id,
            name: node.name.clone(),
            kind: node.kind,
            path: node.path.clone(),
            host: node.host.clone(),
            port: node.port,
        })
        .await?;
    Ok(())
}

pub(crate) async fn update(
    ctx: &mut ImportCtx<'_>,
    node: &ServerConsoleManifest,
) -> Result<(), SyncError> {
    let server = require_server(ctx.parent, KIND)?;
    let server_id = server.id;
    let existing = ctx
        .store
        .server_consoles
        .first_where(&|c: &ServerConsole| c.id == node.id && c.server_id == server_id)
        .await?
        .ok_or_else(|| SyncError::RecordVanished {
            kind: KIND,
            id: node.id.to_string(),
        })?;

    ctx.store
        .server_consoles
        .update(ServerConsole {
            name: node.name.clone(),
            kind: node.kind,
            path: node.path.clone(),
            host: node.host.clone(),
            port: node.port,
            ..existing
        })
        .await?;
    Ok(())
}

pub(crate) async fn export(
    ctx: &mut ExportCtx<'_>,
    entity: &ServerConsole,
) -> Result<ServerConsoleManifest, SyncError> {
    require_server(ctx.parent, KIND)?;
    Ok(ServerConsoleManifest {
        id: entity.id,
        name: entity.name.clone(),
        kind: entity.kind,
        path: entity.path.clone(),
        host: entity.host.clone(),
        port: entity.port,
    })
}
