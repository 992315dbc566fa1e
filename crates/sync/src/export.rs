//! Export side of the sync engine: the mirror of import.
//!
//! The queue is seeded from the persisted unit's child collections, drained
//! into a manifest under construction (blob-bearing kinds pack their blob
//! into the container as a side effect), and the completed manifest is
//! written as the container's manifest entry on [`ExportContext::finish`].

use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use lanshelf_archive::{ArchiveBuilder, FILES_FOLDER};
use lanshelf_manifest::{IncludeFlags, Manifest, ManifestNode, UnitKind};
use lanshelf_store::{ContentStore, StorageLocations};

use crate::adapters::{
    ExportCtx, action, archive, custom_field, key, media, multiplayer, play_session, save,
    save_path, script, server_console, server_http_path,
};
use crate::events::SyncEvent;
use crate::job::{JobState, SyncSummary};
use crate::units::{
    ExportItem, ParentUnit, UnitRef, append_node, collect_export_items, load_unit, manifest_for,
};
use crate::SyncError;

/// Drives one export job: entity graph → manifest + blob container.
pub struct ExportContext {
    store: ContentStore,
    locations: Arc<dyn StorageLocations>,
    builder: ArchiveBuilder,
    parent: ParentUnit,
    manifest: Manifest,
    state: JobState<ExportItem>,
    events_tx: mpsc::UnboundedSender<SyncEvent>,
    events_rx: Option<mpsc::UnboundedReceiver<SyncEvent>>,
    cancel: CancellationToken,
}

impl std::fmt::Debug for ExportContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportContext").finish_non_exhaustive()
    }
}

impl ExportContext {
    /// Loads the unit to export and creates the container at `archive_path`.
    /// Fails with [`SyncError::UnitNotFound`] when the unit id is absent.
    pub async fn create(
        archive_path: &Path,
        store: ContentStore,
        locations: Arc<dyn StorageLocations>,
        unit: UnitRef,
    ) -> Result<Self, SyncError> {
        let parent = load_unit(&store, unit).await?;
        let builder = ArchiveBuilder::create(archive_path)?;
        let manifest = manifest_for(&parent);

        info!(
            unit = %parent.kind(),
            id = %parent.id(),
            name = parent.display_name(),
            "started content package export"
        );

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Ok(Self {
            store,
            locations,
            builder,
            parent,
            manifest,
            state: JobState::new(),
            events_tx,
            events_rx: Some(events_rx),
            cancel: CancellationToken::new(),
        })
    }

    /// The unit type being exported.
    pub fn unit_kind(&self) -> UnitKind {
        self.parent.kind()
    }

    /// The manifest assembled so far.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Takes the progress event receiver. Can only be called once.
    pub fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<SyncEvent>> {
        self.events_rx.take()
    }

    /// Returns a cancellation token for this job.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Records that failed, with their human-readable reasons.
    pub fn errors(&self) -> Vec<(String, String)> {
        self.state
            .errored()
            .iter()
            .map(|(item, reason)| (item.display_name(), reason.clone()))
            .collect()
    }

    /// Seeds the queue from the unit's persisted child collections, gated
    /// per kind by `flags`.
    pub async fn prepare_queue(&mut self, flags: IncludeFlags) -> Result<(), SyncError> {
        for item in collect_export_items(&self.store, &self.parent, flags).await? {
            self.state.enqueue(item);
        }
        info!(queued = self.state.queued(), "prepared export queue");
        Ok(())
    }

    /// Drains the queue one record at a time, accumulating exported nodes
    /// into the manifest. Same failure isolation as the import side.
    pub async fn drain(&mut self) -> SyncSummary {
        loop {
            if self.cancel.is_cancelled() {
                warn!(remaining = self.state.queued(), "export cancelled between records");
                break;
            }
            let Some(item) = self.state.pop() else {
                break;
            };

            let kind = item.kind();
            let name = item.display_name();
            match self.process(&item).await {
                Ok(()) => {
                    debug!(%kind, name, "record exported");
                    self.state.mark_processed(item);
                    let _ = self.events_tx.send(SyncEvent::RecordProcessed { kind, name });
                }
                Err(e) => {
                    let reason = e.record_reason("exporting", kind);
                    error!(%kind, name, reason, "record errored");
                    self.state.mark_errored(item, reason.clone());
                    let _ = self
                        .events_tx
                        .send(SyncEvent::RecordErrored { kind, name, reason });
                }
            }
        }

        let summary = self.state.summary();
        info!(
            processed = summary.processed,
            errored = summary.errored,
            remaining = summary.remaining,
            "export queue drained"
        );
        summary
    }

    /// Packs a server's working directory under `Files/`, writes the
    /// manifest entry, and closes the container.
    pub async fn finish(mut self) -> Result<(), SyncError> {
        if let ParentUnit::Server(server) = &self.parent
            && !server.working_directory.is_empty()
        {
            let workdir = Path::new(&server.working_directory);
            if workdir.is_dir() {
                let packed = self.builder.add_dir_tree(FILES_FOLDER, workdir)?;
                info!(packed, "packed working directory files");
            }
        }

        let bytes = self.manifest.to_vec()?;
        self.builder.finish(&bytes)?;
        info!(unit = %self.parent.kind(), id = %self.parent.id(), "content package written");
        Ok(())
    }

    /// Exports one entity through its adapter and files the resulting node
    /// into the manifest.
    async fn process(&mut self, item: &ExportItem) -> Result<(), SyncError> {
        let node = {
            let mut ctx = ExportCtx {
                store: &self.store,
                locations: self.locations.as_ref(),
                builder: &mut self.builder,
                parent: &self.parent,
            };
            match item {
                ExportItem::Action(e) => ManifestNode::Action(action::export(&mut ctx, e).await?),
                ExportItem::Archive(e) => {
                    ManifestNode::Archive(archive::export(&mut ctx, e).await?)
                }
                ExportItem::Collection(e) => ManifestNode::Collection(e.name.clone()),
                ExportItem::CustomField(e) => {
                    ManifestNode::CustomField(custom_field::export(&mut ctx, e).await?)
                }
                ExportItem::Developer(e) => ManifestNode::Developer(e.name.clone()),
                ExportItem::Engine(e) => ManifestNode::Engine(e.name.clone()),
                ExportItem::Genre(e) => ManifestNode::Genre(e.name.clone()),
                ExportItem::Key(e) => ManifestNode::Key(key::export(&mut ctx, e).await?),
                ExportItem::Media(e) => ManifestNode::Media(media::export(&mut ctx, e).await?),
                ExportItem::MultiplayerMode(e) => {
                    ManifestNode::MultiplayerMode(multiplayer::export(&mut ctx, e).await?)
                }
                ExportItem::Platform(e) => ManifestNode::Platform(e.name.clone()),
                ExportItem::PlaySession(e) => {
                    ManifestNode::PlaySession(play_session::export(&mut ctx, e).await?)
                }
                ExportItem::Publisher(e) => ManifestNode::Publisher(e.name.clone()),
                ExportItem::Save(e) => ManifestNode::Save(save::export(&mut ctx, e).await?),
                ExportItem::SavePath(e) => {
                    ManifestNode::SavePath(save_path::export(&mut ctx, e).await?)
                }
                ExportItem::Script(e) => ManifestNode::Script(script::export(&mut ctx, e).await?),
                ExportItem::ServerConsole(e) => {
                    ManifestNode::ServerConsole(server_console::export(&mut ctx, e).await?)
                }
                ExportItem::ServerHttpPath(e) => {
                    ManifestNode::ServerHttpPath(server_http_path::export(&mut ctx, e).await?)
                }
                ExportItem::Tag(e) => ManifestNode::Tag(e.name.clone()),
            }
        };

        append_node(&mut self.manifest, node)
    }
}
