//! Import side of the sync engine.
//!
//! One [`ImportContext`] is one job: it owns the archive handle, the work
//! queue, and the processed/errored tracking for a single import run.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use lanshelf_archive::{ContentArchive, FILES_FOLDER};
use lanshelf_manifest::{IncludeFlags, Manifest, ManifestNode, UnitKind};
use lanshelf_store::{ContentStore, StorageLocations};

use crate::adapters::{
    ImportCtx, action, archive, custom_field, key, media, multiplayer, play_session, save,
    save_path, script, server_console, server_http_path, shared,
};
use crate::adapters::shared::CompanyRole;
use crate::events::SyncEvent;
use crate::job::{ImportItemInfo, JobState, SyncSummary};
use crate::units::{ParentUnit, resolve_unit, selected_nodes, all_nodes};
use crate::SyncError;

/// Drives one import job to completion without ever halting on a single
/// record's failure.
pub struct ImportContext {
    store: ContentStore,
    locations: Arc<dyn StorageLocations>,
    archive: ContentArchive,
    manifest: Manifest,
    parent: Option<ParentUnit>,
    state: JobState<ManifestNode>,
    events_tx: mpsc::UnboundedSender<SyncEvent>,
    events_rx: Option<mpsc::UnboundedReceiver<SyncEvent>>,
    cancel: CancellationToken,
}

impl std::fmt::Debug for ImportContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImportContext").finish_non_exhaustive()
    }
}

impl ImportContext {
    /// Opens the content package at `archive_path` and classifies its
    /// manifest. Fails with [`SyncError::UnknownManifestKind`] when no known
    /// unit shape matches — nothing is queued or written in that case.
    pub fn open(
        archive_path: &Path,
        store: ContentStore,
        locations: Arc<dyn StorageLocations>,
    ) -> Result<Self, SyncError> {
        let mut archive = ContentArchive::open(archive_path)?;
        let bytes = archive.manifest_bytes()?;
        let manifest =
            Manifest::from_slice(&bytes).map_err(|_| SyncError::UnknownManifestKind)?;

        info!(
            unit = %manifest.unit_kind(),
            id = %manifest.id(),
            name = manifest.display_name(),
            "opened content package"
        );

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Ok(Self {
            store,
            locations,
            archive,
            manifest,
            parent: None,
            state: JobState::new(),
            events_tx,
            events_rx: Some(events_rx),
            cancel: CancellationToken::new(),
        })
    }

    /// Flat preview of every child record (kind, display name, blob size),
    /// for progress totals before work begins. Never extracts anything.
    pub fn item_infos(&mut self) -> Vec<ImportItemInfo> {
        all_nodes(&self.manifest)
            .into_iter()
            .map(|node| {
                let size = node
                    .blob_path()
                    .and_then(|path| self.archive.entry_size(&path))
                    .unwrap_or(0);
                ImportItemInfo {
                    kind: node.kind(),
                    name: node.display_name(),
                    size,
                }
            })
            .collect()
    }

    /// The classified manifest.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// The unit type being imported.
    pub fn unit_kind(&self) -> UnitKind {
        self.manifest.unit_kind()
    }

    /// The resolved parent unit, available after [`Self::prepare_queue`].
    pub fn parent(&self) -> Option<&ParentUnit> {
        self.parent.as_ref()
    }

    /// Takes the progress event receiver. Can only be called once.
    pub fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<SyncEvent>> {
        self.events_rx.take()
    }

    /// Returns a cancellation token for this job. Cancellation is honored
    /// between records, never mid-record.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Records that failed, with their human-readable reasons.
    pub fn errors(&self) -> &[(ManifestNode, String)] {
        self.state.errored()
    }

    /// Records processed so far.
    pub fn processed(&self) -> &[ManifestNode] {
        self.state.processed()
    }

    /// Resolves (get-or-create) the top-level unit and queues every child
    /// record selected by `flags`.
    ///
    /// The unit itself is not queued: it is resolved synchronously and must
    /// succeed before any child is processed, since every adapter scopes its
    /// work to the resolved parent.
    pub async fn prepare_queue(&mut self, flags: IncludeFlags) -> Result<(), SyncError> {
        let parent = resolve_unit(&self.store, &self.manifest).await?;
        self.parent = Some(parent);

        for node in selected_nodes(&self.manifest, flags) {
            self.state.enqueue(node);
        }
        info!(queued = self.state.queued(), "prepared import queue");
        Ok(())
    }

    /// Drains the queue one record at a time.
    ///
    /// A failed record moves to the errored map with its reason and
    /// processing continues with the next record; record-level failures
    /// never propagate out of here. Cancellation is checked at the top of
    /// each iteration and leaves the remaining records queued.
    pub async fn drain(&mut self) -> SyncSummary {
        loop {
            if self.cancel.is_cancelled() {
                warn!(remaining = self.state.queued(), "import cancelled between records");
                break;
            }
            let Some(node) = self.state.pop() else {
                break;
            };

            let kind = node.kind();
            let name = node.display_name();
            match self.process(&node).await {
                Ok(()) => {
                    debug!(%kind, name, "record processed");
                    self.state.mark_processed(node);
                    let _ = self.events_tx.send(SyncEvent::RecordProcessed { kind, name });
                }
                Err(e) => {
                    let reason = e.record_reason("importing", kind);
                    error!(%kind, name, reason, "record errored");
                    self.state.mark_errored(node, reason.clone());
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
            "import queue drained"
        );
        summary
    }

    /// Mirrors the package's `Files/` tree verbatim into a server's working
    /// directory, creating directories on demand. A no-op for games and
    /// redistributables. Returns the number of files written.
    pub async fn sync_working_files(&mut self) -> Result<usize, SyncError> {
        let parent = self.parent.as_ref().ok_or(SyncError::NotPrepared)?;
        let ParentUnit::Server(server) = parent else {
            return Ok(0);
        };
        if server.working_directory.is_empty() {
            warn!("server has no working directory; skipping Files/ entries");
            return Ok(0);
        }

        let prefix = format!("{FILES_FOLDER}/");
        let mut written = 0;
        for entry in self.archive.entries_under(FILES_FOLDER) {
            let relative = entry.strip_prefix(&prefix).unwrap_or(&entry);
            if relative.split('/').any(|part| part == ".." || part.is_empty()) {
                warn!(entry, "skipping entry with unsafe path");
                continue;
            }
            let dest = Path::new(&server.working_directory).join(relative);
            self.archive.extract_entry(&entry, &dest)?;
            written += 1;
        }
        info!(written, "mirrored working directory files");
        Ok(written)
    }

    /// Runs one record through its adapter: guard, existence check, then
    /// update or add.
    async fn process(&mut self, node: &ManifestNode) -> Result<(), SyncError> {
        let parent = self.parent.as_ref().ok_or(SyncError::NotPrepared)?;
        let mut ctx = ImportCtx {
            store: &self.store,
            locations: self.locations.as_ref(),
            archive: &mut self.archive,
            parent,
        };

        match node {
            ManifestNode::Action(m) => {
                if action::exists(&ctx, m).await? {
                    action::update(&mut ctx, m).await
                } else {
                    action::add(&mut ctx, m).await
                }
            }
            ManifestNode::Archive(m) => {
                if archive::exists(&ctx, m).await? {
                    archive::update(&mut ctx, m).await
                } else {
                    archive::add(&mut ctx, m).await
                }
            }
            ManifestNode::Collection(name) => {
                let repo = ctx.store.collections.as_ref();
                if shared::exists(&ctx, repo, name).await? {
                    shared::update(&ctx, repo, name).await
                } else {
                    shared::add(&ctx, repo, name).await
                }
            }
            ManifestNode::CustomField(m) => {
                if custom_field::exists(&ctx, m).await? {
                    custom_field::update(&mut ctx, m).await
                } else {
                    custom_field::add(&mut ctx, m).await
                }
            }
            ManifestNode::Developer(name) => {
                if shared::company_exists(&ctx, CompanyRole::Developer, name).await? {
                    shared::company_update(&ctx, CompanyRole::Developer, name).await
                } else {
                    shared::company_add(&ctx, CompanyRole::Developer, name).await
                }
            }
            ManifestNode::Engine(name) => {
                let repo = ctx.store.engines.as_ref();
                if shared::exists(&ctx, repo, name).await? {
                    shared::update(&ctx, repo, name).await
                } else {
                    shared::add(&ctx, repo, name).await
                }
            }
            ManifestNode::Genre(name) => {
                let repo = ctx.store.genres.as_ref();
                if shared::exists(&ctx, repo, name).await? {
                    shared::update(&ctx, repo, name).await
                } else {
                    shared::add(&ctx, repo, name).await
                }
            }
            ManifestNode::Key(m) => {
                if key::exists(&ctx, m).await? {
                    key::update(&mut ctx, m).await
                } else {
                    key::add(&mut ctx, m).await
                }
            }
            ManifestNode::Media(m) => {
                if media::exists(&ctx, m).await? {
                    media::update(&mut ctx, m).await
                } else {
                    media::add(&mut ctx, m).await
                }
            }
            ManifestNode::MultiplayerMode(m) => {
                if multiplayer::exists(&ctx, m).await? {
                    multiplayer::update(&mut ctx, m).await
                } else {
                    multiplayer::add(&mut ctx, m).await
                }
            }
            ManifestNode::Platform(name) => {
                let repo = ctx.store.platforms.as_ref();
                if shared::exists(&ctx, repo, name).await? {
                    shared::update(&ctx, repo, name).await
                } else {
                    shared::add(&ctx, repo, name).await
                }
            }
            ManifestNode::PlaySession(m) => {
                if play_session::exists(&ctx, m).await? {
                    play_session::update(&mut ctx, m).await
                } else {
                    play_session::add(&mut ctx, m).await
                }
            }
            ManifestNode::Publisher(name) => {
                if shared::company_exists(&ctx, CompanyRole::Publisher, name).await? {
                    shared::company_update(&ctx, CompanyRole::Publisher, name).await
                } else {
                    shared::company_add(&ctx, CompanyRole::Publisher, name).await
                }
            }
            ManifestNode::Save(m) => {
                if save::exists(&ctx, m).await? {
                    save::update(&mut ctx, m).await
                } else {
                    save::add(&mut ctx, m).await
                }
            }
            ManifestNode::SavePath(m) => {
                if save_path::exists(&ctx, m).await? {
                    save_path::update(&mut ctx, m).await
                } else {
                    save_path::add(&mut ctx, m).await
                }
            }
            ManifestNode::Script(m) => {
                if script::exists(&ctx, m).await? {
                    script::update(&mut ctx, m).await
                } else {
                    script::add(&mut ctx, m).await
                }
            }
            ManifestNode::ServerConsole(m) => {
                if server_console::exists(&ctx, m).await? {
                    server_console::update(&mut ctx, m).await
                } else {
                    server_console::add(&mut ctx, m).await
                }
            }
            ManifestNode::ServerHttpPath(m) => {
                if server_http_path::exists(&ctx, m).await? {
                    server_http_path::update(&mut ctx, m).await
                } else {
                    server_http_path::add(&mut ctx, m).await
                }
            }
            ManifestNode::Tag(name) => {
                let repo = ctx.store.tags.as_ref();
                if shared::exists(&ctx, repo, name).await? {
                    shared::update(&ctx, repo, name).await
                } else {
                    shared::add(&ctx, repo, name).await
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lanshelf_archive::ArchiveBuilder;
    use lanshelf_manifest::{
        ArchiveManifest, GameManifest, KeyManifest, MediaManifest, RecordKind,
    };
    use lanshelf_store::{FixedRoots, Tag};
    use std::path::PathBuf;
    use uuid::Uuid;

    fn write_package(dir: &Path, manifest: &Manifest, entries: &[(String, &[u8])]) -> PathBuf {
        let path = dir.join("pkg.zip");
        let mut builder = ArchiveBuilder::create(&path).unwrap();
        for (name, data) in entries {
            builder.add_entry(name, data).unwrap();
        }
        builder.finish(&manifest.to_vec().unwrap()).unwrap();
        path
    }

    fn game_with_tag_and_archive() -> (Manifest, Uuid) {
        let archive_id = Uuid::new_v4();
        let manifest = Manifest::Game(GameManifest {
            id: Uuid::new_v4(),
            title: "Quake".into(),
            tags: vec!["Action".into()],
            archives: vec![ArchiveManifest {
                id: archive_id,
                version: "1.0".into(),
                ..Default::default()
            }],
            ..Default::default()
        });
        (manifest, archive_id)
    }

    #[tokio::test]
    async fn concrete_import_scenario() {
        // Archive contains a game with one tag and one 10-byte payload;
        // importing with {Archives, Tags} yields processed = 2, errored = 0.
        let dir = tempfile::tempdir().unwrap();
        let (manifest, archive_id) = game_with_tag_and_archive();
        let path = write_package(
            dir.path(),
            &manifest,
            &[(format!("Archives/{archive_id}"), b"0123456789".as_slice())],
        );

        let store = ContentStore::in_memory();
        let locations = Arc::new(FixedRoots::new(dir.path()));
        let mut job = ImportContext::open(&path, store.clone(), locations).unwrap();
        job.prepare_queue(IncludeFlags::ARCHIVES | IncludeFlags::TAGS)
            .await
            .unwrap();
        let summary = job.drain().await;

        assert_eq!(summary.processed, 2);
        assert_eq!(summary.errored, 0);
        assert_eq!(summary.remaining, 0);

        let game_id = manifest.id();
        assert!(store.games.exists(game_id).await.unwrap());
        let tag = store
            .tags
            .first_where(&|t: &Tag| t.name == "Action")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(tag.game_ids, vec![game_id]);
        let payload = store.archives.get(archive_id).await.unwrap().unwrap();
        assert_eq!(payload.compressed_size, 10);
    }

    #[tokio::test]
    async fn flags_gate_queued_kinds() {
        let dir = tempfile::tempdir().unwrap();
        let (manifest, archive_id) = game_with_tag_and_archive();
        let path = write_package(
            dir.path(),
            &manifest,
            &[(format!("Archives/{archive_id}"), b"xx".as_slice())],
        );

        let store = ContentStore::in_memory();
        let locations = Arc::new(FixedRoots::new(dir.path()));
        let mut job = ImportContext::open(&path, store.clone(), locations).unwrap();
        job.prepare_queue(IncludeFlags::TAGS).await.unwrap();
        let summary = job.drain().await;

        assert_eq!(summary.processed, 1);
        assert!(store.archives.all().await.unwrap().is_empty());
        // The unit itself is still resolved even with a narrow mask.
        assert!(store.games.exists(manifest.id()).await.unwrap());
    }

    #[tokio::test]
    async fn missing_blob_is_isolated() {
        // One blob entry deliberately removed: N-1 processed, 1 errored.
        let dir = tempfile::tempdir().unwrap();
        let media_id = Uuid::new_v4();
        let archive_id = Uuid::new_v4();
        let manifest = Manifest::Game(GameManifest {
            id: Uuid::new_v4(),
            title: "Quake".into(),
            tags: vec!["Action".into()],
            media: vec![MediaManifest {
                id: media_id,
                file_id: Uuid::new_v4(),
                ..Default::default()
            }],
            archives: vec![ArchiveManifest {
                id: archive_id,
                ..Default::default()
            }],
            ..Default::default()
        });
        // Note: no Media/{media_id} entry.
        let path = write_package(
            dir.path(),
            &manifest,
            &[(format!("Archives/{archive_id}"), b"payload".as_slice())],
        );

        let store = ContentStore::in_memory();
        let locations = Arc::new(FixedRoots::new(dir.path()));
        let mut job = ImportContext::open(&path, store.clone(), locations).unwrap();
        let mut events = job.take_events().unwrap();
        job.prepare_queue(IncludeFlags::all()).await.unwrap();
        let summary = job.drain().await;

        assert_eq!(summary.processed, 2);
        assert_eq!(summary.errored, 1);
        assert!(store.media.all().await.unwrap().is_empty());
        assert!(store.archives.exists(archive_id).await.unwrap());

        let (_, reason) = &job.errors()[0];
        assert!(reason.contains(&format!("Media/{media_id}")));

        // One errored event among the processed ones.
        drop(job);
        let mut errored_events = 0;
        while let Some(event) = events.recv().await {
            if matches!(event, SyncEvent::RecordErrored { .. }) {
                errored_events += 1;
            }
        }
        assert_eq!(errored_events, 1);
    }

    #[tokio::test]
    async fn reimport_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let (manifest, archive_id) = game_with_tag_and_archive();
        let path = write_package(
            dir.path(),
            &manifest,
            &[(format!("Archives/{archive_id}"), b"payload".as_slice())],
        );

        let store = ContentStore::in_memory();
        let locations = Arc::new(FixedRoots::new(dir.path()));

        for _ in 0..2 {
            let mut job =
                ImportContext::open(&path, store.clone(), locations.clone()).unwrap();
            job.prepare_queue(IncludeFlags::all()).await.unwrap();
            let summary = job.drain().await;
            assert_eq!(summary.errored, 0);
        }

        assert_eq!(store.games.all().await.unwrap().len(), 1);
        assert_eq!(store.tags.all().await.unwrap().len(), 1);
        assert_eq!(store.archives.all().await.unwrap().len(), 1);
        let tag = store.tags.all().await.unwrap().remove(0);
        assert_eq!(tag.game_ids.len(), 1);
    }

    #[tokio::test]
    async fn unknown_manifest_aborts_before_queueing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pkg.zip");
        let mut builder = ArchiveBuilder::create(&path).unwrap();
        builder.add_entry("Scripts/x", b"echo").unwrap();
        builder.finish(br#"{"nonsense":true}"#).unwrap();

        let store = ContentStore::in_memory();
        let locations = Arc::new(FixedRoots::new(dir.path()));
        let err = ImportContext::open(&path, store.clone(), locations).unwrap_err();
        assert!(matches!(err, SyncError::UnknownManifestKind));
        assert!(store.games.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn cancellation_between_records() {
        let dir = tempfile::tempdir().unwrap();
        let (manifest, archive_id) = game_with_tag_and_archive();
        let path = write_package(
            dir.path(),
            &manifest,
            &[(format!("Archives/{archive_id}"), b"payload".as_slice())],
        );

        let store = ContentStore::in_memory();
        let locations = Arc::new(FixedRoots::new(dir.path()));
        let mut job = ImportContext::open(&path, store, locations).unwrap();
        job.prepare_queue(IncludeFlags::all()).await.unwrap();
        job.cancel_token().cancel();
        let summary = job.drain().await;

        assert_eq!(summary.processed, 0);
        assert_eq!(summary.remaining, 2);
    }

    #[tokio::test]
    async fn item_infos_reports_blob_sizes() {
        let dir = tempfile::tempdir().unwrap();
        let (manifest, archive_id) = game_with_tag_and_archive();
        let path = write_package(
            dir.path(),
            &manifest,
            &[(format!("Archives/{archive_id}"), b"0123456789".as_slice())],
        );

        let store = ContentStore::in_memory();
        let locations = Arc::new(FixedRoots::new(dir.path()));
        let mut job = ImportContext::open(&path, store, locations).unwrap();
        let infos = job.item_infos();

        assert_eq!(infos.len(), 2);
        let archive_info = infos
            .iter()
            .find(|i| i.kind == RecordKind::Archive)
            .unwrap();
        assert_eq!(archive_info.size, 10);
        let tag_info = infos.iter().find(|i| i.kind == RecordKind::Tag).unwrap();
        assert_eq!(tag_info.size, 0);
        assert_eq!(tag_info.name, "Action");
    }

    #[tokio::test]
    async fn keys_under_redistributable_fail_per_record() {
        // A hand-built queue is not reachable through a redistributable
        // manifest, so exercise the guard through the adapter dispatch by
        // importing a game manifest against a store, then replaying a key
        // node with a redistributable parent.
        let dir = tempfile::tempdir().unwrap();
        let manifest = Manifest::Redistributable(lanshelf_manifest::RedistributableManifest {
            id: Uuid::new_v4(),
            name: "DirectX".into(),
            ..Default::default()
        });
        let path = write_package(dir.path(), &manifest, &[]);

        let store = ContentStore::in_memory();
        let locations = Arc::new(FixedRoots::new(dir.path()));
        let mut job = ImportContext::open(&path, store.clone(), locations).unwrap();
        job.prepare_queue(IncludeFlags::all()).await.unwrap();

        let node = ManifestNode::Key(KeyManifest {
            id: Uuid::new_v4(),
            value: "AAAA".into(),
            ..Default::default()
        });
        let err = job.process(&node).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot import key records into a redistributable unit"
        );
        assert!(store.keys.all().await.unwrap().is_empty());
    }
}
