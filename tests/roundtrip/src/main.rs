fn main() {
    println!("Run `cargo test -p roundtrip` to execute import/export round-trip tests.");
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use lanshelf_archive::crc32_bytes;
    use lanshelf_manifest::{
        ActionManifest, ArchiveManifest, CustomFieldManifest, GameManifest, IncludeFlags,
        KeyManifest, Manifest, MediaKind, MediaManifest, MultiplayerKind,
        MultiplayerModeManifest, PlaySessionManifest, SaveManifest, SavePathKind,
        SavePathManifest, ScriptKind, ScriptManifest, ServerConsoleKind, ServerConsoleManifest,
        ServerHttpPathManifest, ServerManifest,
    };
    use lanshelf_store::{
        Company, ContentStore, FixedRoots, StorageKind, StorageLocations, Tag,
    };
    use lanshelf_sync::{ExportContext, ImportContext, UnitRef};

    fn fresh_target(dir: &Path, name: &str) -> (ContentStore, Arc<FixedRoots>) {
        let root = dir.join(name);
        std::fs::create_dir_all(&root).unwrap();
        (ContentStore::in_memory(), Arc::new(FixedRoots::new(&root)))
    }

    /// Builds a package for a fully-populated game and returns the manifest
    /// that describes it.
    fn write_game_package(dir: &Path) -> (std::path::PathBuf, GameManifest) {
        let archive_id = Uuid::new_v4();
        let media_id = Uuid::new_v4();
        let script_id = Uuid::new_v4();
        let save_id = Uuid::new_v4();
        let released = Utc.with_ymd_and_hms(1996, 6, 22, 0, 0, 0).unwrap();

        let manifest = GameManifest {
            id: Uuid::new_v4(),
            title: "Quake".into(),
            sort_title: "Quake".into(),
            directory_name: "quake".into(),
            description: "Fast FPS".into(),
            notes: "GOTY".into(),
            released_on: Some(released),
            singleplayer: true,
            actions: vec![ActionManifest {
                id: Uuid::new_v4(),
                name: "Play".into(),
                path: "quake.exe".into(),
                primary_action: true,
                sort_order: 0,
                ..Default::default()
            }],
            archives: vec![ArchiveManifest {
                id: archive_id,
                version: "1.08".into(),
                changelog: "initial".into(),
                ..Default::default()
            }],
            collections: vec!["Classics".into()],
            custom_fields: vec![CustomFieldManifest {
                name: "hltb".into(),
                value: "12h".into(),
            }],
            developers: vec!["id Software".into()],
            engine: Some("idTech2".into()),
            genres: vec!["Shooter".into()],
            keys: vec![KeyManifest {
                id: Uuid::new_v4(),
                value: "AAAA-BBBB-CCCC".into(),
                ..Default::default()
            }],
            media: vec![MediaManifest {
                id: media_id,
                file_id: Uuid::new_v4(),
                kind: MediaKind::Cover,
                mime_type: "image/png".into(),
                ..Default::default()
            }],
            multiplayer_modes: vec![MultiplayerModeManifest {
                id: Uuid::new_v4(),
                kind: MultiplayerKind::Lan,
                min_players: 2,
                max_players: 16,
                ..Default::default()
            }],
            platforms: vec!["DOS".into()],
            play_sessions: vec![PlaySessionManifest {
                id: Uuid::new_v4(),
                start: Some(Utc.with_ymd_and_hms(2024, 5, 1, 19, 0, 0).unwrap()),
                end: Some(Utc.with_ymd_and_hms(2024, 5, 1, 21, 30, 0).unwrap()),
            }],
            publishers: vec!["GT Interactive".into()],
            saves: vec![SaveManifest {
                id: save_id,
                user_name: "player1".into(),
                ..Default::default()
            }],
            save_paths: vec![SavePathManifest {
                id: Uuid::new_v4(),
                kind: SavePathKind::File,
                path: "id1/*.sav".into(),
                regex: false,
                ..Default::default()
            }],
            scripts: vec![ScriptManifest {
                id: script_id,
                kind: ScriptKind::Install,
                name: "setup".into(),
                ..Default::default()
            }],
            tags: vec!["FPS".into(), "Classic".into()],
        };

        let path = dir.join("quake.zip");
        let mut builder = lanshelf_archive::ArchiveBuilder::create(&path).unwrap();
        builder
            .add_entry(&format!("Archives/{archive_id}"), b"INSTALLER PAYLOAD")
            .unwrap();
        builder
            .add_entry(&format!("Media/{media_id}"), b"PNG COVER BYTES")
            .unwrap();
        builder
            .add_entry(&format!("Scripts/{script_id}"), b"echo installing")
            .unwrap();
        builder
            .add_entry(&format!("Saves/{save_id}"), b"SAVEGAME")
            .unwrap();
        builder
            .finish(&Manifest::Game(manifest.clone()).to_vec().unwrap())
            .unwrap();
        (path, manifest)
    }

    async fn import_package(
        path: &Path,
        store: &ContentStore,
        locations: Arc<FixedRoots>,
    ) -> lanshelf_sync::SyncSummary {
        let mut job = ImportContext::open(path, store.clone(), locations).unwrap();
        job.prepare_queue(IncludeFlags::all()).await.unwrap();
        job.drain().await
    }

    #[tokio::test]
    async fn game_export_import_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let (path, manifest) = write_game_package(dir.path());

        // First import populates store A.
        let (store_a, locations_a) = fresh_target(dir.path(), "a");
        let summary = import_package(&path, &store_a, locations_a.clone()).await;
        assert_eq!(summary.errored, 0);
        assert_eq!(summary.remaining, 0);

        // Export store A back out to a package.
        let exported = dir.path().join("exported.zip");
        let mut job = ExportContext::create(
            &exported,
            store_a.clone(),
            locations_a.clone(),
            UnitRef::Game(manifest.id),
        )
        .await
        .unwrap();
        job.prepare_queue(IncludeFlags::all()).await.unwrap();
        let summary = job.drain().await;
        assert_eq!(summary.errored, 0);
        job.finish().await.unwrap();

        // Import the exported package into an empty store B.
        let (store_b, locations_b) = fresh_target(dir.path(), "b");
        let summary = import_package(&exported, &store_b, locations_b.clone()).await;
        assert_eq!(summary.errored, 0);

        // Unit scalar fields survive field-for-field.
        let game_a = store_a.games.get(manifest.id).await.unwrap().unwrap();
        let game_b = store_b.games.get(manifest.id).await.unwrap().unwrap();
        assert_eq!(game_a, game_b);
        assert_eq!(game_b.title, "Quake");
        assert_eq!(game_b.released_on, manifest.released_on);

        // Child records survive with ids and fields intact.
        let action = store_b.actions.get(manifest.actions[0].id).await.unwrap();
        assert_eq!(action.unwrap().name, "Play");
        let key = store_b.keys.get(manifest.keys[0].id).await.unwrap();
        assert_eq!(key.unwrap().value, "AAAA-BBBB-CCCC");
        let mode = store_b
            .multiplayer_modes
            .get(manifest.multiplayer_modes[0].id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(mode.max_players, 16);
        let session = store_b
            .play_sessions
            .get(manifest.play_sessions[0].id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.start, manifest.play_sessions[0].start);
        let save_path = store_b
            .save_paths
            .get(manifest.save_paths[0].id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(save_path.path, "id1/*.sav");
        let fields = store_b.custom_fields.all().await.unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].value, "12h");

        // Script text travels on the entity.
        let script = store_b
            .scripts
            .get(manifest.scripts[0].id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(script.contents, "echo installing");

        // Shared reference rows exist once each and point at the game.
        for (names, count) in [
            (store_b.tags.all().await.unwrap().len(), 2),
            (store_b.genres.all().await.unwrap().len(), 1),
            (store_b.platforms.all().await.unwrap().len(), 1),
            (store_b.collections.all().await.unwrap().len(), 1),
            (store_b.engines.all().await.unwrap().len(), 1),
        ] {
            assert_eq!(names, count);
        }
        let companies = store_b.companies.all().await.unwrap();
        assert_eq!(companies.len(), 2);

        // Blobs are byte-identical across the trip.
        let archive_b = store_b
            .archives
            .get(manifest.archives[0].id)
            .await
            .unwrap()
            .unwrap();
        let payload = locations_b
            .root(StorageKind::Archive)
            .join(&archive_b.object_key);
        assert_eq!(std::fs::read(payload).unwrap(), b"INSTALLER PAYLOAD");

        let media_b = store_b
            .media
            .get(manifest.media[0].id)
            .await
            .unwrap()
            .unwrap();
        let media_file = locations_b
            .root(StorageKind::Media)
            .join(media_b.file_id.to_string());
        assert_eq!(std::fs::read(media_file).unwrap(), b"PNG COVER BYTES");
        assert_eq!(media_b.crc32, crc32_bytes(b"PNG COVER BYTES"));

        let save_file = locations_b
            .root(StorageKind::Save)
            .join(manifest.id.to_string())
            .join(manifest.saves[0].id.to_string());
        assert_eq!(std::fs::read(save_file).unwrap(), b"SAVEGAME");
    }

    #[tokio::test]
    async fn publisher_deduplicated_across_two_games() {
        let dir = tempfile::tempdir().unwrap();
        let (store, locations) = fresh_target(dir.path(), "store");

        let mut game_ids = Vec::new();
        for title in ["First", "Second"] {
            let manifest = GameManifest {
                id: Uuid::new_v4(),
                title: title.into(),
                publishers: vec!["Acme".into()],
                ..Default::default()
            };
            game_ids.push(manifest.id);
            let path = dir.path().join(format!("{title}.zip"));
            let builder = lanshelf_archive::ArchiveBuilder::create(&path).unwrap();
            builder
                .finish(&Manifest::Game(manifest).to_vec().unwrap())
                .unwrap();

            let summary = import_package(&path, &store, locations.clone()).await;
            assert_eq!(summary.errored, 0);
        }

        let companies = store.companies.all().await.unwrap();
        assert_eq!(companies.len(), 1);
        let acme: &Company = &companies[0];
        assert_eq!(acme.name, "Acme");
        assert!(acme.published_game_ids.contains(&game_ids[0]));
        assert!(acme.published_game_ids.contains(&game_ids[1]));
        assert!(acme.developed_game_ids.is_empty());
    }

    #[tokio::test]
    async fn reimport_keeps_shared_rows_single() {
        let dir = tempfile::tempdir().unwrap();
        let (path, manifest) = write_game_package(dir.path());
        let (store, locations) = fresh_target(dir.path(), "store");

        for _ in 0..3 {
            let summary = import_package(&path, &store, locations.clone()).await;
            assert_eq!(summary.errored, 0);
        }

        assert_eq!(store.games.all().await.unwrap().len(), 1);
        assert_eq!(store.tags.all().await.unwrap().len(), 2);
        let tag = store
            .tags
            .first_where(&|t: &Tag| t.name == "FPS")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(tag.game_ids, vec![manifest.id]);
        assert_eq!(store.archives.all().await.unwrap().len(), 1);
        assert_eq!(store.saves.all().await.unwrap().len(), 1);

        // Replaced payloads do not pile up on disk.
        let archive_root = locations.root(StorageKind::Archive);
        assert_eq!(std::fs::read_dir(&archive_root).unwrap().count(), 1);
        let media_root = locations.root(StorageKind::Media);
        assert_eq!(std::fs::read_dir(&media_root).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn server_round_trip_mirrors_working_files() {
        let dir = tempfile::tempdir().unwrap();
        let workdir = dir.path().join("srv");
        std::fs::create_dir_all(workdir.join("maps")).unwrap();

        let script_id = Uuid::new_v4();
        let manifest = ServerManifest {
            id: Uuid::new_v4(),
            name: "srcds".into(),
            autostart: true,
            autostart_delay: 5,
            arguments: "-console".into(),
            working_directory: workdir.to_string_lossy().into_owned(),
            scripts: vec![ScriptManifest {
                id: script_id,
                kind: ScriptKind::BeforeStart,
                name: "prestart".into(),
                ..Default::default()
            }],
            server_consoles: vec![ServerConsoleManifest {
                id: Uuid::new_v4(),
                name: "rcon".into(),
                kind: ServerConsoleKind::Rcon,
                host: "localhost".into(),
                port: 27015,
                ..Default::default()
            }],
            server_http_paths: vec![ServerHttpPathManifest {
                id: Uuid::new_v4(),
                local_path: "maps".into(),
                path: "/maps".into(),
            }],
            ..Default::default()
        };

        let path = dir.path().join("server.zip");
        let mut builder = lanshelf_archive::ArchiveBuilder::create(&path).unwrap();
        builder
            .add_entry(&format!("Scripts/{script_id}"), b"#!/bin/sh")
            .unwrap();
        builder.add_entry("Files/server.cfg", b"hostname srcds").unwrap();
        builder
            .add_entry("Files/maps/de_dust.bsp", b"MAPDATA")
            .unwrap();
        builder
            .finish(&Manifest::Server(manifest.clone()).to_vec().unwrap())
            .unwrap();

        let (store, locations) = fresh_target(dir.path(), "store");
        let mut job = ImportContext::open(&path, store.clone(), locations).unwrap();
        job.prepare_queue(IncludeFlags::all()).await.unwrap();
        let summary = job.drain().await;
        assert_eq!(summary.errored, 0);
        assert_eq!(summary.processed, 3);
        let mirrored = job.sync_working_files().await.unwrap();
        assert_eq!(mirrored, 2);

        // Working directory tree was mirrored verbatim.
        assert_eq!(
            std::fs::read(workdir.join("server.cfg")).unwrap(),
            b"hostname srcds"
        );
        assert_eq!(
            std::fs::read(workdir.join("maps/de_dust.bsp")).unwrap(),
            b"MAPDATA"
        );

        let server = store.servers.get(manifest.id).await.unwrap().unwrap();
        assert!(server.autostart);
        assert_eq!(server.autostart_delay, 5);
        assert_eq!(store.server_consoles.all().await.unwrap().len(), 1);
        assert_eq!(store.server_http_paths.all().await.unwrap().len(), 1);

        // Export packs the working directory back under Files/.
        let exported = dir.path().join("server-out.zip");
        let (store_b, locations_b) = fresh_target(dir.path(), "b");
        let mut job = ExportContext::create(
            &exported,
            store.clone(),
            locations_b.clone(),
            UnitRef::Server(manifest.id),
        )
        .await
        .unwrap();
        job.prepare_queue(IncludeFlags::all()).await.unwrap();
        let summary = job.drain().await;
        assert_eq!(summary.errored, 0);
        job.finish().await.unwrap();

        let archive = lanshelf_archive::ContentArchive::open(&exported).unwrap();
        let mut files = archive.entries_under("Files");
        files.sort();
        assert_eq!(files, vec!["Files/maps/de_dust.bsp", "Files/server.cfg"]);
        drop(archive);

        // And the exported package imports cleanly elsewhere.
        let summary = import_package(&exported, &store_b, locations_b).await;
        assert_eq!(summary.errored, 0);
        let script = store_b.scripts.get(script_id).await.unwrap().unwrap();
        assert_eq!(script.contents, "#!/bin/sh");
        assert_eq!(script.server_id, Some(manifest.id));
    }

    #[tokio::test]
    async fn redistributable_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let archive_id = Uuid::new_v4();
        let script_id = Uuid::new_v4();
        let manifest = lanshelf_manifest::RedistributableManifest {
            id: Uuid::new_v4(),
            name: "DirectX 9".into(),
            description: "Runtime".into(),
            archives: vec![ArchiveManifest {
                id: archive_id,
                version: "9.0c".into(),
                ..Default::default()
            }],
            scripts: vec![ScriptManifest {
                id: script_id,
                kind: ScriptKind::Install,
                ..Default::default()
            }],
            ..Default::default()
        };

        let path = dir.path().join("dx.zip");
        let mut builder = lanshelf_archive::ArchiveBuilder::create(&path).unwrap();
        builder
            .add_entry(&format!("Archives/{archive_id}"), b"DXSETUP")
            .unwrap();
        builder
            .add_entry(&format!("Scripts/{script_id}"), b"dxsetup /silent")
            .unwrap();
        builder
            .finish(&Manifest::Redistributable(manifest.clone()).to_vec().unwrap())
            .unwrap();

        let (store, locations) = fresh_target(dir.path(), "store");
        let summary = import_package(&path, &store, locations.clone()).await;
        assert_eq!(summary.errored, 0);
        assert_eq!(summary.processed, 2);

        let redist = store
            .redistributables
            .get(manifest.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(redist.name, "DirectX 9");

        let exported = dir.path().join("dx-out.zip");
        let mut job = ExportContext::create(
            &exported,
            store.clone(),
            locations,
            UnitRef::Redistributable(manifest.id),
        )
        .await
        .unwrap();
        job.prepare_queue(IncludeFlags::all()).await.unwrap();
        assert_eq!(job.drain().await.errored, 0);
        job.finish().await.unwrap();

        let mut archive = lanshelf_archive::ContentArchive::open(&exported).unwrap();
        let reparsed = Manifest::from_slice(&archive.manifest_bytes().unwrap()).unwrap();
        let Manifest::Redistributable(out) = reparsed else {
            panic!("expected a redistributable manifest");
        };
        assert_eq!(out.id, manifest.id);
        assert_eq!(out.archives.len(), 1);
        assert_eq!(
            archive
                .read_entry(&format!("Archives/{archive_id}"))
                .unwrap(),
            b"DXSETUP"
        );
    }
}
