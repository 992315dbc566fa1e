//! Shared helpers for adapter and context tests.

use std::path::Path;

use lanshelf_archive::{ArchiveBuilder, ContentArchive};
use lanshelf_store::{ContentStore, Game, Redistributable, Server};
use uuid::Uuid;

use crate::units::ParentUnit;

/// Builds a zip package containing `entries` plus an empty manifest entry
/// and reopens it for reading.
pub(crate) fn archive_with(dir: &Path, entries: &[(&str, &[u8])]) -> ContentArchive {
    let path = dir.join("pkg.zip");
    let mut builder = ArchiveBuilder::create(&path).unwrap();
    for (name, data) in entries {
        builder.add_entry(name, data).unwrap();
    }
    builder.finish(b"{}").unwrap();
    ContentArchive::open(&path).unwrap()
}

pub(crate) async fn game_parent(store: &ContentStore, title: &str) -> ParentUnit {
    let game = store
        .games
        .add(Game {
            id: Uuid::new_v4(),
            title: title.into(),
            ..Default::default()
        })
        .await
        .unwrap();
    ParentUnit::Game(game)
}

pub(crate) async fn redistributable_parent(store: &ContentStore, name: &str) -> ParentUnit {
    let redist = store
        .redistributables
        .add(Redistributable {
            id: Uuid::new_v4(),
            name: name.into(),
            ..Default::default()
        })
        .await
        .unwrap();
    ParentUnit::Redistributable(redist)
}

pub(crate) async fn server_parent(store: &ContentStore, name: &str, workdir: &str) -> ParentUnit {
    let server = store
        .servers
        .add(Server {
            id: Uuid::new_v4(),
            name: name.into(),
            working_directory: workdir.into(),
            ..Default::default()
        })
        .await
        .unwrap();
    ParentUnit::Server(server)
}
