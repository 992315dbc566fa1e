//! Sync engine error types.

use lanshelf_archive::ArchiveError;
use lanshelf_manifest::{RecordKind, UnitKind};
use lanshelf_store::StoreError;
use uuid::Uuid;

/// Errors produced while importing or exporting a content package.
///
/// Job-level errors (unknown manifest shape, missing unit) propagate to the
/// caller before any record is processed. Record-level errors are recovered
/// inside the drain loop and surface as per-record reasons instead.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("manifest does not match any known content unit shape")]
    UnknownManifestKind,

    #[error("cannot import {kind} records into a {parent} unit")]
    ParentMismatch { kind: RecordKind, parent: UnitKind },

    #[error("archive entry {path} is missing")]
    MissingBlob { path: String },

    #[error("{kind} {id} passed the existence check but could not be loaded")]
    RecordVanished { kind: RecordKind, id: String },

    #[error("{unit} {id} not found")]
    UnitNotFound { unit: UnitKind, id: Uuid },

    #[error("queue drained before the top-level unit was resolved")]
    NotPrepared,

    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SyncError {
    /// Per-record failure reason shown to the user and recorded in the
    /// errored map. Expected failure classes speak for themselves; anything
    /// else is wrapped with the record kind for context.
    pub(crate) fn record_reason(&self, verb: &str, kind: RecordKind) -> String {
        match self {
            SyncError::ParentMismatch { .. }
            | SyncError::MissingBlob { .. }
            | SyncError::RecordVanished { .. } => self.to_string(),
            other => format!("unknown error occurred while {verb} {kind}: {other}"),
        }
    }
}
