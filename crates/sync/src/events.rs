//! Progress events consumed by a progress UI.

use lanshelf_manifest::RecordKind;

/// Fired once per drained record.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    RecordProcessed {
        kind: RecordKind,
        name: String,
    },
    RecordErrored {
        kind: RecordKind,
        name: String,
        reason: String,
    },
}
