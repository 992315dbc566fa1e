//! Manifest synchronization engine.
//!
//! This crate reconciles a manifest tree (plus its companion blob archive)
//! against the persisted entity graph — and runs the same machinery in
//! reverse to produce a content package from the graph.
//!
//! # Import pipeline
//!
//! 1. **Open** — open the archive, classify the manifest, build a preview
//!    list of every child record
//! 2. **Prepare** — resolve (get-or-create) the top-level unit, queue the
//!    child records selected by the caller's [`IncludeFlags`]
//! 3. **Drain** — process queued records one at a time through the per-kind
//!    adapters; a failed record is reported and skipped, never fatal
//! 4. **Finish** — for servers, mirror the archive's `Files/` tree into the
//!    working directory
//!
//! Export is the mirror image: seed the queue from the entity graph, drain
//! it into a manifest under construction (packing blobs as a side effect),
//! then write the manifest entry and close the container.

mod adapters;
mod error;
#[cfg(test)]
mod testutil;
mod events;
mod export;
mod import;
mod job;
mod units;

pub use error::SyncError;
pub use events::SyncEvent;
pub use export::ExportContext;
pub use import::ImportContext;
pub use job::{ImportItemInfo, SyncSummary};
pub use units::{ParentUnit, UnitRef};

// Re-exported so callers can drive a job without importing the model crate.
pub use lanshelf_manifest::{IncludeFlags, RecordKind, UnitKind};
