//! Manifest model for LANshelf content packages.
//!
//! A manifest is the serialized description of one content unit (a game, a
//! redistributable, or a dedicated server) and every child record that
//! belongs to it. It travels inside the content archive next to the binary
//! payloads and is the sole input to the import engine.
//!
//! Everything in this crate is plain data: serde round-tripping is the only
//! behavior. Optional collections default to empty, never null, so the
//! adapters downstream stay branch-free.

mod flags;
mod node;
mod records;
mod units;

pub use flags::IncludeFlags;
pub use node::{ManifestNode, RecordKind};
pub use records::{
    ActionManifest, ArchiveManifest, CustomFieldManifest, KeyAllocationMethod, KeyManifest,
    MediaKind, MediaManifest, MultiplayerKind, MultiplayerModeManifest, PlaySessionManifest,
    SaveManifest, SavePathKind, SavePathManifest, ScriptKind, ScriptManifest,
    ServerConsoleKind, ServerConsoleManifest, ServerHttpPathManifest,
};
pub use units::{
    GameManifest, Manifest, RedistributableManifest, ServerManifest, UnknownKind, UnitKind,
};
