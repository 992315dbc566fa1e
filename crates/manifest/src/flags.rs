//! Per-kind inclusion mask supplied by the caller when preparing a job.

use bitflags::bitflags;

use crate::units::UnitKind;

bitflags! {
    /// Selects which child record kinds an import or export job touches.
    ///
    /// The top-level unit itself is always synchronized; only child kinds
    /// with their bit set are queued.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct IncludeFlags: u32 {
        const ACTIONS = 1 << 0;
        const ARCHIVES = 1 << 1;
        const COLLECTIONS = 1 << 2;
        const CUSTOM_FIELDS = 1 << 3;
        const DEVELOPERS = 1 << 4;
        const ENGINE = 1 << 5;
        const GENRES = 1 << 6;
        const KEYS = 1 << 7;
        const MEDIA = 1 << 8;
        const MULTIPLAYER_MODES = 1 << 9;
        const PLATFORMS = 1 << 10;
        const PLAY_SESSIONS = 1 << 11;
        const PUBLISHERS = 1 << 12;
        const SAVES = 1 << 13;
        const SAVE_PATHS = 1 << 14;
        const SCRIPTS = 1 << 15;
        const SERVER_CONSOLES = 1 << 16;
        const SERVER_HTTP_PATHS = 1 << 17;
        const TAGS = 1 << 18;
    }
}

impl IncludeFlags {
    /// Every kind a unit of the given type can legally own.
    pub fn defaults_for(unit: UnitKind) -> Self {
        match unit {
            UnitKind::Game => Self::all() - (Self::SERVER_CONSOLES | Self::SERVER_HTTP_PATHS),
            UnitKind::Redistributable => Self::ARCHIVES | Self::SCRIPTS,
            UnitKind::Server => {
                Self::ACTIONS | Self::SCRIPTS | Self::SERVER_CONSOLES | Self::SERVER_HTTP_PATHS
            }
        }
    }
}
