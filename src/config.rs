//! Policy-controlled settings, toggled out-of-band from event flow.

use crate::viewport::{DisplayId, DISPLAY_NONE};

/// Mutable settings owned by the choreographer but driven by policy calls
/// (`set-default-mouse-display`, `set-show-touches-enabled`, ...). Not
/// persisted: a fresh process starts from [`PolicySettings::default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicySettings {
    pub default_mouse_display_id: DisplayId,
    pub show_touches_enabled: bool,
    pub stylus_icon_enabled: bool,
    pub pointer_capture_enabled: bool,
}

impl Default for PolicySettings {
    fn default() -> Self {
        Self {
            default_mouse_display_id: DISPLAY_NONE,
            show_touches_enabled: false,
            stylus_icon_enabled: false,
            pointer_capture_enabled: false,
        }
    }
}
