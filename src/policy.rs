//! Downward callbacks into the component that owns indicator rendering and
//! pointer-display routing policy. See `§6 EXTERNAL INTERFACES` for the
//! contract these must honor: both run synchronously on the caller's stack
//! and must not reenter the choreographer.

use crate::indicator::IndicatorFactory;
use crate::viewport::DisplayId;

/// The full set of downward calls the choreographer makes. `IndicatorFactory`
/// is split out as its own trait because it is also the contract the
/// [`crate::registry::IndicatorRegistry`] depends on in isolation.
pub trait Policy: IndicatorFactory {
    /// Called whenever the display hosting the *default* mouse pointer
    /// changes, including transitions to [`crate::viewport::DISPLAY_NONE`].
    /// Emitted synchronously, at most once per observable change.
    fn notify_pointer_display_id_changed(&mut self, display_id: DisplayId, position: (f32, f32));
}
