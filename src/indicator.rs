//! The external visual surface. This crate owns *which* indicators exist and
//! *where* they are; rendering the actual sprite is someone else's problem.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::viewport::{DisplayId, Viewport};

/// The product kind an [`Indicator`] renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorKind {
    Mouse,
    Touch,
    Stylus,
}

/// A per-display visual object. One instance per active pointer; see
/// [`crate::registry::IndicatorRegistry`] for the keying scheme.
///
/// Kind-specific methods (`set_spots`/`clear_spots`/`spots` for touch) are
/// no-ops on indicators of a different kind, so the registry can treat all
/// three kinds through one trait object.
pub trait Indicator: fmt::Debug {
    fn set_display_viewport(&mut self, viewport: Option<Viewport>);
    fn display_viewport(&self) -> Option<Viewport>;

    fn set_position(&mut self, x: f32, y: f32);
    fn position(&self) -> (f32, f32);

    fn show(&mut self);
    fn hide(&mut self);
    fn is_pointer_shown(&self) -> bool;

    /// Fades a stylus indicator out without destroying it. Cursor kinds may
    /// treat this the same as [`Indicator::hide`].
    fn fade(&mut self) {
        self.hide();
    }

    fn set_spots(&mut self, _display_id: DisplayId, _pointer_ids: &[i32]) {}
    fn clear_spots(&mut self, _display_id: DisplayId) {}
    fn spots(&self) -> HashMap<DisplayId, HashSet<i32>> {
        HashMap::new()
    }
}

/// Creates indicators on demand. The choreographer becomes the sole owner of
/// whatever is returned.
pub trait IndicatorFactory {
    fn create_indicator(&mut self, kind: IndicatorKind) -> Box<dyn Indicator>;
}
