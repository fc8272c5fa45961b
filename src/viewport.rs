//! Display topology: the set of logical viewports the choreographer knows about.

use std::collections::HashMap;

use dpi::LogicalSize;

/// Identifier for a display.
pub type DisplayId = i32;

/// Sentinel meaning "no display". Never appears as a key in [`DisplayTopology`].
pub const DISPLAY_NONE: DisplayId = -1;

/// A display's logical coordinate rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub display_id: DisplayId,
    pub logical_size: LogicalSize<i32>,
}

impl Viewport {
    pub fn new(display_id: DisplayId, logical_width: i32, logical_height: i32) -> Self {
        Self { display_id, logical_size: LogicalSize::new(logical_width, logical_height) }
    }

    /// Clamps `(x, y)` into `[0, width - 1] x [0, height - 1]`.
    pub fn clamp(&self, x: f32, y: f32) -> (f32, f32) {
        let max_x = (self.logical_size.width.max(1) - 1) as f32;
        let max_y = (self.logical_size.height.max(1) - 1) as f32;
        (x.clamp(0.0, max_x), y.clamp(0.0, max_y))
    }
}

/// Holds the current set of display viewports, replaced atomically on each update.
#[derive(Debug, Default)]
pub struct DisplayTopology {
    viewports: HashMap<DisplayId, Viewport>,
}

impl DisplayTopology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole set of viewports, returning the set of display ids that
    /// were present before and are no longer present.
    pub fn replace(&mut self, viewports: impl IntoIterator<Item = Viewport>) -> Vec<DisplayId> {
        let new: HashMap<DisplayId, Viewport> =
            viewports.into_iter().map(|v| (v.display_id, v)).collect();
        let removed: Vec<DisplayId> =
            self.viewports.keys().filter(|id| !new.contains_key(*id)).copied().collect();
        self.viewports = new;
        removed
    }

    pub fn get(&self, display_id: DisplayId) -> Option<Viewport> {
        self.viewports.get(&display_id).copied()
    }

    pub fn contains(&self, display_id: DisplayId) -> bool {
        self.viewports.contains_key(&display_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_reports_removed_displays() {
        let mut topology = DisplayTopology::new();
        topology.replace([Viewport::new(5, 480, 800), Viewport::new(10, 480, 800)]);
        let removed = topology.replace([Viewport::new(10, 480, 800)]);
        assert_eq!(removed, vec![5]);
        assert!(!topology.contains(5));
        assert!(topology.contains(10));
    }

    #[test]
    fn clamp_keeps_position_within_bounds() {
        let viewport = Viewport::new(5, 480, 800);
        assert_eq!(viewport.clamp(-10.0, 900.0), (0.0, 799.0));
        assert_eq!(viewport.clamp(100.0, 200.0), (100.0, 200.0));
    }
}
