//! Live input device tracking.

use std::collections::HashMap;

use bitflags::bitflags;

use crate::viewport::{DisplayId, DISPLAY_NONE};

/// Identifier for an input device.
pub type DeviceId = i32;

bitflags! {
    /// Capability bits for an input device. A single device may combine several,
    /// e.g. a touchscreen-with-stylus digitizer reports both [`Source::TOUCHSCREEN`]
    /// and [`Source::STYLUS`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Source: u32 {
        const MOUSE          = 0b0000_0001;
        const MOUSE_RELATIVE = 0b0000_0010;
        const TOUCHSCREEN    = 0b0000_0100;
        const STYLUS         = 0b0000_1000;
        const KEYBOARD       = 0b0001_0000;
    }
}

/// A live input device as reported by the last `device-list-changed` notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Device {
    pub device_id: DeviceId,
    pub sources: Source,
    pub associated_display_id: DisplayId,
}

impl Device {
    pub fn new(device_id: DeviceId, sources: Source) -> Self {
        Self { device_id, sources, associated_display_id: DISPLAY_NONE }
    }

    pub fn with_associated_display(mut self, display_id: DisplayId) -> Self {
        self.associated_display_id = display_id;
        self
    }

    pub fn has_source(&self, source: Source) -> bool {
        self.sources.intersects(source)
    }
}

/// Tracks the set of currently live devices, replaced atomically on each
/// `device-list-changed` notification.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: HashMap<DeviceId, Device>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `new` as the current device list, returning the ids that were
    /// present before and are now gone.
    pub fn replace(&mut self, new: impl IntoIterator<Item = Device>) -> Vec<DeviceId> {
        let new: HashMap<DeviceId, Device> = new.into_iter().map(|d| (d.device_id, d)).collect();
        let removed: Vec<DeviceId> =
            self.devices.keys().filter(|id| !new.contains_key(*id)).copied().collect();
        self.devices = new;
        removed
    }

    pub fn get(&self, device_id: DeviceId) -> Option<Device> {
        self.devices.get(&device_id).copied()
    }

    /// Whether any live mouse-class device still targets `display_id`, either
    /// through explicit association or (for unassociated devices) by virtue of
    /// `display_id` being `default_mouse_display_id`.
    pub fn has_mouse_targeting(
        &self,
        display_id: DisplayId,
        default_mouse_display_id: DisplayId,
    ) -> bool {
        self.devices.values().any(|d| {
            (d.has_source(Source::MOUSE) || d.has_source(Source::MOUSE_RELATIVE))
                && target_display(*d, default_mouse_display_id) == display_id
        })
    }
}

/// Resolves which display a mouse-class device currently targets: its explicit
/// association wins, falling back to the policy default.
pub fn target_display(device: Device, default_mouse_display_id: DisplayId) -> DisplayId {
    if device.associated_display_id != DISPLAY_NONE {
        device.associated_display_id
    } else {
        default_mouse_display_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_reports_removed_devices() {
        let mut registry = DeviceRegistry::new();
        registry.replace([Device::new(3, Source::MOUSE), Device::new(4, Source::TOUCHSCREEN)]);
        let removed = registry.replace([Device::new(4, Source::TOUCHSCREEN)]);
        assert_eq!(removed, vec![3]);
        assert!(registry.get(3).is_none());
        assert!(registry.get(4).is_some());
    }

    #[test]
    fn associated_display_overrides_default() {
        let device = Device::new(4, Source::MOUSE).with_associated_display(10);
        assert_eq!(target_display(device, 5), 10);
        let unassociated = Device::new(3, Source::MOUSE);
        assert_eq!(target_display(unassociated, 5), 5);
    }
}
