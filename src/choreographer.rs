//! The orchestrator: reconciles indicator lifetime against device, topology
//! and policy state, rewrites mouse motion, and forwards everything else.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::config::PolicySettings;
use crate::device::{target_display, DeviceRegistry, Source};
use crate::event::{
    DeviceResetEvent, Event, InnerListener, MotionAction, MotionEvent, PointerCaptureChangedEvent,
    INVALID_CURSOR_POSITION,
};
use crate::indicator::IndicatorKind;
use crate::mouse;
use crate::policy::Policy;
use crate::registry::{IndicatorKey, IndicatorRegistry};
use crate::viewport::{DisplayId, DisplayTopology, Viewport, DISPLAY_NONE};

/// Owns the visual state of on-screen pointer indicators across a
/// potentially multi-display system, and rewrites in-flight mouse/stylus
/// motion events so they stay consistent with it.
///
/// All methods are synchronous and expect to run on a single input thread;
/// see the crate's concurrency notes. `L` forwards (possibly rewritten)
/// events downstream; `P` creates indicators and is told when the display
/// hosting the default mouse pointer changes.
pub struct Choreographer<L, P> {
    inner: L,
    policy: P,
    devices: DeviceRegistry,
    topology: DisplayTopology,
    registry: IndicatorRegistry,
    settings: PolicySettings,
    last_notified_pointer_display: DisplayId,
}

impl<L, P> Choreographer<L, P>
where
    L: InnerListener,
    P: Policy,
{
    pub fn new(inner: L, policy: P) -> Self {
        Self {
            inner,
            policy,
            devices: DeviceRegistry::new(),
            topology: DisplayTopology::new(),
            registry: IndicatorRegistry::new(),
            settings: PolicySettings::default(),
            last_notified_pointer_display: DISPLAY_NONE,
        }
    }

    pub fn settings(&self) -> PolicySettings {
        self.settings
    }

    pub fn indicator_count(&self) -> usize {
        self.registry.len()
    }

    pub fn has_indicator(&self, key: IndicatorKey) -> bool {
        self.registry.contains(&key)
    }

    /// Dispatches one upstream event, reconciling indicator state and
    /// forwarding the (possibly rewritten) event to the inner listener.
    pub fn notify(&mut self, event: Event) {
        let forwarded = match event {
            Event::DeviceListChanged(changed) => {
                let removed = self.devices.replace(changed.devices.iter().copied());
                for device_id in removed {
                    self.registry.drop_entry(&IndicatorKey::Touch(device_id));
                    self.registry.drop_entry(&IndicatorKey::Stylus(device_id));
                }
                self.reconcile_mouse_entries();
                self.reconcile_viewports();
                self.sync_pointer_display_notification();
                Event::DeviceListChanged(changed)
            }
            Event::Motion(motion) => self.handle_motion(motion),
            Event::DeviceReset(reset) => {
                self.handle_device_reset(&reset);
                Event::DeviceReset(reset)
            }
            Event::PointerCaptureChanged(request) => {
                self.handle_pointer_capture_changed(&request);
                Event::PointerCaptureChanged(request)
            }
            other => other,
        };

        self.debug_assert_invariants();
        self.inner.notify(forwarded);
    }

    /// Replaces the display topology; the previous set is fully discarded.
    pub fn set_display_viewports(&mut self, viewports: impl IntoIterator<Item = Viewport>) {
        self.topology.replace(viewports);
        self.reconcile_viewports();
        self.sync_pointer_display_notification();
        self.debug_assert_invariants();
    }

    pub fn set_default_mouse_display_id(&mut self, display_id: DisplayId) {
        if self.settings.default_mouse_display_id == display_id {
            return;
        }
        debug!(old = self.settings.default_mouse_display_id, new = display_id, "default mouse display changed");
        self.settings.default_mouse_display_id = display_id;
        self.reconcile_mouse_entries();
        self.sync_pointer_display_notification();
        self.debug_assert_invariants();
    }

    pub fn set_show_touches_enabled(&mut self, enabled: bool) {
        if self.settings.show_touches_enabled == enabled {
            return;
        }
        self.settings.show_touches_enabled = enabled;
        if !enabled {
            self.drop_entries_of_kind(IndicatorKind::Touch);
        }
        self.debug_assert_invariants();
    }

    pub fn set_stylus_pointer_icon_enabled(&mut self, enabled: bool) {
        if self.settings.stylus_icon_enabled == enabled {
            return;
        }
        self.settings.stylus_icon_enabled = enabled;
        if !enabled {
            self.drop_entries_of_kind(IndicatorKind::Stylus);
        }
        self.debug_assert_invariants();
    }

    fn drop_entries_of_kind(&mut self, kind: IndicatorKind) {
        let keys: Vec<IndicatorKey> =
            self.registry.keys().filter(|k| k.kind() == kind).copied().collect();
        for key in keys {
            self.registry.drop_entry(&key);
        }
    }

    fn handle_motion(&mut self, event: MotionEvent) -> Event {
        if event.source.intersects(Source::MOUSE | Source::MOUSE_RELATIVE) {
            return Event::Motion(self.handle_mouse_motion(event));
        }

        let device_has_touchscreen =
            self.devices.get(event.device_id).is_some_and(|d| d.has_source(Source::TOUCHSCREEN));

        if event.source.intersects(Source::STYLUS) && event.action.is_hover() {
            self.handle_stylus_motion(&event);
        }

        let drives_touch_spots = event.source.intersects(Source::TOUCHSCREEN)
            || (event.source.intersects(Source::STYLUS) && device_has_touchscreen && !event.action.is_hover());
        if drives_touch_spots {
            self.handle_touch_motion(&event);
        }

        // Touch and stylus paths are visual-only: the event is forwarded unchanged.
        Event::Motion(event)
    }

    fn handle_mouse_motion(&mut self, mut event: MotionEvent) -> Event {
        if self.settings.pointer_capture_enabled {
            // Under capture every mouse-kind indicator is hidden and frozen
            // (invariant 3), not just the MouseRelative source §4.4 step 2
            // calls out literally. An absolute-sourced event arriving before
            // a device has switched to relative-only must not show() a
            // cursor the capture toggle already hid.
            event.display_id = DISPLAY_NONE;
            event.cursor_position = INVALID_CURSOR_POSITION;
            return Event::Motion(event);
        }

        let target = self
            .devices
            .get(event.device_id)
            .map(|device| target_display(device, self.settings.default_mouse_display_id))
            .unwrap_or(self.settings.default_mouse_display_id);

        if target == DISPLAY_NONE {
            event.cursor_position = INVALID_CURSOR_POSITION;
            return Event::Motion(event);
        }

        let viewport = self.topology.get(target);
        let key = IndicatorKey::Mouse(target);
        let entry = self.registry.ensure(key, &mut self.policy, viewport);

        let index = event.primary_pointer_index();
        let (dx, dy) =
            event.pointers.get(index).map(|p| (p.relative_x, p.relative_y)).unwrap_or((0.0, 0.0));
        let position = mouse::advance(entry, viewport, dx, dy);
        entry.indicator.show();

        event.display_id = target;
        event.cursor_position = position;
        if let Some(pointer) = event.pointers.get_mut(index) {
            pointer.x = position.0;
            pointer.y = position.1;
        }

        self.sync_pointer_display_notification();
        Event::Motion(event)
    }

    fn handle_touch_motion(&mut self, event: &MotionEvent) {
        if !self.settings.show_touches_enabled {
            return;
        }

        let key = IndicatorKey::Touch(event.device_id);
        let viewport = self
            .devices
            .get(event.device_id)
            .and_then(|d| self.topology.get(d.associated_display_id));
        let entry = self.registry.ensure(key, &mut self.policy, viewport);

        let display_id = event.display_id;
        let mut spots: HashSet<i32> =
            entry.indicator.spots().get(&display_id).cloned().unwrap_or_default();

        match event.action {
            MotionAction::Down => {
                spots.insert(pointer_id_at(event, 0));
            }
            MotionAction::PointerDown(index) => {
                spots.insert(pointer_id_at(event, index));
            }
            MotionAction::PointerUp(index) => {
                spots.remove(&pointer_id_at(event, index));
            }
            MotionAction::Up | MotionAction::Cancel => {
                spots.remove(&pointer_id_at(event, 0));
            }
            MotionAction::Move | MotionAction::HoverEnter | MotionAction::HoverMove | MotionAction::HoverExit => {}
        }

        let ids: Vec<i32> = spots.into_iter().collect();
        entry.indicator.set_spots(display_id, &ids);
    }

    fn handle_stylus_motion(&mut self, event: &MotionEvent) {
        if !self.settings.stylus_icon_enabled {
            return;
        }

        let key = IndicatorKey::Stylus(event.device_id);
        match event.action {
            MotionAction::HoverEnter | MotionAction::HoverMove => {
                let viewport = self
                    .devices
                    .get(event.device_id)
                    .and_then(|d| self.topology.get(d.associated_display_id));
                let entry = self.registry.ensure(key, &mut self.policy, viewport);
                if let Some(pointer) = event.pointers.first() {
                    entry.indicator.set_position(pointer.x, pointer.y);
                }
                entry.indicator.show();
            }
            MotionAction::HoverExit => {
                if let Some(entry) = self.registry.get_mut(&key) {
                    entry.indicator.fade();
                }
            }
            _ => {}
        }
    }

    fn handle_device_reset(&mut self, reset: &DeviceResetEvent) {
        if let Some(entry) = self.registry.get_mut(&IndicatorKey::Touch(reset.device_id)) {
            let displays: Vec<DisplayId> = entry.indicator.spots().keys().copied().collect();
            for display_id in displays {
                entry.indicator.clear_spots(display_id);
            }
        }
        if let Some(entry) = self.registry.get_mut(&IndicatorKey::Stylus(reset.device_id)) {
            entry.indicator.fade();
        }
    }

    fn handle_pointer_capture_changed(&mut self, request: &PointerCaptureChangedEvent) {
        self.settings.pointer_capture_enabled = request.request.enable;
        if self.settings.pointer_capture_enabled {
            self.registry.for_each_mut(IndicatorKind::Mouse, |entry| entry.indicator.hide());
        }
    }

    /// Drops `Mouse(d)` entries that no live device still targets, per the
    /// lifecycle rule in `DeviceRegistry::replace`: a display loses its
    /// indicator the moment the last mouse device pointed at it disappears,
    /// whether that's because the device was removed or because the default
    /// mouse display moved elsewhere.
    fn reconcile_mouse_entries(&mut self) {
        let default = self.settings.default_mouse_display_id;
        let stale: Vec<DisplayId> = self
            .registry
            .keys()
            .filter_map(|key| match key {
                IndicatorKey::Mouse(display_id) => Some(*display_id),
                _ => None,
            })
            .filter(|display_id| !self.devices.has_mouse_targeting(*display_id, default))
            .collect();
        for display_id in stale {
            self.registry.drop_entry(&IndicatorKey::Mouse(display_id));
        }
    }

    /// Re-attaches every entry's viewport to match current topology and
    /// device associations (invariant 6).
    fn reconcile_viewports(&mut self) {
        let keys: Vec<IndicatorKey> = self.registry.keys().copied().collect();
        for key in keys {
            let display_id = match key {
                IndicatorKey::Mouse(display_id) => display_id,
                IndicatorKey::Touch(device_id) | IndicatorKey::Stylus(device_id) => {
                    self.devices.get(device_id).map(|d| d.associated_display_id).unwrap_or(DISPLAY_NONE)
                }
            };
            let viewport = self.topology.get(display_id);
            self.registry.attach_viewport(&key, viewport);
        }
    }

    /// Emits `notifyPointerDisplayIdChanged` at most once per observable
    /// change to the display hosting the *default* mouse pointer.
    fn sync_pointer_display_notification(&mut self) {
        let key = IndicatorKey::Mouse(self.settings.default_mouse_display_id);
        let (display_id, position) = match self.registry.get(&key) {
            Some(entry) if self.settings.default_mouse_display_id != DISPLAY_NONE => {
                (self.settings.default_mouse_display_id, entry.indicator.position())
            }
            _ => (DISPLAY_NONE, (0.0, 0.0)),
        };

        if display_id != self.last_notified_pointer_display {
            trace!(display_id, "notifying pointer display id changed");
            self.last_notified_pointer_display = display_id;
            self.policy.notify_pointer_display_id_changed(display_id, position);
        }
    }

    fn debug_assert_invariants(&self) {
        if !cfg!(debug_assertions) {
            return;
        }

        for key in self.registry.keys() {
            if let IndicatorKey::Touch(device_id) | IndicatorKey::Stylus(device_id) = key {
                debug_assert!(
                    self.devices.get(*device_id).is_some(),
                    "indicator entry {key:?} references a device that is no longer live"
                );
            }
        }

        let default = self.settings.default_mouse_display_id;
        for key in self.registry.keys() {
            if let IndicatorKey::Mouse(display_id) = key {
                debug_assert!(
                    self.devices.has_mouse_targeting(*display_id, default),
                    "Mouse({display_id}) entry survives with no mouse device targeting it"
                );
            }
        }

        for key in self.registry.keys() {
            let expects_viewport = match key {
                IndicatorKey::Mouse(display_id) => self.topology.contains(*display_id),
                IndicatorKey::Touch(device_id) | IndicatorKey::Stylus(device_id) => self
                    .devices
                    .get(*device_id)
                    .is_some_and(|d| self.topology.contains(d.associated_display_id)),
            };
            let has_viewport =
                self.registry.get(key).expect("key from registry.keys()").indicator.display_viewport().is_some();
            debug_assert_eq!(
                has_viewport, expects_viewport,
                "indicator entry {key:?} viewport attachment disagrees with topology"
            );
        }

        let expected_pointer_display = match self.registry.get(&IndicatorKey::Mouse(default)) {
            Some(_) if default != DISPLAY_NONE => default,
            _ => DISPLAY_NONE,
        };
        debug_assert_eq!(
            self.last_notified_pointer_display, expected_pointer_display,
            "last notified pointer display is out of sync with the active default-mouse entry"
        );

        if self.settings.pointer_capture_enabled {
            for key in self.registry.keys().filter(|k| k.kind() == IndicatorKind::Mouse) {
                let shown = self.registry.get(key).expect("key from registry.keys()").indicator.is_pointer_shown();
                debug_assert!(!shown, "mouse indicator {key:?} shown while pointer capture is enabled");
            }
        }

        if !self.settings.show_touches_enabled {
            debug_assert!(
                !self.registry.keys().any(|k| k.kind() == IndicatorKind::Touch),
                "touch indicator survives with show-touches disabled"
            );
        }
        if !self.settings.stylus_icon_enabled {
            debug_assert!(
                !self.registry.keys().any(|k| k.kind() == IndicatorKind::Stylus),
                "stylus indicator survives with stylus icon disabled"
            );
        }
    }
}

fn pointer_id_at(event: &MotionEvent, index: usize) -> i32 {
    event.pointers.get(index).map(|p| p.pointer_id).unwrap_or(index as i32)
}
