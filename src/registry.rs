//! One entry per active pointer instance, owning the [`Indicator`]'s lifetime.

use std::cell::Cell;
use std::collections::HashMap;

use tracing::trace;

use crate::device::DeviceId;
use crate::indicator::{Indicator, IndicatorFactory, IndicatorKind};
use crate::viewport::{DisplayId, Viewport};

/// Identifies one active pointer instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorKey {
    /// One per display currently hosting a mouse pointer.
    Mouse(DisplayId),
    /// One per touch device actively producing touch events.
    Touch(DeviceId),
    /// One per stylus device actively producing hover events.
    Stylus(DeviceId),
}

impl IndicatorKey {
    pub fn kind(&self) -> IndicatorKind {
        match self {
            IndicatorKey::Mouse(_) => IndicatorKind::Mouse,
            IndicatorKey::Touch(_) => IndicatorKind::Touch,
            IndicatorKey::Stylus(_) => IndicatorKind::Stylus,
        }
    }
}

/// A live indicator and the registry's bookkeeping about it.
pub struct IndicatorEntry {
    pub key: IndicatorKey,
    pub indicator: Box<dyn Indicator>,
}

/// Owns every active [`Indicator`], keyed by [`IndicatorKey`]. Entries are
/// created lazily in response to qualifying events, never eagerly on device
/// add — allocating an indicator is comparatively expensive and most devices
/// never produce a qualifying event in a given session.
#[derive(Default)]
pub struct IndicatorRegistry {
    entries: HashMap<IndicatorKey, IndicatorEntry>,
    // Guards against a factory reentrantly requesting a second indicator
    // before the first call to `create_indicator` has returned and been
    // installed. See `Choreographer`'s reentrancy contract.
    create_in_flight: Cell<bool>,
}

impl IndicatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry for `key`, creating it via `factory` on first call.
    /// Idempotent: a second call with the same key is a no-op besides the
    /// viewport attach.
    pub fn ensure(
        &mut self,
        key: IndicatorKey,
        factory: &mut dyn IndicatorFactory,
        viewport: Option<Viewport>,
    ) -> &mut IndicatorEntry {
        if !self.entries.contains_key(&key) {
            debug_assert!(
                !self.create_in_flight.get(),
                "IndicatorRegistry::ensure called reentrantly while a create was outstanding"
            );
            self.create_in_flight.set(true);
            let indicator = factory.create_indicator(key.kind());
            self.create_in_flight.set(false);

            let mut entry = IndicatorEntry { key, indicator };
            entry.indicator.set_display_viewport(viewport);
            trace!(?key, "created indicator");
            self.entries.insert(key, entry);
        } else if let Some(entry) = self.entries.get_mut(&key) {
            if entry.indicator.display_viewport() != viewport {
                entry.indicator.set_display_viewport(viewport);
            }
        }
        self.entries.get_mut(&key).expect("just ensured")
    }

    pub fn get(&self, key: &IndicatorKey) -> Option<&IndicatorEntry> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &IndicatorKey) -> Option<&mut IndicatorEntry> {
        self.entries.get_mut(key)
    }

    pub fn contains(&self, key: &IndicatorKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Destroys the entry for `key`, if any, releasing the indicator's
    /// resources before returning.
    pub fn drop_entry(&mut self, key: &IndicatorKey) {
        if self.entries.remove(key).is_some() {
            trace!(?key, "dropped indicator");
        }
    }

    pub fn attach_viewport(&mut self, key: &IndicatorKey, viewport: Option<Viewport>) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.indicator.set_display_viewport(viewport);
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &IndicatorKey> {
        self.entries.keys()
    }

    /// Applies `f` to every entry whose key is of `kind`.
    pub fn for_each_mut(&mut self, kind: IndicatorKind, mut f: impl FnMut(&mut IndicatorEntry)) {
        for entry in self.entries.values_mut() {
            if entry.key.kind() == kind {
                f(entry);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
