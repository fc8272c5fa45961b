//! Test doubles shared across the behavioral test suite.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use pointer_choreographer::{
    DisplayId, Event, Indicator, IndicatorFactory, IndicatorKind, InnerListener, Policy, Viewport,
};

#[derive(Debug, Default)]
pub struct IndicatorState {
    pub kind: Option<IndicatorKind>,
    pub viewport: Option<Viewport>,
    pub position: (f32, f32),
    pub shown: bool,
    pub spots: HashMap<DisplayId, HashSet<i32>>,
}

/// An [`Indicator`] whose state is observable from the test after the
/// choreographer has dropped its own reference.
#[derive(Debug, Clone)]
pub struct FakeIndicator {
    pub state: Rc<RefCell<IndicatorState>>,
}

impl FakeIndicator {
    fn new(kind: IndicatorKind) -> Self {
        let state = IndicatorState { kind: Some(kind), ..Default::default() };
        Self { state: Rc::new(RefCell::new(state)) }
    }
}

impl Indicator for FakeIndicator {
    fn set_display_viewport(&mut self, viewport: Option<Viewport>) {
        self.state.borrow_mut().viewport = viewport;
    }
    fn display_viewport(&self) -> Option<Viewport> {
        self.state.borrow().viewport
    }
    fn set_position(&mut self, x: f32, y: f32) {
        self.state.borrow_mut().position = (x, y);
    }
    fn position(&self) -> (f32, f32) {
        self.state.borrow().position
    }
    fn show(&mut self) {
        self.state.borrow_mut().shown = true;
    }
    fn hide(&mut self) {
        self.state.borrow_mut().shown = false;
    }
    fn is_pointer_shown(&self) -> bool {
        self.state.borrow().shown
    }
    fn set_spots(&mut self, display_id: DisplayId, pointer_ids: &[i32]) {
        self.state.borrow_mut().spots.insert(display_id, pointer_ids.iter().copied().collect());
    }
    fn clear_spots(&mut self, display_id: DisplayId) {
        self.state.borrow_mut().spots.remove(&display_id);
    }
    fn spots(&self) -> HashMap<DisplayId, HashSet<i32>> {
        self.state.borrow().spots.clone()
    }
}

/// Stands in for both the `IndicatorFactory` and the policy's display
/// notifications, and records everything observable about each so tests can
/// assert against it without reaching back into the choreographer.
#[derive(Default)]
pub struct RecordingPolicy {
    pub created: Vec<(IndicatorKind, FakeIndicator)>,
    pub pending_create: bool,
    pub notifications: Vec<(DisplayId, (f32, f32))>,
}

impl IndicatorFactory for RecordingPolicy {
    fn create_indicator(&mut self, kind: IndicatorKind) -> Box<dyn Indicator> {
        assert!(!self.pending_create, "a create_indicator call was still outstanding");
        self.pending_create = true;
        let fake = FakeIndicator::new(kind);
        self.created.push((kind, fake.clone()));
        self.pending_create = false;
        Box::new(fake)
    }
}

impl Policy for RecordingPolicy {
    fn notify_pointer_display_id_changed(&mut self, display_id: DisplayId, position: (f32, f32)) {
        self.notifications.push((display_id, position));
    }
}

impl RecordingPolicy {
    pub fn mouse_indicators(&self) -> Vec<FakeIndicator> {
        self.created.iter().filter(|(kind, _)| *kind == IndicatorKind::Mouse).map(|(_, i)| i.clone()).collect()
    }

    pub fn count_of(&self, kind: IndicatorKind) -> usize {
        self.created.iter().filter(|(k, _)| *k == kind).count()
    }
}

#[derive(Default)]
pub struct RecordingListener {
    pub events: Vec<Event>,
}

impl InnerListener for RecordingListener {
    fn notify(&mut self, event: Event) {
        self.events.push(event);
    }
}

/// A cheaply-cloneable handle onto a `T`, so a test can keep asserting
/// against a `RecordingPolicy`/`RecordingListener` after handing a handle of
/// the same type to the `Choreographer`, which takes its collaborators by
/// value.
pub struct Shared<T>(Rc<RefCell<T>>);

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: Default> Default for Shared<T> {
    fn default() -> Self {
        Self(Rc::new(RefCell::new(T::default())))
    }
}

impl<T> Shared<T> {
    pub fn borrow(&self) -> std::cell::Ref<'_, T> {
        self.0.borrow()
    }
}

impl IndicatorFactory for Shared<RecordingPolicy> {
    fn create_indicator(&mut self, kind: IndicatorKind) -> Box<dyn Indicator> {
        self.0.borrow_mut().create_indicator(kind)
    }
}

impl Policy for Shared<RecordingPolicy> {
    fn notify_pointer_display_id_changed(&mut self, display_id: DisplayId, position: (f32, f32)) {
        self.0.borrow_mut().notify_pointer_display_id_changed(display_id, position);
    }
}

impl InnerListener for Shared<RecordingListener> {
    fn notify(&mut self, event: Event) {
        self.0.borrow_mut().notify(event);
    }
}
