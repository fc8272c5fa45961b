//! The event kinds that flow through the choreographer, upstream from the
//! classifier and downstream to the inner listener.

use crate::device::{Device, DeviceId, Source};
use crate::viewport::DisplayId;

/// Monotonic id assigned by the upstream classifier to each dispatched event.
pub type SeqId = u32;

/// Sentinel cursor coordinate reported on events that carry no meaningful
/// cursor position, e.g. relative motion delivered under pointer capture.
pub const INVALID_CURSOR_POSITION: (f32, f32) = (f32::NAN, f32::NAN);

/// A single pointer's coordinates within a [`MotionEvent`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerCoords {
    pub pointer_id: i32,
    pub x: f32,
    pub y: f32,
    /// Relative motion since the previous event, valid for mouse sources.
    pub relative_x: f32,
    pub relative_y: f32,
}

impl PointerCoords {
    pub fn new(pointer_id: i32, x: f32, y: f32) -> Self {
        Self { pointer_id, x, y, relative_x: 0.0, relative_y: 0.0 }
    }

    pub fn with_relative(mut self, relative_x: f32, relative_y: f32) -> Self {
        self.relative_x = relative_x;
        self.relative_y = relative_y;
        self
    }
}

/// The action a [`MotionEvent`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionAction {
    Down,
    PointerDown(usize),
    PointerUp(usize),
    Up,
    Move,
    Cancel,
    HoverEnter,
    HoverMove,
    HoverExit,
}

impl MotionAction {
    pub fn is_hover(&self) -> bool {
        matches!(self, Self::HoverEnter | Self::HoverMove | Self::HoverExit)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MotionEvent {
    pub seq_id: SeqId,
    pub event_time: i64,
    pub source: Source,
    pub device_id: DeviceId,
    pub display_id: DisplayId,
    pub action: MotionAction,
    pub pointers: Vec<PointerCoords>,
    pub cursor_position: (f32, f32),
}

impl MotionEvent {
    /// Index into `pointers` referenced by [`MotionAction::Down`]-family actions.
    pub fn primary_pointer_index(&self) -> usize {
        match self.action {
            MotionAction::PointerDown(i) | MotionAction::PointerUp(i) => i,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeviceListChangedEvent {
    pub seq_id: SeqId,
    pub devices: Vec<Device>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceResetEvent {
    pub seq_id: SeqId,
    pub event_time: i64,
    pub device_id: DeviceId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerCaptureRequest {
    pub enable: bool,
    pub seq: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerCaptureChangedEvent {
    pub seq_id: SeqId,
    pub event_time: i64,
    pub request: PointerCaptureRequest,
}

/// Pass-through event payloads. The choreographer never inspects their
/// contents; it forwards them byte-for-byte to the inner listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpaqueEvent {
    pub seq_id: SeqId,
    pub event_time: i64,
}

/// An event dispatched from the input classifier, rewritten (for motion) and
/// forwarded by the choreographer to its inner listener.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    DeviceListChanged(DeviceListChangedEvent),
    ConfigurationChanged(OpaqueEvent),
    Key(OpaqueEvent),
    Motion(MotionEvent),
    Sensor(OpaqueEvent),
    Switch(OpaqueEvent),
    DeviceReset(DeviceResetEvent),
    PointerCaptureChanged(PointerCaptureChangedEvent),
    VibratorState(OpaqueEvent),
}

/// The downstream target a [`crate::choreographer::Choreographer`] forwards
/// (possibly rewritten) events to. Implementations MUST NOT reenter the
/// choreographer from within `notify`.
pub trait InnerListener {
    fn notify(&mut self, event: Event);
}
