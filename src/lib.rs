//! An in-process stage of an input pipeline, sitting between device
//! classification and window dispatch.
//!
//! This crate owns the *visual state* of on-screen pointer indicators
//! (mouse cursors, touch spots, stylus hover icons) across a potentially
//! multi-display system, and rewrites in-flight mouse/stylus motion events so
//! their coordinates, display target, and cursor position stay consistent
//! with that visual state.
//!
//! It does not rasterize cursor sprites, recognize gestures, decide capture
//! policy, route events to windows, or persist anything across restarts —
//! those are external collaborators, reached only through [`Indicator`],
//! [`IndicatorFactory`], [`Policy`] and [`InnerListener`].
//!
//! The orchestrator is [`Choreographer`]; start there.

mod choreographer;
mod config;
mod device;
mod event;
mod indicator;
mod mouse;
mod policy;
mod registry;
mod viewport;

pub use choreographer::Choreographer;
pub use config::PolicySettings;
pub use device::{Device, DeviceId, DeviceRegistry, Source};
pub use event::{
    DeviceListChangedEvent, DeviceResetEvent, Event, InnerListener, MotionAction, MotionEvent,
    OpaqueEvent, PointerCaptureChangedEvent, PointerCaptureRequest, PointerCoords, SeqId,
    INVALID_CURSOR_POSITION,
};
pub use indicator::{Indicator, IndicatorFactory, IndicatorKind};
pub use registry::{IndicatorEntry, IndicatorKey, IndicatorRegistry};
pub use viewport::{DisplayId, DisplayTopology, Viewport, DISPLAY_NONE};
pub use policy::Policy;
