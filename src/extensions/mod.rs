//! Overlays layered on top of the core series pipeline.
//!
//! Extensions read core types but core never depends on them.

pub mod event_overlay;

pub use event_overlay::{
    AnnotationInterval, EventAnnotation, EventMarker, EventOverlay, EventRecord, ShortEvent,
    expand_days, map_events, period_supports_events,
};
