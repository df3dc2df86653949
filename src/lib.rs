//! metric-chart-rs: business-metrics chart engine.
//!
//! The crate turns raw per-day metric series into renderable chart state:
//! period bucketing, nice axis ticks, dual value axes, a debounced redraw
//! scheduler, tooltip and legend interaction, and event annotations. Drawing
//! itself is left to a [`render::Renderer`] backend that receives a fully
//! materialized [`render::RenderFrame`].

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{ChartEngine, ChartEngineConfig};
pub use error::{ChartError, ChartResult};
