//! Host-facing engine facade and its supporting pieces.

pub mod chart_scene;
mod data_controller;
mod engine;
mod engine_accessors;
pub mod engine_config;
mod engine_init;
pub mod engine_snapshot;
mod event_controller;
pub mod host;
mod interaction_coordinator;
pub mod json_contract;
pub mod render_frame_builder;
pub mod render_scheduler;

pub use chart_scene::{ChartScales, PlotArea, SecondaryAxis, SecondaryPlacement, compute_scales};
pub use engine::ChartEngine;
pub use engine_config::{ChartEngineConfig, EngineTimings, PlotMargins};
pub use engine_snapshot::{AxisSnapshot, EngineSnapshot};
pub use host::{ChartCallbacks, MetricToggler, NoopCallbacks, PeriodChanger};
pub use json_contract::{ENGINE_SNAPSHOT_JSON_SCHEMA_V1, EngineSnapshotJsonContractV1};
pub use render_frame_builder::{FrameInputs, build_render_frame};
pub use render_scheduler::{RedrawTicket, RenderScheduler, SchedulerState};
