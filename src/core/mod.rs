pub mod format;
pub mod layout;
pub mod palette;
pub mod scale;
pub mod series_transform;
pub mod temporal;
pub mod ticks;
pub mod types;
pub mod value_scale;
pub mod x_scale;

pub use format::{format_value, format_x_tick};
pub use layout::{DonutColumn, DonutDataset, DonutRow, DonutSlice, donut_slices};
pub use palette::{PaletteColor, PaletteVariant, series_color};
pub use scale::{BandScale, LinearScale, ScaleDomain, ScaleKind, TimeScale, XScale};
pub use series_transform::{
    BucketedSeries, KeyGroup, SeriesTransform, TransformedSeries, split_forecast, transform,
};
pub use temporal::BucketIndex;
pub use ticks::{DEFAULT_TICK_GRANULARITY, PERCENT_TICK_GRANULARITY, compute_ticks};
pub use types::{
    ChartKind, ColumnType, DataPoint, MetricSeries, Period, RawDataPoint, RawDate, TemporalKey,
    Viewport,
};
pub use value_scale::{DualAxisNormalization, YDomainOptions, YScale, compute_y_scale};
pub use x_scale::compute_x_scale;
