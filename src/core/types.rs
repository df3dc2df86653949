use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Aggregation period of the horizontal axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Period {
    Hour,
    #[default]
    Day,
    Week,
    Month,
    DayOfWeek,
}

impl Period {
    /// Week and month data are re-keyed by ordinal position instead of date.
    #[must_use]
    pub const fn is_bucketed(self) -> bool {
        matches!(self, Self::Week | Self::Month)
    }

    /// Nominal width of one x-axis label, used for label thinning.
    #[must_use]
    pub const fn tick_label_width_px(self) -> f64 {
        match self {
            Self::Hour => 24.0,
            Self::Day | Self::DayOfWeek => 36.0,
            Self::Week => 85.0,
            Self::Month => 60.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    #[default]
    Linear,
    Area,
    Bar,
    Donut,
    Stack,
    Trend,
    DoubleDonut,
}

impl ChartKind {
    /// Bar-like charts share a band x-scale and a zero-based y-domain.
    #[must_use]
    pub const fn is_banded(self) -> bool {
        matches!(self, Self::Bar | Self::Stack)
    }

    #[must_use]
    pub const fn is_radial(self) -> bool {
        matches!(self, Self::Donut | Self::DoubleDonut)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    Plain,
    Currency,
    Percent,
    Time,
    Sum,
}

/// Discretized x-axis position of one data point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TemporalKey {
    Date(NaiveDate),
    Hour(u8),
    /// Ordinal position of a week/month raw date in the deduplicated date list.
    Bucket(usize),
    DayOfWeek(u8),
}

impl TemporalKey {
    /// Numeric coordinate used by continuous scales.
    #[must_use]
    pub fn ordinal(self) -> f64 {
        match self {
            Self::Date(date) => f64::from(date.num_days_from_ce()),
            Self::Hour(hour) => f64::from(hour),
            Self::Bucket(index) => index as f64,
            Self::DayOfWeek(day) => f64::from(day),
        }
    }
}

impl fmt::Display for TemporalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Hour(hour) => write!(f, "{hour}"),
            Self::Bucket(index) => write!(f, "{index}"),
            Self::DayOfWeek(day) => write!(f, "{day}"),
        }
    }
}

/// Date field as delivered by the host: calendar text or a bare integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDate {
    Number(i64),
    Text(String),
}

impl RawDate {
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}

impl fmt::Display for RawDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for RawDate {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<i64> for RawDate {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

/// One upstream sample of one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDataPoint {
    #[serde(rename = "id")]
    pub series_id: String,
    #[serde(default)]
    pub metric_name: String,
    pub date: RawDate,
    #[serde(default)]
    pub value: Option<f64>,
}

impl RawDataPoint {
    #[must_use]
    pub fn new(
        series_id: impl Into<String>,
        metric_name: impl Into<String>,
        date: impl Into<RawDate>,
        value: Option<f64>,
    ) -> Self {
        Self {
            series_id: series_id.into(),
            metric_name: metric_name.into(),
            date: date.into(),
            value,
        }
    }
}

/// One axis group of metrics as supplied by the host.
///
/// Points of several metrics share a group; `series_id` distinguishes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSeries {
    pub id: String,
    #[serde(rename = "columnName")]
    pub display_name: String,
    #[serde(rename = "isMain", default = "default_primary_axis")]
    pub is_primary_axis: bool,
    #[serde(default)]
    pub column_type: ColumnType,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(rename = "data", default)]
    pub points: Vec<RawDataPoint>,
}

fn default_primary_axis() -> bool {
    true
}

impl MetricSeries {
    #[must_use]
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            is_primary_axis: true,
            column_type: ColumnType::Plain,
            unit: None,
            points: Vec::new(),
        }
    }

    #[must_use]
    pub fn secondary(mut self) -> Self {
        self.is_primary_axis = false;
        self
    }

    #[must_use]
    pub fn with_column_type(mut self, column_type: ColumnType) -> Self {
        self.column_type = column_type;
        self
    }

    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    #[must_use]
    pub fn with_point(mut self, point: RawDataPoint) -> Self {
        self.points.push(point);
        self
    }

    #[must_use]
    pub fn with_points(mut self, points: impl IntoIterator<Item = RawDataPoint>) -> Self {
        self.points.extend(points);
        self
    }
}

/// Bucketed sample; `value == None` marks a gap in the line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub key: TemporalKey,
    pub value: Option<f64>,
    pub series_id: String,
    pub metric_name: String,
}

impl DataPoint {
    #[must_use]
    pub fn new(key: TemporalKey, value: Option<f64>, series_id: impl Into<String>) -> Self {
        Self {
            key,
            value,
            series_id: series_id.into(),
            metric_name: String::new(),
        }
    }
}
