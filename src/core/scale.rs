use chrono::NaiveDate;
use indexmap::IndexSet;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::types::TemporalKey;
use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScaleKind {
    Band,
    Linear,
    Time,
    Ordinal,
}

/// Domain of a scale: a numeric interval or a list of category labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScaleDomain {
    Continuous { min: f64, max: f64 },
    Categorical(Vec<String>),
}

/// Continuous linear map from a value domain to a pixel range.
///
/// A collapsed domain maps every value to the start of the range so flat
/// data never produces non-finite geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> ChartResult<Self> {
        for (name, value) in [
            ("domain start", domain.0),
            ("domain end", domain.1),
            ("range start", range.0),
            ("range end", range.1),
        ] {
            if !value.is_finite() {
                return Err(ChartError::InvalidData(format!(
                    "scale {name} must be finite"
                )));
            }
        }
        Ok(Self {
            domain_start: domain.0,
            domain_end: domain.1,
            range_start: range.0,
            range_end: range.1,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    #[must_use]
    pub fn is_degenerate(self) -> bool {
        self.domain_start == self.domain_end
    }

    #[must_use]
    pub fn project(self, value: f64) -> f64 {
        if self.is_degenerate() {
            return self.range_start;
        }
        let normalized = (value - self.domain_start) / (self.domain_end - self.domain_start);
        self.range_start + normalized * (self.range_end - self.range_start)
    }

    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        if self.range_start == self.range_end {
            return self.domain_start;
        }
        let normalized = (pixel - self.range_start) / (self.range_end - self.range_start);
        self.domain_start + normalized * (self.domain_end - self.domain_start)
    }
}

/// Calendar-date scale over an inclusive date extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    start: NaiveDate,
    end: NaiveDate,
    inner: LinearScale,
}

impl TimeScale {
    pub fn new(start: NaiveDate, end: NaiveDate, range: (f64, f64)) -> ChartResult<Self> {
        let inner = LinearScale::new(
            (
                TemporalKey::Date(start).ordinal(),
                TemporalKey::Date(end).ordinal(),
            ),
            range,
        )?;
        Ok(Self { start, end, inner })
    }

    #[must_use]
    pub fn extent(self) -> (NaiveDate, NaiveDate) {
        (self.start, self.end)
    }

    #[must_use]
    pub fn project(self, date: NaiveDate) -> f64 {
        self.inner.project(TemporalKey::Date(date).ordinal())
    }
}

/// Evenly divided categorical scale without padding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandScale {
    keys: IndexSet<TemporalKey>,
    range_start: f64,
    range_end: f64,
}

impl BandScale {
    /// Builds a band scale; duplicate keys keep their first position.
    #[must_use]
    pub fn new(keys: impl IntoIterator<Item = TemporalKey>, range: (f64, f64)) -> Self {
        Self {
            keys: keys.into_iter().collect(),
            range_start: range.0,
            range_end: range.1,
        }
    }

    #[must_use]
    pub fn keys(&self) -> &IndexSet<TemporalKey> {
        &self.keys
    }

    #[must_use]
    pub fn step(&self) -> f64 {
        if self.keys.is_empty() {
            return 0.0;
        }
        (self.range_end - self.range_start) / self.keys.len() as f64
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.step()
    }

    /// Left edge of the band holding `key`.
    #[must_use]
    pub fn position(&self, key: TemporalKey) -> Option<f64> {
        self.keys
            .get_index_of(&key)
            .map(|index| self.range_start + index as f64 * self.step())
    }
}

/// Horizontal scale of a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum XScale {
    Band(BandScale),
    /// Linear scale over ordinal keys (buckets, days of week).
    Linear {
        scale: LinearScale,
        ticks: Vec<TemporalKey>,
    },
    Time {
        scale: TimeScale,
        ticks: Vec<TemporalKey>,
    },
}

impl XScale {
    #[must_use]
    pub fn kind(&self) -> ScaleKind {
        match self {
            Self::Band(_) => ScaleKind::Band,
            Self::Linear { .. } => ScaleKind::Linear,
            Self::Time { .. } => ScaleKind::Time,
        }
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        match self {
            Self::Band(band) => (band.range_start, band.range_end),
            Self::Linear { scale, .. } => scale.range(),
            Self::Time { scale, .. } => scale.inner.range(),
        }
    }

    #[must_use]
    pub fn domain(&self) -> ScaleDomain {
        match self {
            Self::Band(band) => {
                ScaleDomain::Categorical(band.keys.iter().map(ToString::to_string).collect())
            }
            Self::Linear { scale, .. } => {
                let (min, max) = scale.domain();
                ScaleDomain::Continuous { min, max }
            }
            Self::Time { scale, .. } => {
                let (min, max) = scale.inner.domain();
                ScaleDomain::Continuous { min, max }
            }
        }
    }

    #[must_use]
    pub fn ticks(&self) -> Vec<TemporalKey> {
        match self {
            Self::Band(band) => band.keys.iter().copied().collect(),
            Self::Linear { ticks, .. } | Self::Time { ticks, .. } => ticks.clone(),
        }
    }

    /// Width available to one bar; continuous scales use the tick spacing.
    #[must_use]
    pub fn band_width(&self) -> f64 {
        match self {
            Self::Band(band) => band.bandwidth(),
            Self::Linear { .. } | Self::Time { .. } => {
                let (start, end) = self.range();
                let count = self.ticks().len().max(1);
                (end - start).abs() / count as f64
            }
        }
    }

    /// Pixel anchor of `key`: band centre or continuous position.
    #[must_use]
    pub fn anchor(&self, key: TemporalKey) -> Option<f64> {
        match self {
            Self::Band(band) => band
                .position(key)
                .map(|left| left + band.bandwidth() / 2.0),
            Self::Linear { scale, .. } => Some(scale.project(key.ordinal())),
            Self::Time { scale, .. } => match key {
                TemporalKey::Date(date) => Some(scale.project(date)),
                _ => None,
            },
        }
    }

    /// Tick key whose anchor is closest to `pixel`.
    #[must_use]
    pub fn nearest_key(&self, pixel: f64) -> Option<TemporalKey> {
        self.ticks()
            .into_iter()
            .filter_map(|key| self.anchor(key).map(|anchor| (key, anchor)))
            .min_by_key(|(_, anchor)| OrderedFloat((anchor - pixel).abs()))
            .map(|(key, _)| key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_linear_scale_maps_to_range_start() {
        let scale = LinearScale::new((0.0, 0.0), (300.0, 0.0)).expect("scale");
        assert_eq!(scale.project(0.0), 300.0);
        assert_eq!(scale.project(10.0), 300.0);
    }

    #[test]
    fn band_scale_deduplicates_keys() {
        let band = BandScale::new(
            [
                TemporalKey::Hour(1),
                TemporalKey::Hour(2),
                TemporalKey::Hour(1),
            ],
            (0.0, 100.0),
        );
        assert_eq!(band.keys().len(), 2);
        assert_eq!(band.position(TemporalKey::Hour(2)), Some(50.0));
    }
}
