use indexmap::IndexSet;

use crate::core::scale::{BandScale, LinearScale, TimeScale, XScale};
use crate::core::types::{ChartKind, Period, TemporalKey};
use crate::error::ChartResult;

const DAY_OF_WEEK_DOMAIN: (f64, f64) = (1.0, 7.0);

/// Computes the horizontal scale for the keys present in the data.
///
/// Bar-like charts and hourly data use a band scale; daily data uses a
/// calendar scale over the date extent; week/month buckets use a linear
/// scale over `[0, n - 1]`; days of week use a fixed `[1, 7]` domain.
pub fn compute_x_scale(
    keys: impl IntoIterator<Item = TemporalKey>,
    width: f64,
    period: Period,
    chart_kind: ChartKind,
) -> ChartResult<XScale> {
    let keys: IndexSet<TemporalKey> = keys.into_iter().collect();
    let range = (0.0, width);

    if chart_kind.is_banded() || period == Period::Hour {
        return Ok(XScale::Band(BandScale::new(keys, range)));
    }

    match period {
        Period::Day => {
            let mut dates: Vec<_> = keys
                .iter()
                .filter_map(|key| match key {
                    TemporalKey::Date(date) => Some(*date),
                    _ => None,
                })
                .collect();
            dates.sort_unstable();
            dates.dedup();
            match (dates.first(), dates.last()) {
                (Some(start), Some(end)) => Ok(XScale::Time {
                    scale: TimeScale::new(*start, *end, range)?,
                    ticks: dates.iter().copied().map(TemporalKey::Date).collect(),
                }),
                _ => Ok(XScale::Band(BandScale::new([], range))),
            }
        }
        Period::Week | Period::Month => {
            let last = keys
                .iter()
                .filter_map(|key| match key {
                    TemporalKey::Bucket(index) => Some(*index),
                    _ => None,
                })
                .max();
            let Some(last) = last else {
                return Ok(XScale::Band(BandScale::new([], range)));
            };
            Ok(XScale::Linear {
                scale: LinearScale::new((0.0, last as f64), range)?,
                ticks: (0..=last).map(TemporalKey::Bucket).collect(),
            })
        }
        Period::DayOfWeek => Ok(XScale::Linear {
            scale: LinearScale::new(DAY_OF_WEEK_DOMAIN, range)?,
            ticks: (1..=7).map(TemporalKey::DayOfWeek).collect(),
        }),
        Period::Hour => Ok(XScale::Band(BandScale::new(keys, range))),
    }
}
