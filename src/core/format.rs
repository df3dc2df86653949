//! Number, currency, duration and axis-label formatting.

use chrono::{Datelike, Days};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::core::temporal::BucketIndex;
use crate::core::types::{ColumnType, Period, TemporalKey};

pub const MONTH_NAMES: [&str; 12] = [
    "Январь",
    "Февраль",
    "Март",
    "Апрель",
    "Май",
    "Июнь",
    "Июль",
    "Август",
    "Сентябрь",
    "Октябрь",
    "Ноябрь",
    "Декабрь",
];
pub const WEEKDAY_NAMES: [&str; 7] = ["Пн", "Вт", "Ср", "Чт", "Пт", "Сб", "Вс"];

const THOUSANDS_SEPARATOR: char = ' ';

fn rounded(value: f64, decimals: u32) -> Decimal {
    Decimal::from_f64(value)
        .unwrap_or_default()
        .round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero)
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(THOUSANDS_SEPARATOR);
        }
        grouped.push(digit);
    }
    grouped
}

/// Formats `value` with `decimals` fraction digits and space-grouped thousands.
#[must_use]
pub fn format_fixed(value: f64, decimals: u32) -> String {
    let text = format!("{:.prec$}", rounded(value, decimals), prec = decimals as usize);
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };
    // "-0" is not a meaningful label.
    let is_zero = |digits: &str| digits.chars().all(|c| c == '0');
    let sign = if is_zero(integer) && fraction.is_none_or(is_zero) {
        ""
    } else {
        sign
    };
    match fraction {
        Some(fraction) => format!("{sign}{}.{fraction}", group_thousands(integer)),
        None => format!("{sign}{}", group_thousands(integer)),
    }
}

/// Rounded integer with grouped thousands: `1234567.4 -> "1 234 567"`.
#[must_use]
pub fn format_thousands(value: f64) -> String {
    format_fixed(value, 0)
}

/// Renders seconds as `[-]HH:MM:SS`, omitting the hour part when it is zero.
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    let total = rounded(seconds, 0).to_i64().unwrap_or_default();
    if total == 0 {
        return "0".to_owned();
    }
    let sign = if total < 0 { "-" } else { "" };
    let total = total.unsigned_abs();
    let (hours, minutes, secs) = (total / 3600, total % 3600 / 60, total % 60);
    if hours > 0 {
        format!("{sign}{hours:02}:{minutes:02}:{secs:02}")
    } else {
        format!("{sign}{minutes:02}:{secs:02}")
    }
}

#[must_use]
pub fn format_percent(ratio: f64) -> String {
    format!("{}%", format_fixed(ratio * 100.0, 2))
}

/// Tooltip/legend representation of a raw metric value.
#[must_use]
pub fn format_value(
    value: f64,
    column_type: ColumnType,
    unit: Option<&str>,
    fallback_unit: &str,
) -> String {
    match column_type {
        ColumnType::Plain => format_thousands(value),
        ColumnType::Currency | ColumnType::Sum => {
            format!("{} {}", format_thousands(value), unit.unwrap_or(fallback_unit))
        }
        ColumnType::Percent => format_percent(value),
        ColumnType::Time => format_duration(value),
    }
}

/// Y-axis label for a tick value.
#[must_use]
pub fn format_axis_tick(value: f64, column_type: ColumnType) -> String {
    match column_type {
        ColumnType::Percent => format_percent(value),
        ColumnType::Time => format_duration(value),
        _ => format_thousands(value),
    }
}

/// Y-axis label of trend charts, whose values are ratios.
#[must_use]
pub fn format_trend_tick(value: f64) -> String {
    format!("{:.2}%", rounded(value * 100.0, 2))
}

/// X-axis label for `key`.
///
/// Week/month buckets are resolved back to their start date through
/// `bucket_index`; unknown buckets render as an empty label.
#[must_use]
pub fn format_x_tick(key: TemporalKey, period: Period, bucket_index: &BucketIndex) -> String {
    match key {
        TemporalKey::Hour(hour) => format!("{hour:02}"),
        TemporalKey::DayOfWeek(day) => WEEKDAY_NAMES
            .get(usize::from(day).wrapping_sub(1))
            .map_or_else(String::new, |name| (*name).to_owned()),
        TemporalKey::Date(date) => date.format("%d.%m").to_string(),
        TemporalKey::Bucket(bucket) => {
            let Some(start) = bucket_index.start_date(bucket) else {
                return String::new();
            };
            match period {
                Period::Month => MONTH_NAMES[start.month0() as usize].to_owned(),
                _ => {
                    let end = start.checked_add_days(Days::new(6)).unwrap_or(start);
                    format!("{} - {}", start.format("%d.%m"), end.format("%d.%m"))
                }
            }
        }
    }
}
