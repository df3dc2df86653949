use serde::{Deserialize, Serialize};

pub const MAIN_COLORS: [&str; 5] = ["#24b0cb", "#ca75ed", "#f2c43e", "#746a5d", "#3ca60f"];
pub const ADDITIONAL_COLORS: [&str; 5] = ["#92d8e5", "#e5baf6", "#f9e29f", "#cabcaa", "#baeaa6"];
pub const ANTIFRAUD_MAIN_COLORS: [&str; 5] =
    ["#f2c43e", "#24b0cb", "#ca75ed", "#746a5d", "#3ca60f"];
pub const ANTIFRAUD_ADDITIONAL_COLORS: [&str; 5] =
    ["#f9e29f", "#92d8e5", "#e5baf6", "#cabcaa", "#baeaa6"];
pub const TREND_FILL_COLORS: [&str; 2] = ["#addfea", "#eac7f8"];
pub const EVENT_COLORS: [&str; 15] = [
    "#2b8ba3", "#814b98", "#d9b138", "#8e1919", "#2a740a", "#3dafcc", "#ca75ed", "#f2c43f",
    "#cb2424", "#3ca60f", "#b9e2ed", "#e7c1f6", "#f8e19f", "#e7a298", "#adda9b",
];

pub const AREA_FILL_ALPHA: f64 = 0.3;
pub const TREND_FILL_ALPHA: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaletteVariant {
    #[default]
    Default,
    Antifraud,
}

impl PaletteVariant {
    const fn main(self) -> &'static [&'static str; 5] {
        match self {
            Self::Default => &MAIN_COLORS,
            Self::Antifraud => &ANTIFRAUD_MAIN_COLORS,
        }
    }

    const fn additional(self) -> &'static [&'static str; 5] {
        match self {
            Self::Default => &ADDITIONAL_COLORS,
            Self::Antifraud => &ANTIFRAUD_ADDITIONAL_COLORS,
        }
    }
}

/// Palette entry: hex colour plus opacity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PaletteColor {
    pub hex: &'static str,
    pub alpha: f64,
}

impl PaletteColor {
    #[must_use]
    pub const fn opaque(hex: &'static str) -> Self {
        Self { hex, alpha: 1.0 }
    }

    #[must_use]
    pub const fn with_alpha(self, alpha: f64) -> Self {
        Self {
            hex: self.hex,
            alpha,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Family {
    Main,
    Additional,
}

const FALLBACK_FIRST_INDEX: usize = 5;

/// Colours for series indices 5..=21; larger indices wrap around.
const FALLBACK_TABLE: [(Family, usize, f64); 17] = [
    (Family::Additional, 0, 1.0),
    (Family::Additional, 0, 1.0),
    (Family::Additional, 1, 1.0),
    (Family::Additional, 2, 1.0),
    (Family::Additional, 3, 1.0),
    (Family::Additional, 4, 1.0),
    (Family::Additional, 0, 1.0),
    (Family::Main, 0, 0.6),
    (Family::Main, 1, 0.6),
    (Family::Main, 2, 0.6),
    (Family::Main, 3, 0.6),
    (Family::Main, 4, 0.6),
    (Family::Additional, 1, 0.4),
    (Family::Additional, 2, 0.8),
    (Family::Additional, 3, 0.12),
    (Family::Additional, 4, 0.16),
    (Family::Additional, 0, 0.2),
];

/// Colour for the overflow index `index >= 5`.
#[must_use]
pub fn fallback_color(index: usize, variant: PaletteVariant) -> PaletteColor {
    let slot = index.saturating_sub(FALLBACK_FIRST_INDEX) % FALLBACK_TABLE.len();
    let (family, position, alpha) = FALLBACK_TABLE[slot];
    let hex = match family {
        Family::Main => variant.main()[position],
        Family::Additional => variant.additional()[position],
    };
    PaletteColor { hex, alpha }
}

/// Line/bar colour of the `index`-th metric of an axis group.
///
/// Primary-axis metrics take the main palette, secondary-axis metrics the
/// lighter additional palette.
#[must_use]
pub fn series_color(index: usize, is_primary_axis: bool, variant: PaletteVariant) -> PaletteColor {
    if index < FALLBACK_FIRST_INDEX {
        let palette = if is_primary_axis {
            variant.main()
        } else {
            variant.additional()
        };
        return PaletteColor::opaque(palette[index]);
    }
    fallback_color(index, variant)
}

/// Translucent fill under an area series.
#[must_use]
pub fn area_fill_color(index: usize, variant: PaletteVariant) -> PaletteColor {
    series_color(index, true, variant).with_alpha(AREA_FILL_ALPHA)
}

#[must_use]
pub fn trend_fill_color(index: usize) -> PaletteColor {
    PaletteColor::opaque(TREND_FILL_COLORS[index % TREND_FILL_COLORS.len()])
        .with_alpha(TREND_FILL_ALPHA)
}

/// Deterministic colour for an event without its own colour.
#[must_use]
pub fn event_color(event_id: u64) -> &'static str {
    EVENT_COLORS[(event_id % EVENT_COLORS.len() as u64) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_table_boundaries() {
        let variant = PaletteVariant::Default;
        assert_eq!(fallback_color(6, variant), PaletteColor::opaque("#92d8e5"));
        assert_eq!(fallback_color(10, variant), PaletteColor::opaque("#baeaa6"));
        assert_eq!(
            fallback_color(12, variant),
            PaletteColor::opaque("#24b0cb").with_alpha(0.6)
        );
        assert_eq!(
            fallback_color(18, variant),
            PaletteColor::opaque("#f9e29f").with_alpha(0.8)
        );
        assert_eq!(
            fallback_color(21, variant),
            PaletteColor::opaque("#92d8e5").with_alpha(0.2)
        );
        assert_eq!(fallback_color(22, variant), fallback_color(5, variant));
    }

    #[test]
    fn secondary_axis_uses_additional_palette() {
        let color = series_color(1, false, PaletteVariant::Default);
        assert_eq!(color.hex, "#e5baf6");
    }
}
