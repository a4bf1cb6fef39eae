// Red-to-green heat coloring for roster value cells.
//
// Each value column is anchored on the min and max of the roster currently
// on screen, so colors must be recomputed whenever the roster changes.

use serde::{Serialize, Serializer};
use std::fmt;

use crate::aggregate::Aggregation;
use crate::catalog::{Category, CategoryMap};

/// Hue at the column minimum (red).
pub const HUE_MIN: f64 = 0.0;
/// Hue at the column maximum (green).
pub const HUE_MAX: f64 = 120.0;
/// Hue used when no gradient can be drawn (yellow).
pub const HUE_NEUTRAL: f64 = 60.0;

const SATURATION_PCT: u32 = 70;
const LIGHTNESS_PCT: u32 = 50;

/// An HSL color where only the hue varies. Renders as a CSS `hsl()` token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatColor {
    pub hue: f64,
}

impl HeatColor {
    pub fn neutral() -> Self {
        HeatColor { hue: HUE_NEUTRAL }
    }

    pub fn is_neutral(&self) -> bool {
        self.hue == HUE_NEUTRAL
    }

    /// CSS token, e.g. `hsl(84, 70%, 50%)`.
    pub fn css(&self) -> String {
        format!("hsl({:.0}, {}%, {}%)", self.hue, SATURATION_PCT, LIGHTNESS_PCT)
    }
}

impl fmt::Display for HeatColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.css())
    }
}

impl Serialize for HeatColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.css())
    }
}

/// Color for `value` on a column spanning `[min, max]`.
///
/// Missing or NaN values, non-finite bounds, and degenerate columns
/// (`min == max`) all map to the neutral color. Values outside the bounds are
/// clamped to the nearest end of the ramp.
pub fn color_for(value: Option<f64>, min: f64, max: f64) -> HeatColor {
    let Some(value) = value else {
        return HeatColor::neutral();
    };
    if !value.is_finite() || !min.is_finite() || !max.is_finite() || max <= min {
        return HeatColor::neutral();
    }
    let t = ((value - min) / (max - min)).clamp(0.0, 1.0);
    HeatColor {
        hue: HUE_MIN + t * (HUE_MAX - HUE_MIN),
    }
}

/// Observed `(min, max)` of one value column across a roster, ignoring
/// blanks. `None` when no row has a number.
pub fn column_bounds(agg: &Aggregation<'_>, cat: Category) -> Option<(f64, f64)> {
    agg.rows
        .iter()
        .filter_map(|r| r.value[cat])
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Per-cell colors for a roster's value columns plus its totals row.
#[derive(Debug, Clone, Serialize)]
pub struct RosterHeatmap {
    /// One entry per matched row, in the aggregation's row order.
    pub rows: Vec<CategoryMap<HeatColor>>,
    pub totals: CategoryMap<HeatColor>,
}

/// Color every value cell of `agg`, anchoring each column on the roster's
/// own min and max. Totals cells share their column's bounds.
pub fn roster_heatmap(agg: &Aggregation<'_>) -> RosterHeatmap {
    let bounds: CategoryMap<Option<(f64, f64)>> =
        CategoryMap::from_fn(|cat| column_bounds(agg, cat));

    let paint = |cat: Category, value: Option<f64>| match bounds[cat] {
        Some((lo, hi)) => color_for(value, lo, hi),
        None => HeatColor::neutral(),
    };

    let rows = agg
        .rows
        .iter()
        .map(|r| CategoryMap::from_fn(|cat| paint(cat, r.value[cat])))
        .collect();
    let totals = CategoryMap::from_fn(|cat| paint(cat, Some(agg.totals.value[cat])));

    RosterHeatmap { rows, totals }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
