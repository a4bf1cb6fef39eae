// One-call roster evaluation: rows, totals, heat colors, grade and punts.

use serde::Serialize;

use crate::aggregate::{aggregate, DisplayRow, TotalsRow};
use crate::catalog::CategoryMap;
use crate::color::{roster_heatmap, HeatColor};
use crate::dataset::{CanonicalDataset, Variant};
use crate::grade::{grade, TeamGrade};
use crate::punt::{enumerate_punts, PuntStrategy};

/// A display row paired with its value-cell colors.
#[derive(Debug, Clone, Serialize)]
pub struct ColoredRow {
    #[serde(flatten)]
    pub row: DisplayRow,
    pub colors: CategoryMap<HeatColor>,
}

/// Everything shown for an assembled roster.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterReport {
    pub variant: Variant,
    pub rows: Vec<ColoredRow>,
    /// Rounded to two decimals.
    pub totals: TotalsRow,
    pub totals_colors: CategoryMap<HeatColor>,
    pub grade: TeamGrade,
    pub punt_strategies: Vec<PuntStrategy>,
}

/// Evaluate `roster` against `dataset`. Grade and punt candidates are
/// decided on unrounded totals.
pub fn evaluate_roster(dataset: &CanonicalDataset, roster: &[impl AsRef<str>]) -> RosterReport {
    let agg = aggregate(dataset, roster);
    let heatmap = roster_heatmap(&agg);

    let rows = agg
        .display_rows()
        .into_iter()
        .zip(heatmap.rows)
        .map(|(row, colors)| ColoredRow { row, colors })
        .collect();

    RosterReport {
        variant: dataset.variant,
        rows,
        totals: agg.totals.rounded(),
        totals_colors: heatmap.totals,
        grade: grade(&agg.totals),
        punt_strategies: enumerate_punts(&agg.totals),
    }
}
