// Roster aggregation: matched player rows plus a column-wise totals row.

use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

use crate::catalog::{round2, Category, CategoryMap};
use crate::dataset::{name_key, CanonicalDataset, PlayerRow};

/// Largest roster the application accepts.
pub const MAX_ROSTER_SIZE: usize = 13;

/// Players with fewer games than this are flagged as low-sample.
pub const LOW_GAMES_THRESHOLD: f64 = 40.0;

/// Appended to the display name of a low-sample player.
pub const LOW_GAMES_MARKER: &str = "*";

// ---------------------------------------------------------------------------
// Totals
// ---------------------------------------------------------------------------

/// Column-wise sums over a roster's matched rows. Blank cells count as zero.
///
/// Sums are kept at full precision; call `rounded()` for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TotalsRow {
    pub raw: CategoryMap<f64>,
    pub value: CategoryMap<f64>,
    #[serde(rename = "LeagV")]
    pub league_value: Option<f64>,
    #[serde(rename = "puntV")]
    pub punt_value: Option<f64>,
}

impl TotalsRow {
    /// The totals of an empty roster.
    pub fn zero() -> Self {
        TotalsRow {
            raw: CategoryMap::splat(0.0),
            value: CategoryMap::splat(0.0),
            league_value: None,
            punt_value: None,
        }
    }

    /// Number of value categories with a strictly positive total.
    pub fn positive_count(&self) -> usize {
        self.value.iter().filter(|(_, v)| *v > 0.0).count()
    }

    /// A copy with every number rounded to two decimals.
    pub fn rounded(&self) -> Self {
        TotalsRow {
            raw: self.raw.map(round2),
            value: self.value.map(round2),
            league_value: self.league_value.map(round2),
            punt_value: self.punt_value.map(round2),
        }
    }

    fn add(&mut self, row: &PlayerRow) {
        for cat in Category::ALL {
            self.raw[cat] += row.raw[cat].unwrap_or(0.0);
            self.value[cat] += row.value[cat].unwrap_or(0.0);
        }
        self.league_value = sum_optional(self.league_value, row.league_value);
        self.punt_value = sum_optional(self.punt_value, row.punt_value);
    }
}

impl Default for TotalsRow {
    fn default() -> Self {
        Self::zero()
    }
}

/// Sum that stays blank until some row contributes a number.
fn sum_optional(acc: Option<f64>, value: Option<f64>) -> Option<f64> {
    match (acc, value) {
        (Some(a), Some(v)) => Some(a + v),
        (None, Some(v)) => Some(v),
        (acc, None) => acc,
    }
}

// ---------------------------------------------------------------------------
// Display rows
// ---------------------------------------------------------------------------

/// A roster row ready for presentation: rounded numbers, ancillary columns
/// dropped, and the low-sample marker folded into the name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRow {
    pub name: String,
    pub games: Option<f64>,
    pub raw: CategoryMap<Option<f64>>,
    pub value: CategoryMap<Option<f64>>,
    #[serde(rename = "LeagV")]
    pub league_value: Option<f64>,
    #[serde(rename = "puntV")]
    pub punt_value: Option<f64>,
}

impl DisplayRow {
    pub fn from_player(row: &PlayerRow) -> Self {
        let low_sample = row.games.is_some_and(|g| g < LOW_GAMES_THRESHOLD);
        let name = if low_sample {
            format!("{}{}", row.name, LOW_GAMES_MARKER)
        } else {
            row.name.clone()
        };
        DisplayRow {
            name,
            games: row.games,
            raw: row.raw.map(|v| v.map(round2)),
            value: row.value.map(|v| v.map(round2)),
            league_value: row.league_value.map(round2),
            punt_value: row.punt_value.map(round2),
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// The dataset rows a roster resolved to, and their totals.
#[derive(Debug, Clone)]
pub struct Aggregation<'a> {
    /// Matched rows in dataset order.
    pub rows: Vec<&'a PlayerRow>,
    pub totals: TotalsRow,
}

impl Aggregation<'_> {
    /// Rounded, annotated rows for presentation.
    pub fn display_rows(&self) -> Vec<DisplayRow> {
        self.rows.iter().map(|r| DisplayRow::from_player(r)).collect()
    }
}

/// Resolve `roster` against `dataset` and sum the matched rows.
///
/// Matching is a case-insensitive comparison of trimmed names performed by
/// filtering the dataset, so a player named twice still contributes once.
/// Names with no matching row are dropped without error.
pub fn aggregate<'a, S: AsRef<str>>(dataset: &'a CanonicalDataset, roster: &[S]) -> Aggregation<'a> {
    let wanted: HashSet<String> = roster.iter().map(|n| name_key(n.as_ref())).collect();

    let rows: Vec<&PlayerRow> = dataset
        .rows
        .iter()
        .filter(|r| wanted.contains(&name_key(&r.name)))
        .collect();

    if rows.len() < wanted.len() {
        let matched: HashSet<String> = rows.iter().map(|r| name_key(&r.name)).collect();
        for name in wanted.difference(&matched) {
            debug!("roster name '{}' not found in {} dataset", name, dataset.variant);
        }
    }

    let mut totals = TotalsRow::zero();
    for row in &rows {
        totals.add(row);
    }

    Aggregation { rows, totals }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Variant;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn player(name: &str, pv: f64, rv: f64, games: f64) -> PlayerRow {
        let mut row = PlayerRow::named(name);
        row.games = Some(games);
        row.value[Category::Points] = Some(pv);
        row.value[Category::Rebounds] = Some(rv);
        row.raw[Category::Points] = Some(pv * 5.0);
        row
    }

    fn three_players() -> CanonicalDataset {
        CanonicalDataset::new(
            Variant::NoPunts,
            vec![
                player("A", 5.0, -2.0, 70.0),
                player("B", 3.0, 4.0, 30.0),
                player("C", 1.0, 1.0, 82.0),
            ],
        )
    }

    #[test]
    fn empty_roster_totals_are_zero() {
        let ds = three_players();
        let empty: [&str; 0] = [];
        let agg = aggregate(&ds, &empty);
        assert!(agg.rows.is_empty());
        assert_eq!(agg.totals, TotalsRow::zero());
        assert_eq!(agg.totals.positive_count(), 0);
    }

    #[test]
    fn sums_matched_rows() {
        let ds = three_players();
        let agg = aggregate(&ds, &["A", "B"]);
        assert_eq!(agg.rows.len(), 2);
        assert!(approx_eq(agg.totals.value[Category::Points], 8.0, 1e-10));
        assert!(approx_eq(agg.totals.value[Category::Rebounds], 2.0, 1e-10));
        assert!(approx_eq(agg.totals.raw[Category::Points], 40.0, 1e-10));
        assert_eq!(agg.totals.value[Category::Blocks], 0.0);
    }

    #[test]
    fn matching_ignores_case_and_whitespace() {
        let ds = three_players();
        let agg = aggregate(&ds, &["  a ", "c"]);
        let names: Vec<&str> = agg.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[test]
    fn unmatched_names_are_dropped() {
        let ds = three_players();
        let agg = aggregate(&ds, &["A", "Nobody"]);
        assert_eq!(agg.rows.len(), 1);
        assert!(approx_eq(agg.totals.value[Category::Points], 5.0, 1e-10));
    }

    #[test]
    fn duplicate_roster_names_count_once() {
        let ds = three_players();
        let agg = aggregate(&ds, &["B", "b", "B "]);
        assert_eq!(agg.rows.len(), 1);
        assert!(approx_eq(agg.totals.value[Category::Rebounds], 4.0, 1e-10));
    }

    #[test]
    fn rows_follow_dataset_order() {
        let ds = three_players();
        let agg = aggregate(&ds, &["C", "A"]);
        assert_eq!(agg.rows[0].name, "A");
        assert_eq!(agg.rows[1].name, "C");
    }

    #[test]
    fn low_games_player_is_marked() {
        let ds = three_players();
        let agg = aggregate(&ds, &["A", "B"]);
        let display = agg.display_rows();
        assert_eq!(display[0].name, "A");
        assert_eq!(display[1].name, "B*");
    }

    #[test]
    fn unknown_games_is_not_marked() {
        let ds = CanonicalDataset::new(Variant::NoPunts, vec![PlayerRow::named("X")]);
        let agg = aggregate(&ds, &["X"]);
        assert_eq!(agg.display_rows()[0].name, "X");
    }

    #[test]
    fn display_values_are_rounded() {
        let ds = CanonicalDataset::new(Variant::NoPunts, vec![player("A", 1.23456, 0.0, 60.0)]);
        let agg = aggregate(&ds, &["A"]);
        assert_eq!(agg.display_rows()[0].value[Category::Points], Some(1.23));
        assert_eq!(agg.totals.rounded().value[Category::Points], 1.23);
        // full precision retained on the totals themselves
        assert!(approx_eq(agg.totals.value[Category::Points], 1.23456, 1e-12));
    }

    #[test]
    fn extras_stay_blank_until_present() {
        let mut a = player("A", 1.0, 1.0, 60.0);
        a.league_value = Some(2.0);
        let b = player("B", 1.0, 1.0, 60.0);
        let ds = CanonicalDataset::new(Variant::TovPunt, vec![a, b]);

        let agg = aggregate(&ds, &["A", "B"]);
        assert_eq!(agg.totals.league_value, Some(2.0));
        assert_eq!(agg.totals.punt_value, None);
    }

    #[test]
    fn totals_serialize_with_column_keys() {
        let json = serde_json::to_value(TotalsRow::zero()).unwrap();
        assert_eq!(json["value"]["PTS"], 0.0);
        assert!(json["LeagV"].is_null());
    }
}
