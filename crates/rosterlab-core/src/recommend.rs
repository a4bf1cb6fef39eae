// Need-weighted recommendation of available players.
//
// Each candidate is scored as a weighted sum of its value columns. Weights
// start at 1.0, punted categories are zeroed, and the roster's three weakest
// remaining categories get a bump so the shortlist leans toward filling
// current gaps.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::aggregate::aggregate;
use crate::catalog::{round2, round3, Category, CategoryMap};
use crate::dataset::{name_key, CanonicalDataset, PlayerRow, Variant};
use crate::error::{ParseError, RecommendError};

/// Longest shortlist returned.
pub const MAX_RECOMMENDATIONS: usize = 25;

/// Weight added to each of the roster's weakest categories.
pub const WEAK_CATEGORY_BOOST: f64 = 0.35;

/// How many weak categories receive the boost.
pub const WEAK_CATEGORY_COUNT: usize = 3;

/// How many contributing categories explain each recommendation.
pub const TOP_CONTRIBUTOR_COUNT: usize = 3;

// ---------------------------------------------------------------------------
// Scoring mode
// ---------------------------------------------------------------------------

/// Which categories count toward a recommendation score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum ScoringMode {
    /// All nine categories.
    #[default]
    #[serde(rename = "9cat")]
    NineCat,
    /// Turnovers dropped entirely.
    #[serde(rename = "8cat")]
    EightCat,
}

impl ScoringMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ScoringMode::NineCat => "9cat",
            ScoringMode::EightCat => "8cat",
        }
    }

    /// Categories scored under this mode, in catalog order.
    pub fn active_categories(self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|&c| !(self == ScoringMode::EightCat && c == Category::Turnovers))
            .collect()
    }
}

impl fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoringMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "9cat" | "9" | "9-cat" => Ok(ScoringMode::NineCat),
            "8cat" | "8" | "8-cat" => Ok(ScoringMode::EightCat),
            _ => Err(ParseError::UnknownScoringMode(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One category's contribution to a recommendation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatContribution {
    pub stat: String,
    pub value: f64,
}

/// A recommended player with score and explanation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub name: String,
    pub score: f64,
    pub top: Vec<StatContribution>,
}

/// The result of a recommendation query. Never an `Err`: problems are
/// reported in `error` alongside an empty list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub used_variant: Option<Variant>,
    pub recommendations: Vec<Recommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RecommendError>,
}

impl Recommendations {
    /// An empty result carrying `error`.
    pub fn failed(used_variant: Option<Variant>, error: RecommendError) -> Self {
        Recommendations {
            used_variant,
            recommendations: Vec::new(),
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

// ---------------------------------------------------------------------------
// Weights
// ---------------------------------------------------------------------------

/// Resolve punt labels (human labels or value keys) into categories.
/// Unknown labels are skipped with a warning.
pub fn parse_punt_labels(labels: &[impl AsRef<str>]) -> Vec<Category> {
    let mut out = Vec::new();
    for label in labels {
        match Category::parse(label.as_ref()) {
            Some(cat) if !out.contains(&cat) => out.push(cat),
            Some(_) => {}
            None => warn!("ignoring unknown punt category '{}'", label.as_ref()),
        }
    }
    out
}

/// Per-category weights for a roster.
///
/// Inactive categories weigh 0. Active categories start at 1.0; punted ones
/// are forced to 0. Active categories are ranked by current roster total,
/// weakest first (ties keep catalog order), and the first
/// `WEAK_CATEGORY_COUNT` that are not punted gain `WEAK_CATEGORY_BOOST`.
pub fn category_weights(
    active: &[Category],
    punted: &[Category],
    roster_totals: &CategoryMap<f64>,
) -> CategoryMap<f64> {
    let mut weights = CategoryMap::splat(0.0);
    for &cat in active {
        weights[cat] = if punted.contains(&cat) { 0.0 } else { 1.0 };
    }

    let mut ranked: Vec<Category> = active.to_vec();
    ranked.sort_by(|a, b| {
        roster_totals[*a]
            .partial_cmp(&roster_totals[*b])
            .unwrap_or(Ordering::Equal)
    });

    let boosted: Vec<Category> = ranked
        .into_iter()
        .filter(|c| weights[*c] != 0.0)
        .take(WEAK_CATEGORY_COUNT)
        .collect();
    for cat in boosted {
        weights[cat] += WEAK_CATEGORY_BOOST;
    }

    weights
}

/// Weighted score of one player. Blank values count as zero.
pub fn score_player(row: &PlayerRow, active: &[Category], weights: &CategoryMap<f64>) -> f64 {
    active
        .iter()
        .map(|&cat| row.value_or_zero(cat) * weights[cat])
        .sum()
}

/// The player's highest value stats among categories that carry weight.
pub fn top_contributors(row: &PlayerRow, active: &[Category], weights: &CategoryMap<f64>) -> Vec<StatContribution> {
    let mut stats: Vec<(Category, f64)> = active
        .iter()
        .filter(|&&cat| weights[cat] != 0.0)
        .filter_map(|&cat| row.value[cat].map(|v| (cat, v)))
        .collect();
    stats.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    stats
        .into_iter()
        .take(TOP_CONTRIBUTOR_COUNT)
        .map(|(cat, v)| StatContribution {
            stat: cat.label().to_string(),
            value: round2(v),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Rank the players still available to a roster.
///
/// Steps:
/// 1. Drop every player named in `my_roster` or `taken` (case-insensitive).
/// 2. Pick the active categories for `mode`.
/// 3. Zero the weight of every category in `punt_labels`.
/// 4. Boost the roster's weakest non-punted categories.
/// 5. Score each candidate and explain it with its top value stats.
/// 6. Return the best `MAX_RECOMMENDATIONS`, scores rounded to 3 decimals.
///
/// A dataset missing any active value column yields an empty list with a
/// `MissingValueColumn` error instead of silently scoring zeros.
pub fn recommend(
    dataset: &CanonicalDataset,
    taken: &[impl AsRef<str>],
    my_roster: &[impl AsRef<str>],
    mode: ScoringMode,
    punt_labels: &[impl AsRef<str>],
) -> Recommendations {
    let active = mode.active_categories();

    let missing = dataset.missing_value_columns(&active);
    if !missing.is_empty() {
        warn!(
            "{} dataset lacks value columns {:?}; cannot recommend",
            dataset.variant, missing
        );
        return Recommendations::failed(
            Some(dataset.variant),
            RecommendError::MissingValueColumn {
                columns: missing.iter().map(|c| c.value_key().to_string()).collect(),
            },
        );
    }

    let excluded: HashSet<String> = my_roster
        .iter()
        .map(|n| name_key(n.as_ref()))
        .chain(taken.iter().map(|n| name_key(n.as_ref())))
        .collect();

    let punted = parse_punt_labels(punt_labels);
    let roster_totals = aggregate(dataset, my_roster).totals;
    let weights = category_weights(&active, &punted, &roster_totals.value);
    debug!(?weights, mode = %mode, "recommendation weights");

    let mut scored: Vec<(f64, &PlayerRow)> = dataset
        .rows
        .iter()
        .filter(|r| !excluded.contains(&name_key(&r.name)))
        .map(|r| (score_player(r, &active, &weights), r))
        .collect();

    // stable: equal scores keep dataset order
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

    let recommendations = scored
        .into_iter()
        .take(MAX_RECOMMENDATIONS)
        .map(|(score, row)| Recommendation {
            name: row.name.clone(),
            score: round3(score),
            top: top_contributors(row, &active, &weights),
        })
        .collect();

    Recommendations {
        used_variant: Some(dataset.variant),
        recommendations,
        error: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
