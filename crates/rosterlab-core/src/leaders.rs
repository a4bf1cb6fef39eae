// Per-category leaderboards over raw per-game stats.

use serde::Serialize;
use std::cmp::Ordering;

use crate::catalog::{round2, Category};
use crate::dataset::CanonicalDataset;

/// Default leaderboard length.
pub const DEFAULT_LEADER_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderEntry {
    pub name: String,
    pub team: String,
    pub value: f64,
}

/// The top players in one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryLeaders {
    pub category: String,
    pub column: String,
    pub leaders: Vec<LeaderEntry>,
}

/// Leaderboards for every category, in catalog order.
///
/// Players are ranked on the raw per-game column: highest first, except
/// turnovers where fewest is best. Players with a blank stat are skipped.
pub fn category_leaders(dataset: &CanonicalDataset, limit: usize) -> Vec<CategoryLeaders> {
    Category::ALL
        .into_iter()
        .map(|cat| {
            let mut entries: Vec<(f64, &str, &str)> = dataset
                .rows
                .iter()
                .filter_map(|r| r.raw[cat].map(|v| (v, r.name.as_str(), r.team.as_str())))
                .collect();

            entries.sort_by(|a, b| {
                let ord = a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal);
                if cat.is_inverted() {
                    ord
                } else {
                    ord.reverse()
                }
            });

            CategoryLeaders {
                category: cat.label().to_string(),
                column: cat.raw_key().to_string(),
                leaders: entries
                    .into_iter()
                    .take(limit)
                    .map(|(v, name, team)| LeaderEntry {
                        name: name.to_string(),
                        team: team.to_string(),
                        value: round2(v),
                    })
                    .collect(),
            }
        })
        .collect()
}
