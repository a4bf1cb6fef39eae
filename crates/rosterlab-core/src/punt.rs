// Punt-strategy enumeration.
//
// A category whose roster total sits below the punt threshold is a candidate
// for being deliberately conceded. Every non-empty combination of candidates
// is offered as a strategy, after the "no punts" baseline.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::aggregate::TotalsRow;
use crate::catalog::Category;
use crate::error::ParseError;

/// Categories with a total strictly below this are punt candidates.
pub const PUNT_THRESHOLD: f64 = -1.0;

/// Label of the empty strategy.
pub const NO_PUNTS_LABEL: &str = "no punts";

/// URL-safe form of `NO_PUNTS_LABEL`.
pub const NO_PUNTS_SLUG: &str = "no-punts";

/// A set of categories to concede. Empty means "no punts".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PuntStrategy {
    categories: Vec<Category>,
}

impl PuntStrategy {
    pub fn none() -> Self {
        PuntStrategy::default()
    }

    /// Build a strategy; duplicates are dropped, first occurrence wins.
    pub fn new(categories: impl IntoIterator<Item = Category>) -> Self {
        let mut out: Vec<Category> = Vec::new();
        for cat in categories {
            if !out.contains(&cat) {
                out.push(cat);
            }
        }
        PuntStrategy { categories: out }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn is_none(&self) -> bool {
        self.categories.is_empty()
    }

    /// Value keys joined with `+` (e.g. `pV+toV`), or "no punts".
    pub fn label(&self) -> String {
        if self.categories.is_empty() {
            return NO_PUNTS_LABEL.to_string();
        }
        self.categories
            .iter()
            .map(|c| c.value_key())
            .collect::<Vec<_>>()
            .join("+")
    }

    /// The label percent-encoded for use in a URL path segment.
    pub fn slug(&self) -> String {
        if self.categories.is_empty() {
            return NO_PUNTS_SLUG.to_string();
        }
        let mut out = String::new();
        for byte in self.label().bytes() {
            match byte {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => out.push(byte as char),
                other => out.push_str(&format!("%{other:02X}")),
            }
        }
        out
    }

    /// Human labels of the punted categories (PTS, TO, ...).
    pub fn category_labels(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.label().to_string()).collect()
    }
}

impl fmt::Display for PuntStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl Serialize for PuntStrategy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

impl FromStr for PuntStrategy {
    type Err = ParseError;

    /// Accepts a label or slug: "no punts", "no-punts", "pV+toV",
    /// "pV%2BtoV", or human labels such as "PTS+TO".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decoded = s.trim().replace("%2B", "+").replace("%2b", "+").replace("%25", "%");
        if decoded.is_empty()
            || decoded.eq_ignore_ascii_case(NO_PUNTS_LABEL)
            || decoded.eq_ignore_ascii_case(NO_PUNTS_SLUG)
        {
            return Ok(PuntStrategy::none());
        }
        let categories = decoded
            .split('+')
            .map(str::parse::<Category>)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PuntStrategy::new(categories))
    }
}

/// Categories whose total is strictly below `PUNT_THRESHOLD`, in catalog
/// order.
pub fn punt_candidates(totals: &TotalsRow) -> Vec<Category> {
    totals
        .value
        .iter()
        .filter(|(_, v)| *v < PUNT_THRESHOLD)
        .map(|(c, _)| c)
        .collect()
}

/// Every candidate punt strategy for a roster.
///
/// The first entry is always "no punts". It is followed by every non-empty
/// subset of the candidates, smallest subsets first; subsets of equal size
/// come in standard combinatorial order over the candidates' catalog order.
/// With `k` candidates the result has `2^k` entries.
pub fn enumerate_punts(totals: &TotalsRow) -> Vec<PuntStrategy> {
    let candidates = punt_candidates(totals);
    let mut strategies = vec![PuntStrategy::none()];
    for size in 1..=candidates.len() {
        for combo in combinations(candidates.len(), size) {
            strategies.push(PuntStrategy::new(combo.into_iter().map(|i| candidates[i])));
        }
    }
    strategies
}

/// All `k`-element index subsets of `0..n` in lexicographic order.
fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    if k == 0 || k > n {
        return out;
    }
    let mut idx: Vec<usize> = (0..k).collect();
    loop {
        out.push(idx.clone());
        // rightmost position that can still advance
        let Some(pos) = (0..k).rev().find(|&i| idx[i] < n - k + i) else {
            return out;
        };
        idx[pos] += 1;
        for j in pos + 1..k {
            idx[j] = idx[j - 1] + 1;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(strategies: &[PuntStrategy]) -> Vec<String> {
        strategies.iter().map(PuntStrategy::label).collect()
    }

    #[test]
    fn no_candidates_yields_only_baseline() {
        let strategies = enumerate_punts(&TotalsRow::zero());
        assert_eq!(labels(&strategies), vec!["no punts"]);
    }

    #[test]
    fn single_candidate() {
        let mut t = TotalsRow::zero();
        t.value[Category::Points] = -3.0;
        t.value[Category::Rebounds] = -1.0; // exactly at the threshold: not a candidate
        t.value[Category::Assists] = 4.0;
        assert_eq!(labels(&enumerate_punts(&t)), vec!["no punts", "pV"]);
    }

    #[test]
    fn subsets_by_size_then_insertion_order() {
        let mut t = TotalsRow::zero();
        t.value[Category::Turnovers] = -5.0;
        t.value[Category::Points] = -1.5;
        t.value[Category::FreeThrowPct] = -2.0;
        assert_eq!(
            labels(&enumerate_punts(&t)),
            vec![
                "no punts",
                "pV",
                "toV",
                "ft%V",
                "pV+toV",
                "pV+ft%V",
                "toV+ft%V",
                "pV+toV+ft%V",
            ]
        );
    }

    #[test]
    fn count_is_power_of_two() {
        for k in 0..=9 {
            let mut t = TotalsRow::zero();
            for cat in Category::ALL.into_iter().take(k) {
                t.value[cat] = -2.0;
            }
            assert_eq!(enumerate_punts(&t).len(), 1usize << k);
        }
    }

    #[test]
    fn combinations_lexicographic() {
        assert_eq!(
            combinations(4, 2),
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3]
            ]
        );
        assert!(combinations(2, 3).is_empty());
        assert_eq!(combinations(3, 3), vec![vec![0, 1, 2]]);
    }

    #[test]
    fn slug_is_url_safe() {
        let s = PuntStrategy::new([Category::FieldGoalPct, Category::Turnovers]);
        assert_eq!(s.label(), "fg%V+toV");
        assert_eq!(s.slug(), "fg%25V%2BtoV");
        assert_eq!(PuntStrategy::none().slug(), "no-punts");
    }

    #[test]
    fn every_slug_is_ascii_and_parses_back() {
        let all = PuntStrategy::new(Category::ALL);
        let slug = all.slug();
        assert!(slug
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"-_.~%".contains(&b)));
        assert_eq!(slug.parse::<PuntStrategy>().unwrap(), all);
    }

    #[test]
    fn parse_round_trips() {
        let s = PuntStrategy::new([Category::FieldGoalPct, Category::Turnovers]);
        assert_eq!(s.label().parse::<PuntStrategy>().unwrap(), s);
        assert_eq!(s.slug().parse::<PuntStrategy>().unwrap(), s);
        assert_eq!("PTS+TO".parse::<PuntStrategy>().unwrap().category_labels(), vec!["PTS", "TO"]);
        assert!("no punts".parse::<PuntStrategy>().unwrap().is_none());
        assert!("no-punts".parse::<PuntStrategy>().unwrap().is_none());
        assert!("pV+dunks".parse::<PuntStrategy>().is_err());
    }

    #[test]
    fn new_drops_duplicates() {
        let s = PuntStrategy::new([Category::Blocks, Category::Blocks, Category::Points]);
        assert_eq!(s.categories(), &[Category::Blocks, Category::Points]);
    }
}
