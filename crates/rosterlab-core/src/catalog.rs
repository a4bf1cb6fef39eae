// Scored category definitions and the label/column-key mapping.
//
// Every ranking table carries nine categories, each with a raw per-game column
// (e.g. `p/g`) and a derived value column (e.g. `pV`). Turnovers is the one
// inverted category: its value column is already sign-flipped so that low
// turnovers score positive.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use crate::error::ParseError;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// One of the nine scored basketball categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Points,
    Rebounds,
    Assists,
    Steals,
    Blocks,
    Turnovers,
    FieldGoalPct,
    FreeThrowPct,
    Threes,
}

/// Number of scored categories.
pub const CATEGORY_COUNT: usize = 9;

impl Category {
    /// All categories in catalog order. This order is the tie-break order for
    /// weakest-category ranking and the insertion order for punt enumeration.
    pub const ALL: [Category; CATEGORY_COUNT] = [
        Category::Points,
        Category::Rebounds,
        Category::Assists,
        Category::Steals,
        Category::Blocks,
        Category::Turnovers,
        Category::FieldGoalPct,
        Category::FreeThrowPct,
        Category::Threes,
    ];

    /// Position of this category in `Category::ALL`.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Human-facing label (PTS, REB, ...).
    pub fn label(self) -> &'static str {
        match self {
            Category::Points => "PTS",
            Category::Rebounds => "REB",
            Category::Assists => "AST",
            Category::Steals => "STL",
            Category::Blocks => "BLK",
            Category::Turnovers => "TO",
            Category::FieldGoalPct => "FG%",
            Category::FreeThrowPct => "FT%",
            Category::Threes => "3PM",
        }
    }

    /// Column key of the derived value statistic.
    pub fn value_key(self) -> &'static str {
        match self {
            Category::Points => "pV",
            Category::Rebounds => "rV",
            Category::Assists => "aV",
            Category::Steals => "sV",
            Category::Blocks => "bV",
            Category::Turnovers => "toV",
            Category::FieldGoalPct => "fg%V",
            Category::FreeThrowPct => "ft%V",
            Category::Threes => "3V",
        }
    }

    /// Column key of the raw per-game statistic.
    pub fn raw_key(self) -> &'static str {
        match self {
            Category::Points => "p/g",
            Category::Rebounds => "r/g",
            Category::Assists => "a/g",
            Category::Steals => "s/g",
            Category::Blocks => "b/g",
            Category::Turnovers => "to/g",
            Category::FieldGoalPct => "fg%",
            Category::FreeThrowPct => "ft%",
            Category::Threes => "3/g",
        }
    }

    /// True for categories where a lower raw number is better.
    pub fn is_inverted(self) -> bool {
        matches!(self, Category::Turnovers)
    }

    /// Look up a category by label or value key, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        let needle = s.trim();
        Category::ALL.into_iter().find(|c| {
            c.label().eq_ignore_ascii_case(needle) || c.value_key().eq_ignore_ascii_case(needle)
        })
    }

    /// Look up a category by its value column key (exact match).
    pub fn from_value_key(key: &str) -> Option<Self> {
        Category::ALL.into_iter().find(|c| c.value_key() == key)
    }

    /// Look up a category by its raw column key (exact match).
    pub fn from_raw_key(key: &str) -> Option<Self> {
        Category::ALL.into_iter().find(|c| c.raw_key() == key)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::parse(s).ok_or_else(|| ParseError::UnknownCategory(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Per-category storage
// ---------------------------------------------------------------------------

/// A fixed-size table holding one `T` per category, indexable by `Category`.
///
/// Serializes as a map keyed by category label.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CategoryMap<T>([T; CATEGORY_COUNT]);

impl<T: Copy> CategoryMap<T> {
    /// Create a map with every category set to `value`.
    pub fn splat(value: T) -> Self {
        CategoryMap([value; CATEGORY_COUNT])
    }

    /// Build a map by evaluating `f` for every category.
    pub fn from_fn(mut f: impl FnMut(Category) -> T) -> Self {
        CategoryMap(Category::ALL.map(&mut f))
    }

    /// Apply `f` to every entry.
    pub fn map<U: Copy>(&self, mut f: impl FnMut(T) -> U) -> CategoryMap<U> {
        CategoryMap(self.0.map(&mut f))
    }

    /// Iterate `(category, value)` pairs in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, T)> + '_ {
        Category::ALL.into_iter().zip(self.0.iter().copied())
    }
}

impl<T> Index<Category> for CategoryMap<T> {
    type Output = T;

    fn index(&self, cat: Category) -> &T {
        &self.0[cat.index()]
    }
}

impl<T> IndexMut<Category> for CategoryMap<T> {
    fn index_mut(&mut self, cat: Category) -> &mut T {
        &mut self.0[cat.index()]
    }
}

impl<T: Serialize> Serialize for CategoryMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(CATEGORY_COUNT))?;
        for (cat, value) in Category::ALL.iter().zip(self.0.iter()) {
            map.serialize_entry(cat.label(), value)?;
        }
        map.end()
    }
}

/// Round to two decimal places for display.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to three decimal places.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_in_index_order() {
        for (i, cat) in Category::ALL.iter().enumerate() {
            assert_eq!(cat.index(), i);
        }
    }

    #[test]
    fn parse_accepts_labels_and_keys() {
        assert_eq!(Category::parse("PTS"), Some(Category::Points));
        assert_eq!(Category::parse("fg%"), Some(Category::FieldGoalPct));
        assert_eq!(Category::parse(" 3pm "), Some(Category::Threes));
        assert_eq!(Category::parse("toV"), Some(Category::Turnovers));
        assert_eq!(Category::parse("TOV"), Some(Category::Turnovers));
        assert_eq!(Category::parse("ft%V"), Some(Category::FreeThrowPct));
        assert_eq!(Category::parse("DUNKS"), None);
    }

    #[test]
    fn from_str_reports_unknown_label() {
        let err = "XYZ".parse::<Category>().unwrap_err();
        assert!(err.to_string().contains("XYZ"));
    }

    #[test]
    fn only_turnovers_is_inverted() {
        let inverted: Vec<Category> = Category::ALL
            .into_iter()
            .filter(|c| c.is_inverted())
            .collect();
        assert_eq!(inverted, vec![Category::Turnovers]);
    }

    #[test]
    fn column_keys_round_trip() {
        for cat in Category::ALL {
            assert_eq!(Category::from_value_key(cat.value_key()), Some(cat));
            assert_eq!(Category::from_raw_key(cat.raw_key()), Some(cat));
        }
    }

    #[test]
    fn category_map_indexing() {
        let mut m = CategoryMap::splat(0.0);
        m[Category::Blocks] = 2.5;
        assert_eq!(m[Category::Blocks], 2.5);
        assert_eq!(m.iter().filter(|(_, v)| *v != 0.0).count(), 1);
    }

    #[test]
    fn category_map_serializes_by_label() {
        let m = CategoryMap::from_fn(|c| c.index() as u32);
        let json = serde_json::to_value(m).unwrap();
        assert_eq!(json["PTS"], 0);
        assert_eq!(json["3PM"], 8);
    }

    #[test]
    fn rounding_helpers() {
        assert_eq!(round2(1.23456), 1.23);
        assert_eq!(round2(-0.005001), -0.01);
        assert_eq!(round3(2.71828), 2.718);
    }
}
