// Ranking-table loading and normalization.
//
// A season ships as two CSV exports: the `nopunts` baseline and the
// `tovpunt` variant, which adds league-value and punt-value columns. Both are
// read into a `RawTable` and normalized into a `CanonicalDataset` with
// trimmed headers, canonical extra-column names, and trimmed player names.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::catalog::{Category, CategoryMap};
use crate::error::ParseError;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

/// Canonical key of the league-value column (tovpunt variant only).
pub const LEAGUE_VALUE_KEY: &str = "LeagV";

/// Canonical key of the punt-value column (tovpunt variant only).
pub const PUNT_VALUE_KEY: &str = "puntV";

/// Historical spellings of the extra columns, lowercased, mapped to their
/// canonical key. Consulted once per header at normalization time.
const COLUMN_ALIASES: &[(&str, &str)] = &[
    ("leagv", LEAGUE_VALUE_KEY),
    ("leaguev", LEAGUE_VALUE_KEY),
    ("puntv", PUNT_VALUE_KEY),
    ("puntiv", PUNT_VALUE_KEY),
];

/// Columns that never reach roster rows or totals.
pub const ANCILLARY_COLUMNS: &[&str] = &[
    "Round", "Rank", "Value", "Team", "Inj", "Pos", "m/g", "USG", "fga/g", "fta/g",
];

const NAME_COLUMN: &str = "Name";
const TEAM_COLUMN: &str = "Team";
const GAMES_COLUMNS: &[&str] = &["g", "gp"];

// ---------------------------------------------------------------------------
// Variant
// ---------------------------------------------------------------------------

/// Which of the two per-season ranking exports a dataset came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    #[default]
    #[serde(rename = "nopunts")]
    NoPunts,
    #[serde(rename = "tovpunt")]
    TovPunt,
}

impl Variant {
    pub fn as_str(self) -> &'static str {
        match self {
            Variant::NoPunts => "nopunts",
            Variant::TovPunt => "tovpunt",
        }
    }

    /// The other variant, used as a load fallback.
    pub fn alternate(self) -> Self {
        match self {
            Variant::NoPunts => Variant::TovPunt,
            Variant::TovPunt => Variant::NoPunts,
        }
    }

    /// Whether this variant carries the LeagV/puntV columns.
    pub fn has_extra_columns(self) -> bool {
        matches!(self, Variant::TovPunt)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nopunts" | "nopunt" => Ok(Variant::NoPunts),
            "tovpunt" => Ok(Variant::TovPunt),
            _ => Err(ParseError::UnknownVariant(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Raw table
// ---------------------------------------------------------------------------

/// An untyped table exactly as read from the source: header strings and
/// string cells. Rows may be shorter than the header.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Read a CSV export. Ragged rows are accepted, and cells that are not
    /// valid UTF-8 (legacy spreadsheet encodings) are decoded lossily so the
    /// row is kept.
    pub fn from_csv_reader<R: Read>(rdr: R) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);
        let headers = lossy_cells(reader.byte_headers()?);
        let mut rows = Vec::new();
        for result in reader.byte_records() {
            match result {
                Ok(record) => rows.push(lossy_cells(&record)),
                Err(e) => warn!("skipping malformed ranking row: {}", e),
            }
        }
        Ok(RawTable { headers, rows })
    }
}

fn lossy_cells(record: &csv::ByteRecord) -> Vec<String> {
    record
        .iter()
        .map(|cell| String::from_utf8_lossy(cell).into_owned())
        .collect()
}

// ---------------------------------------------------------------------------
// Canonical types
// ---------------------------------------------------------------------------

/// One player's line in a season ranking table. Blank or non-numeric cells
/// are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRow {
    pub name: String,
    pub team: String,
    pub games: Option<f64>,
    pub raw: CategoryMap<Option<f64>>,
    pub value: CategoryMap<Option<f64>>,
    pub league_value: Option<f64>,
    pub punt_value: Option<f64>,
}

impl PlayerRow {
    /// A row with only a name and every statistic blank.
    pub fn named(name: &str) -> Self {
        PlayerRow {
            name: name.trim().to_string(),
            team: String::new(),
            games: None,
            raw: CategoryMap::splat(None),
            value: CategoryMap::splat(None),
            league_value: None,
            punt_value: None,
        }
    }

    /// Value statistic with blanks read as zero.
    pub fn value_or_zero(&self, cat: Category) -> f64 {
        self.value[cat].unwrap_or(0.0)
    }
}

/// A normalized ranking table for one season and variant.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalDataset {
    pub variant: Variant,
    pub rows: Vec<PlayerRow>,
    /// Which value columns appeared in the source header.
    pub value_columns: CategoryMap<bool>,
}

impl CanonicalDataset {
    /// A dataset built directly from rows, with every value column present.
    pub fn new(variant: Variant, rows: Vec<PlayerRow>) -> Self {
        CanonicalDataset {
            variant,
            rows,
            value_columns: CategoryMap::splat(true),
        }
    }

    /// A dataset with no rows and no columns.
    pub fn empty(variant: Variant) -> Self {
        CanonicalDataset {
            variant,
            rows: Vec::new(),
            value_columns: CategoryMap::splat(false),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Case-insensitive lookup on the trimmed name.
    pub fn find(&self, name: &str) -> Option<&PlayerRow> {
        let key = name_key(name);
        self.rows.iter().find(|r| name_key(&r.name) == key)
    }

    /// The subset of `categories` whose value column is absent.
    pub fn missing_value_columns(&self, categories: &[Category]) -> Vec<Category> {
        categories
            .iter()
            .copied()
            .filter(|&c| !self.value_columns[c])
            .collect()
    }
}

/// Comparison key for player names: trimmed and lowercased.
pub(crate) fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Map a trimmed header onto its canonical key.
fn canonical_header(header: &str) -> String {
    let trimmed = header.trim();
    let lower = trimmed.to_lowercase();
    COLUMN_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lower)
        .map(|(_, canonical)| (*canonical).to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

fn parse_cell(cell: Option<&String>) -> Option<f64> {
    let text = cell?.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Column positions resolved once from the canonical header.
struct ColumnIndex {
    name: usize,
    team: Option<usize>,
    games: Option<usize>,
    raw: CategoryMap<Option<usize>>,
    value: CategoryMap<Option<usize>>,
    league_value: Option<usize>,
    punt_value: Option<usize>,
}

impl ColumnIndex {
    fn resolve(headers: &[String]) -> Option<Self> {
        let position: HashMap<&str, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.as_str(), i))
            .collect();
        let find_ci = |wanted: &[&str]| {
            headers
                .iter()
                .position(|h| wanted.iter().any(|w| h.eq_ignore_ascii_case(w)))
        };

        let name = find_ci(&[NAME_COLUMN])?;
        Some(ColumnIndex {
            name,
            team: find_ci(&[TEAM_COLUMN]),
            games: find_ci(GAMES_COLUMNS),
            raw: CategoryMap::from_fn(|c| position.get(c.raw_key()).copied()),
            value: CategoryMap::from_fn(|c| position.get(c.value_key()).copied()),
            league_value: position.get(LEAGUE_VALUE_KEY).copied(),
            punt_value: position.get(PUNT_VALUE_KEY).copied(),
        })
    }
}

/// Normalize a raw table into a `CanonicalDataset`.
///
/// Headers are trimmed and the LeagV/puntV spelling variants are unified.
/// A table without a name column yields an empty dataset. The baseline
/// variant never reports the extra columns, even if the export has them.
pub fn normalize(raw: RawTable, variant: Variant) -> CanonicalDataset {
    let headers: Vec<String> = raw.headers.iter().map(|h| canonical_header(h)).collect();

    for (original, canonical) in raw.headers.iter().zip(&headers) {
        if original.trim() != canonical {
            debug!("column '{}' normalized to '{}'", original.trim(), canonical);
        }
        if ANCILLARY_COLUMNS.iter().any(|a| a.eq_ignore_ascii_case(canonical)) {
            debug!("dropping ancillary column '{}'", canonical);
        }
    }

    let Some(index) = ColumnIndex::resolve(&headers) else {
        warn!("ranking table has no '{}' column; treating as empty", NAME_COLUMN);
        return CanonicalDataset::empty(variant);
    };

    let keep_extras = variant.has_extra_columns();
    let mut rows = Vec::with_capacity(raw.rows.len());

    for record in &raw.rows {
        let name = record
            .get(index.name)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        if name.is_empty() {
            continue;
        }
        let cell = |i: Option<usize>| i.and_then(|i| parse_cell(record.get(i)));

        rows.push(PlayerRow {
            team: index
                .team
                .and_then(|i| record.get(i))
                .map(|s| s.trim().to_string())
                .unwrap_or_default(),
            games: cell(index.games),
            raw: index.raw.map(|i| cell(i)),
            value: index.value.map(|i| cell(i)),
            league_value: if keep_extras { cell(index.league_value) } else { None },
            punt_value: if keep_extras { cell(index.punt_value) } else { None },
            name,
        });
    }

    CanonicalDataset {
        variant,
        rows,
        value_columns: index.value.map(|i| i.is_some()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
