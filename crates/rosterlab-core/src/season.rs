// Supported NBA seasons and their label/slug/file-tag forms.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// Start year of the newest supported season.
pub const NEWEST_START_YEAR: u16 = 2024;

/// Start year of the oldest supported season.
pub const OLDEST_START_YEAR: u16 = 2011;

/// An NBA season, identified by the calendar year it starts in.
///
/// Displays as `24/25`; the URL slug is `24-25` and the file tag `2425`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Season {
    start_year: u16,
}

impl Season {
    /// `None` outside the supported range.
    pub fn new(start_year: u16) -> Option<Self> {
        (OLDEST_START_YEAR..=NEWEST_START_YEAR)
            .contains(&start_year)
            .then_some(Season { start_year })
    }

    pub fn newest() -> Self {
        Season {
            start_year: NEWEST_START_YEAR,
        }
    }

    /// Every supported season, newest first.
    pub fn supported() -> Vec<Season> {
        (OLDEST_START_YEAR..=NEWEST_START_YEAR)
            .rev()
            .map(|start_year| Season { start_year })
            .collect()
    }

    pub fn start_year(&self) -> u16 {
        self.start_year
    }

    fn short_years(&self) -> (u16, u16) {
        (self.start_year % 100, (self.start_year + 1) % 100)
    }

    /// `24/25`
    pub fn label(&self) -> String {
        let (a, b) = self.short_years();
        format!("{a:02}/{b:02}")
    }

    /// `24-25`
    pub fn slug(&self) -> String {
        let (a, b) = self.short_years();
        format!("{a:02}-{b:02}")
    }

    /// `2425`, as used in ranking export file names.
    pub fn file_tag(&self) -> String {
        let (a, b) = self.short_years();
        format!("{a:02}{b:02}")
    }
}

impl Default for Season {
    fn default() -> Self {
        Season::newest()
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl Serialize for Season {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

impl FromStr for Season {
    type Err = ParseError;

    /// Accepts `24/25`, `24-25` or the file tag `2425`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseError::UnknownSeason(s.to_string());
        let text = s.trim();

        let (a, b) = if let Some((a, b)) = text.split_once(['/', '-']) {
            (a, b)
        } else if text.len() == 4 && text.is_ascii() {
            text.split_at(2)
        } else {
            return Err(err());
        };
        let two_digits = |t: &str| t.len() == 2 && t.bytes().all(|c| c.is_ascii_digit());
        if !two_digits(a) || !two_digits(b) {
            return Err(err());
        }
        let a: u16 = a.parse().map_err(|_| err())?;
        let b: u16 = b.parse().map_err(|_| err())?;
        if b != (a + 1) % 100 {
            return Err(err());
        }
        let start_year = 2000 + a;

        Season::new(start_year).ok_or_else(err)
    }
}
