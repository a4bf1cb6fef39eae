// Qualitative team grade from the number of net-positive categories.

use serde::{Serialize, Serializer};
use std::fmt;

use crate::aggregate::TotalsRow;

/// Coarse team tier. Ordered worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TeamGrade {
    /// Fewer than 2 positive categories.
    Bad,
    /// Exactly 2 positive categories.
    Ok,
    /// Exactly 3 positive categories.
    Good,
    /// 4 or more positive categories.
    Great,
}

impl TeamGrade {
    /// Determine the tier from a count of positive categories.
    pub fn from_positive_count(count: usize) -> Self {
        match count {
            0..=1 => TeamGrade::Bad,
            2 => TeamGrade::Ok,
            3 => TeamGrade::Good,
            _ => TeamGrade::Great,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TeamGrade::Bad => "bad team",
            TeamGrade::Ok => "ok team",
            TeamGrade::Good => "good team",
            TeamGrade::Great => "great team",
        }
    }
}

impl fmt::Display for TeamGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for TeamGrade {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Grade a roster by counting value totals strictly above zero.
/// Uses the unrounded totals.
pub fn grade(totals: &TotalsRow) -> TeamGrade {
    TeamGrade::from_positive_count(totals.positive_count())
}
