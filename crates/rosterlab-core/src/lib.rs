// Roster valuation and recommendation engine for season-long fantasy
// basketball ranking tables.
//
// Every query is a pure function over a borrowed `CanonicalDataset`; only the
// `source` module performs I/O.

pub mod aggregate;
pub mod catalog;
pub mod color;
pub mod dataset;
pub mod error;
pub mod grade;
pub mod leaders;
pub mod punt;
pub mod recommend;
pub mod report;
pub mod season;
pub mod source;

pub use aggregate::{aggregate, Aggregation, DisplayRow, TotalsRow};
pub use catalog::{Category, CategoryMap};
pub use color::{color_for, roster_heatmap, HeatColor};
pub use dataset::{normalize, CanonicalDataset, PlayerRow, RawTable, Variant};
pub use error::{DatasetError, ParseError, RecommendError};
pub use grade::{grade, TeamGrade};
pub use leaders::category_leaders;
pub use punt::{enumerate_punts, PuntStrategy};
pub use recommend::{recommend, Recommendation, Recommendations, ScoringMode};
pub use report::{evaluate_roster, RosterReport};
pub use season::Season;
pub use source::{load_with_fallback, recommend_from_source, CsvDirectory, DatasetSource, MemorySource};
