// Dataset sources: where season ranking tables come from.
//
// The engine itself never touches the filesystem. A `DatasetSource` hands it a
// normalized table for a (season, variant) pair; `load_with_fallback` tries
// the other variant when the preferred one is unavailable.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::dataset::{normalize, CanonicalDataset, RawTable, Variant};
use crate::error::{DatasetError, RecommendError};
use crate::recommend::{recommend, Recommendations, ScoringMode};
use crate::season::Season;

/// Supplies normalized ranking tables.
pub trait DatasetSource {
    fn load(&self, season: Season, variant: Variant) -> Result<CanonicalDataset, DatasetError>;
}

// ---------------------------------------------------------------------------
// CSV directory
// ---------------------------------------------------------------------------

/// Reads `BBM_PlayerRankings{tag}_{variant}.csv` files from one directory,
/// e.g. `BBM_PlayerRankings2425_nopunts.csv`.
#[derive(Debug, Clone)]
pub struct CsvDirectory {
    root: PathBuf,
}

impl CsvDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        CsvDirectory { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File that backs `(season, variant)`.
    pub fn path_for(&self, season: Season, variant: Variant) -> PathBuf {
        self.root
            .join(format!("BBM_PlayerRankings{}_{}.csv", season.file_tag(), variant))
    }
}

impl DatasetSource for CsvDirectory {
    fn load(&self, season: Season, variant: Variant) -> Result<CanonicalDataset, DatasetError> {
        let path = self.path_for(season, variant);
        if !path.exists() {
            return Err(DatasetError::NotFound {
                season: season.label(),
                variant: variant.to_string(),
            });
        }
        let file = std::fs::File::open(&path).map_err(|e| DatasetError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let raw = RawTable::from_csv_reader(file).map_err(|e| DatasetError::Csv {
            path: path.display().to_string(),
            source: e,
        })?;
        let dataset = normalize(raw, variant);
        info!(
            "loaded {} players from {}",
            dataset.len(),
            path.display()
        );
        Ok(dataset)
    }
}

// ---------------------------------------------------------------------------
// In-memory source
// ---------------------------------------------------------------------------

/// Holds pre-built datasets, keyed by season and variant.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    datasets: HashMap<(Season, Variant), CanonicalDataset>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, season: Season, dataset: CanonicalDataset) {
        self.datasets.insert((season, dataset.variant), dataset);
    }
}

impl DatasetSource for MemorySource {
    fn load(&self, season: Season, variant: Variant) -> Result<CanonicalDataset, DatasetError> {
        self.datasets
            .get(&(season, variant))
            .cloned()
            .ok_or_else(|| DatasetError::NotFound {
                season: season.label(),
                variant: variant.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Fallback loading
// ---------------------------------------------------------------------------

/// Load `preferred`, falling back to the alternate variant. The returned
/// dataset's `variant` says which one was used. If both fail, the error from
/// the preferred variant is returned.
pub fn load_with_fallback<S: DatasetSource + ?Sized>(
    source: &S,
    season: Season,
    preferred: Variant,
) -> Result<CanonicalDataset, DatasetError> {
    match source.load(season, preferred) {
        Ok(dataset) => Ok(dataset),
        Err(first) => {
            let alternate = preferred.alternate();
            warn!(
                "{} {} unavailable ({}); trying {}",
                season, preferred, first, alternate
            );
            source.load(season, alternate).map_err(|second| {
                warn!("{} {} also unavailable: {}", season, alternate, second);
                first
            })
        }
    }
}

/// `recommend` against a dataset fetched from `source`.
///
/// When no variant can be loaded the result is an empty list flagged
/// `DatasetUnavailable` with no `usedVariant`.
pub fn recommend_from_source<S: DatasetSource + ?Sized>(
    source: &S,
    season: Season,
    preferred: Variant,
    taken: &[impl AsRef<str>],
    my_roster: &[impl AsRef<str>],
    mode: ScoringMode,
    punt_labels: &[impl AsRef<str>],
) -> Recommendations {
    match load_with_fallback(source, season, preferred) {
        Ok(dataset) => recommend(&dataset, taken, my_roster, mode, punt_labels),
        Err(e) => Recommendations::failed(
            None,
            RecommendError::DatasetUnavailable {
                message: e.to_string(),
            },
        ),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
