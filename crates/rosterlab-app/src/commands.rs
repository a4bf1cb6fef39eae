// Command handlers. Each resolves flags against config defaults, queries the
// engine, and returns a JSON document for the caller to print.

use anyhow::{bail, Context};
use rosterlab_core::aggregate::MAX_ROSTER_SIZE;
use rosterlab_core::{
    category_leaders, evaluate_roster, load_with_fallback, recommend_from_source, CanonicalDataset,
    DatasetSource, RecommendError, Season, Variant,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::cli::{Commands, DatasetArgs, RosterArgs};
use crate::config::QueryDefaults;

/// Run one parsed command against `source`.
pub fn run(command: &Commands, source: &dyn DatasetSource, defaults: &QueryDefaults) -> anyhow::Result<Value> {
    match command {
        Commands::Seasons => Ok(seasons()),
        Commands::Evaluate { dataset, roster } => evaluate(source, defaults, dataset, roster),
        Commands::Recommend {
            dataset,
            roster,
            taken,
            punt,
            scoring,
        } => {
            check_roster_size(roster)?;
            let (season, variant) = resolve(dataset, defaults);
            let mode = scoring.unwrap_or(defaults.scoring);
            info!(
                "recommend: season={} variant={} mode={} roster={} taken={}",
                season,
                variant,
                mode,
                roster.players.len(),
                taken.len()
            );
            let recs = recommend_from_source(source, season, variant, taken, &roster.players, mode, punt);
            to_json(&recs)
        }
        Commands::Punts { dataset, roster } => punts(source, defaults, dataset, roster),
        Commands::Leaders { dataset, limit } => {
            let loaded = load(source, defaults, dataset);
            let mut doc = json!({
                "season": loaded.season,
                "variant": loaded.dataset.variant,
                "categories": category_leaders(&loaded.dataset, *limit),
            });
            loaded.flag(&mut doc)?;
            Ok(doc)
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

fn seasons() -> Value {
    let seasons: Vec<Value> = Season::supported()
        .into_iter()
        .map(|s| json!({ "label": s.label(), "slug": s.slug() }))
        .collect();
    Value::Array(seasons)
}

fn evaluate(
    source: &dyn DatasetSource,
    defaults: &QueryDefaults,
    dataset: &DatasetArgs,
    roster: &RosterArgs,
) -> anyhow::Result<Value> {
    check_roster_size(roster)?;
    let loaded = load(source, defaults, dataset);
    let report = evaluate_roster(&loaded.dataset, &roster.players);
    let mut doc = to_json(&report)?;
    if let Value::Object(map) = &mut doc {
        map.insert("season".into(), json!(loaded.season));
    }
    loaded.flag(&mut doc)?;
    Ok(doc)
}

fn punts(
    source: &dyn DatasetSource,
    defaults: &QueryDefaults,
    dataset: &DatasetArgs,
    roster: &RosterArgs,
) -> anyhow::Result<Value> {
    check_roster_size(roster)?;
    let loaded = load(source, defaults, dataset);
    let report = evaluate_roster(&loaded.dataset, &roster.players);
    let strategies: Vec<Value> = report
        .punt_strategies
        .iter()
        .map(|s| {
            json!({
                "label": s.label(),
                "slug": s.slug(),
                "categories": s.category_labels(),
            })
        })
        .collect();
    let mut doc = json!({
        "season": loaded.season,
        "variant": loaded.dataset.variant,
        "grade": report.grade,
        "strategies": strategies,
    });
    loaded.flag(&mut doc)?;
    Ok(doc)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn resolve(args: &DatasetArgs, defaults: &QueryDefaults) -> (Season, Variant) {
    (
        args.season.unwrap_or(defaults.season),
        args.variant.unwrap_or(defaults.variant),
    )
}

/// A dataset for a command, or an empty stand-in plus the reason.
struct Loaded {
    season: Season,
    dataset: CanonicalDataset,
    error: Option<RecommendError>,
}

impl Loaded {
    /// Attach `error` to `doc` when the dataset could not be loaded.
    fn flag(&self, doc: &mut Value) -> anyhow::Result<()> {
        if let (Some(error), Value::Object(map)) = (&self.error, doc) {
            map.insert("error".into(), to_json(error)?);
        }
        Ok(())
    }
}

/// Load the requested dataset. A missing season degrades to an empty
/// dataset of the preferred variant rather than failing the command.
fn load(source: &dyn DatasetSource, defaults: &QueryDefaults, args: &DatasetArgs) -> Loaded {
    let (season, variant) = resolve(args, defaults);
    match load_with_fallback(source, season, variant) {
        Ok(dataset) => Loaded {
            season,
            dataset,
            error: None,
        },
        Err(e) => {
            warn!("no ranking data for {season}: {e}");
            Loaded {
                season,
                dataset: CanonicalDataset::empty(variant),
                error: Some(RecommendError::DatasetUnavailable {
                    message: e.to_string(),
                }),
            }
        }
    }
}

fn check_roster_size(roster: &RosterArgs) -> anyhow::Result<()> {
    if roster.players.len() > MAX_ROSTER_SIZE {
        bail!(
            "roster has {} players; at most {} are allowed",
            roster.players.len(),
            MAX_ROSTER_SIZE
        );
    }
    Ok(())
}

fn to_json<T: Serialize>(value: &T) -> anyhow::Result<Value> {
    serde_json::to_value(value).context("failed to serialize result")
}
