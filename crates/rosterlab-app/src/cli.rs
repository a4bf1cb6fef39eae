// Command-line argument definitions.

use clap::{Args, Parser, Subcommand};
use rosterlab_core::leaders::DEFAULT_LEADER_LIMIT;
use rosterlab_core::{ScoringMode, Season, Variant};
use std::path::PathBuf;

/// Dataset selection shared by every data-backed command.
#[derive(Debug, Clone, Default, Args)]
pub struct DatasetArgs {
    /// Season, e.g. `24-25` or `24/25` (defaults from config).
    #[clap(long, short)]
    pub season: Option<Season>,

    /// Preferred ranking export, `nopunts` or `tovpunt` (defaults from config).
    /// The other variant is tried when this one is missing.
    #[clap(long, short)]
    pub variant: Option<Variant>,
}

/// Roster membership, repeatable: `-p "Nikola Jokic" -p "Trae Young"`.
#[derive(Debug, Clone, Default, Args)]
pub struct RosterArgs {
    /// Player on the roster (case-insensitive, repeatable).
    #[clap(long = "player", short = 'p')]
    pub players: Vec<String>,
}

#[derive(Debug, Parser)]
#[clap(name = "rosterlab", about = "Fantasy basketball roster valuation and recommendations")]
pub struct Cli {
    /// Directory holding the ranking CSV exports (overrides config).
    #[clap(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List supported seasons, newest first.
    Seasons,

    /// Evaluate a roster: per-player rows, totals, heat colors, grade and
    /// candidate punt strategies.
    Evaluate {
        #[clap(flatten)]
        dataset: DatasetArgs,

        #[clap(flatten)]
        roster: RosterArgs,
    },

    /// Rank available players for a roster.
    ///
    /// Players on the roster or in the taken list are excluded. Scores weight
    /// the roster's weakest categories more heavily.
    Recommend {
        #[clap(flatten)]
        dataset: DatasetArgs,

        #[clap(flatten)]
        roster: RosterArgs,

        /// Player already owned by another team (repeatable).
        #[clap(long, short)]
        taken: Vec<String>,

        /// Category to punt, e.g. `TO` or `ft%V` (repeatable).
        #[clap(long)]
        punt: Vec<String>,

        /// `9cat` or `8cat` (defaults from config).
        #[clap(long)]
        scoring: Option<ScoringMode>,
    },

    /// List candidate punt strategies for a roster.
    Punts {
        #[clap(flatten)]
        dataset: DatasetArgs,

        #[clap(flatten)]
        roster: RosterArgs,
    },

    /// Show per-category leaders on raw per-game stats.
    Leaders {
        #[clap(flatten)]
        dataset: DatasetArgs,

        /// Players per category.
        #[clap(long, short, default_value_t = DEFAULT_LEADER_LIMIT)]
        limit: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_recommend() {
        let cli = Cli::try_parse_from([
            "rosterlab",
            "recommend",
            "-s",
            "23-24",
            "-p",
            "Nikola Jokic",
            "-p",
            "Trae Young",
            "--taken",
            "Luka Doncic",
            "--punt",
            "TO",
            "--scoring",
            "8cat",
        ])
        .unwrap();

        match cli.command {
            Commands::Recommend {
                dataset,
                roster,
                taken,
                punt,
                scoring,
            } => {
                assert_eq!(dataset.season, Some(Season::new(2023).unwrap()));
                assert_eq!(dataset.variant, None);
                assert_eq!(roster.players, vec!["Nikola Jokic", "Trae Young"]);
                assert_eq!(taken, vec!["Luka Doncic"]);
                assert_eq!(punt, vec!["TO"]);
                assert_eq!(scoring, Some(ScoringMode::EightCat));
            }
            other => panic!("expected Recommend, got {other:?}"),
        }
    }

    #[test]
    fn leaders_limit_defaults() {
        let cli = Cli::try_parse_from(["rosterlab", "leaders"]).unwrap();
        match cli.command {
            Commands::Leaders { limit, .. } => assert_eq!(limit, DEFAULT_LEADER_LIMIT),
            other => panic!("expected Leaders, got {other:?}"),
        }
    }

    #[test]
    fn global_data_dir() {
        let cli = Cli::try_parse_from(["rosterlab", "seasons", "--data-dir", "/srv/bbm"]).unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/srv/bbm")));
    }

    #[test]
    fn rejects_bad_tokens() {
        assert!(Cli::try_parse_from(["rosterlab", "evaluate", "-s", "30-31"]).is_err());
        assert!(Cli::try_parse_from(["rosterlab", "evaluate", "-v", "blkpunt"]).is_err());
        assert!(Cli::try_parse_from(["rosterlab", "recommend", "--scoring", "points"]).is_err());
    }
}
