// Configuration loading and parsing (rosterlab.toml).

use rosterlab_core::{ScoringMode, Season, Variant};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the single config file under `config/` and `defaults/`.
pub const CONFIG_FILE: &str = "rosterlab.toml";

/// Log filter used when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_FILTER: &str = "rosterlab=info,warn";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the ranking CSV exports, resolved against the base dir.
    pub data_dir: PathBuf,
    pub defaults: QueryDefaults,
    pub logging: LoggingConfig,
}

/// Values used when a command-line flag is omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryDefaults {
    pub season: Season,
    pub variant: Variant,
    pub scoring: ScoringMode,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `None` means the platform data directory.
    pub dir: Option<PathBuf>,
    pub filter: String,
}

impl LoggingConfig {
    /// Directory the log file is written to.
    pub fn resolved_dir(&self, base_dir: &Path) -> PathBuf {
        if let Some(dir) = &self.dir {
            return dir.clone();
        }
        directories::ProjectDirs::from("", "", "rosterlab")
            .map(|dirs| dirs.data_dir().join("logs"))
            .unwrap_or_else(|| base_dir.join("logs"))
    }
}

// ---------------------------------------------------------------------------
// rosterlab.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire rosterlab.toml file.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    data: DataSection,
    defaults: DefaultsSection,
    #[serde(default)]
    logging: LoggingSection,
}

#[derive(Debug, Clone, Deserialize)]
struct DataSection {
    dir: String,
}

#[derive(Debug, Clone, Deserialize)]
struct DefaultsSection {
    season: String,
    variant: String,
    scoring: String,
}

#[derive(Debug, Clone, Deserialize)]
struct LoggingSection {
    #[serde(default)]
    dir: String,
    #[serde(default = "default_filter")]
    filter: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        LoggingSection {
            dir: String::new(),
            filter: default_filter(),
        }
    }
}

fn default_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/rosterlab.toml` relative to `base_dir`.
///
/// This does not auto-copy defaults. Prefer `load_config()` which handles
/// default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let file: ConfigFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let defaults = validate(&file)?;

    let logging = LoggingConfig {
        dir: non_empty(&file.logging.dir).map(|d| resolve(base_dir, d)),
        filter: file.logging.filter.trim().to_string(),
    };

    Ok(Config {
        data_dir: resolve(base_dir, file.data.dir.trim()),
        defaults,
        logging,
    })
}

/// Seed `config/rosterlab.toml` from `defaults/` on first run.
///
/// Returns the path written, or `None` when the user already has a config
/// (an existing file is never overwritten) or no defaults ship alongside it.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let shipped = base_dir.join("defaults").join(CONFIG_FILE);
    let config_dir = base_dir.join("config");
    let target = config_dir.join(CONFIG_FILE);

    if !shipped.is_file() {
        if !target.is_file() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "no {CONFIG_FILE} in defaults/ or config/ under {}; \
                     run from the rosterlab-app directory",
                    base_dir.display()
                ),
            });
        }
        return Ok(None);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut dest = match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
    {
        Ok(dest) => dest,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(None),
        Err(e) => {
            return Err(ConfigError::DefaultsCopyError {
                message: format!("failed to create {}: {e}", target.display()),
            });
        }
    };
    let content = read_file(&shipped)?;
    std::io::Write::write_all(&mut dest, content.as_bytes()).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to write {}: {e}", target.display()),
    })?;
    Ok(Some(target))
}

/// Loads config relative to the current working directory, seeding it from
/// the shipped defaults first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_file(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}

fn resolve(base_dir: &Path, dir: &str) -> PathBuf {
    let path = Path::new(dir);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(file: &ConfigFile) -> Result<QueryDefaults, ConfigError> {
    if file.data.dir.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.dir".into(),
            message: "must not be empty".into(),
        });
    }

    let season = file
        .defaults
        .season
        .parse::<Season>()
        .map_err(|e| ConfigError::ValidationError {
            field: "defaults.season".into(),
            message: e.to_string(),
        })?;

    let variant = file
        .defaults
        .variant
        .parse::<Variant>()
        .map_err(|e| ConfigError::ValidationError {
            field: "defaults.variant".into(),
            message: e.to_string(),
        })?;

    let scoring = file
        .defaults
        .scoring
        .parse::<ScoringMode>()
        .map_err(|e| ConfigError::ValidationError {
            field: "defaults.scoring".into(),
            message: e.to_string(),
        })?;

    if file.logging.filter.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "logging.filter".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(QueryDefaults {
        season,
        variant,
        scoring,
    })
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Path to the crate's shipped `defaults/` directory.
    fn shipped_defaults() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("defaults")
    }

    /// A temp base dir with `config/rosterlab.toml` holding `text`.
    fn base_with_config(text: &str) -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        let config_dir = tmp.path().join("config");
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join(CONFIG_FILE), text).unwrap();
        tmp
    }

    fn shipped_text() -> String {
        fs::read_to_string(shipped_defaults().join(CONFIG_FILE)).unwrap()
    }

    fn expect_validation_field(err: ConfigError, want: &str) {
        match &err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, want),
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn load_shipped_defaults() {
        let tmp = base_with_config(&shipped_text());
        let config = load_config_from(tmp.path()).expect("should load shipped defaults");

        assert_eq!(config.data_dir, tmp.path().join("data"));
        assert_eq!(config.defaults.season, Season::newest());
        assert_eq!(config.defaults.variant, Variant::NoPunts);
        assert_eq!(config.defaults.scoring, ScoringMode::NineCat);
        assert_eq!(config.logging.dir, Some(tmp.path().join("logs")));
        assert_eq!(config.logging.filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn logging_section_is_optional() {
        let tmp = base_with_config(
            r#"
[data]
dir = "/srv/bbm"

[defaults]
season = "19/20"
variant = "tovpunt"
scoring = "8cat"
"#,
        );
        let config = load_config_from(tmp.path()).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/bbm"));
        assert_eq!(config.defaults.season, Season::new(2019).unwrap());
        assert_eq!(config.defaults.variant, Variant::TovPunt);
        assert_eq!(config.defaults.scoring, ScoringMode::EightCat);
        assert!(config.logging.dir.is_none());
        assert_eq!(config.logging.filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn empty_log_dir_falls_back_outside_config() {
        let logging = LoggingConfig {
            dir: None,
            filter: DEFAULT_LOG_FILTER.into(),
        };
        let dir = logging.resolved_dir(Path::new("/work"));
        assert!(dir.ends_with("logs"));
    }

    #[test]
    fn rejects_empty_data_dir() {
        let tmp = base_with_config(&shipped_text().replace("dir = \"data\"", "dir = \"\""));
        expect_validation_field(load_config_from(tmp.path()).unwrap_err(), "data.dir");
    }

    #[test]
    fn rejects_unsupported_season() {
        let tmp = base_with_config(&shipped_text().replace("season = \"24-25\"", "season = \"30-31\""));
        expect_validation_field(load_config_from(tmp.path()).unwrap_err(), "defaults.season");
    }

    #[test]
    fn rejects_unknown_variant() {
        let tmp = base_with_config(&shipped_text().replace("variant = \"nopunts\"", "variant = \"blkpunt\""));
        expect_validation_field(load_config_from(tmp.path()).unwrap_err(), "defaults.variant");
    }

    #[test]
    fn rejects_unknown_scoring() {
        let tmp = base_with_config(&shipped_text().replace("scoring = \"9cat\"", "scoring = \"points\""));
        expect_validation_field(load_config_from(tmp.path()).unwrap_err(), "defaults.scoring");
    }

    #[test]
    fn rejects_blank_filter() {
        let tmp = base_with_config(
            &shipped_text().replace("filter = \"rosterlab=info,warn\"", "filter = \"  \""),
        );
        expect_validation_field(load_config_from(tmp.path()).unwrap_err(), "logging.filter");
    }

    #[test]
    fn file_not_found_for_missing_config() {
        let tmp = tempfile::tempdir().unwrap();
        let err = load_config_from(tmp.path()).unwrap_err();
        match &err {
            ConfigError::FileNotFound { path } => assert!(path.ends_with(CONFIG_FILE)),
            other => panic!("expected FileNotFound, got: {other}"),
        }
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = base_with_config("this is not valid [[[ toml");
        let err = load_config_from(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn parse_error_for_missing_section() {
        let tmp = base_with_config("[data]\ndir = \"data\"\n");
        let err = load_config_from(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn first_run_seeds_config_from_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let defaults_dir = tmp.path().join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::copy(shipped_defaults().join(CONFIG_FILE), defaults_dir.join(CONFIG_FILE)).unwrap();

        let written = ensure_config_file(tmp.path()).expect("should succeed");
        assert_eq!(written, Some(tmp.path().join("config").join(CONFIG_FILE)));

        load_config_from(tmp.path()).expect("seeded config should load");
    }

    #[test]
    fn edited_config_is_never_overwritten() {
        let tmp = tempfile::tempdir().unwrap();
        let defaults_dir = tmp.path().join("defaults");
        let config_dir = tmp.path().join("config");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::create_dir_all(&config_dir).unwrap();
        fs::copy(shipped_defaults().join(CONFIG_FILE), defaults_dir.join(CONFIG_FILE)).unwrap();
        fs::write(config_dir.join(CONFIG_FILE), "# custom\n").unwrap();

        assert_eq!(ensure_config_file(tmp.path()).unwrap(), None);
        let content = fs::read_to_string(config_dir.join(CONFIG_FILE)).unwrap();
        assert_eq!(content, "# custom\n");
    }

    #[test]
    fn config_without_defaults_is_ok() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("config")).unwrap();
        fs::write(tmp.path().join("config").join(CONFIG_FILE), "# custom\n").unwrap();
        assert_eq!(ensure_config_file(tmp.path()).unwrap(), None);
    }

    #[test]
    fn seeding_fails_with_nothing_to_copy() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("config")).unwrap();
        match ensure_config_file(tmp.path()).unwrap_err() {
            ConfigError::DefaultsCopyError { message } => assert!(message.contains(CONFIG_FILE)),
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }
    }
}
