// Configuration loading and parsing (league.toml, identities.toml).

use serde::Deserialize;
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use thiserror::Error;

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
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub league: LeagueConfig,
    pub provider: ProviderConfig,
    pub reports: ReportConfig,
    pub identities: IdentityConfig,
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire league.toml file.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueConfig,
    #[serde(default)]
    provider: ProviderConfig,
    #[serde(default)]
    reports: ReportConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeagueConfig {
    pub name: String,
    /// Id of the newest season in the league's lineage. History is walked
    /// backwards from here.
    pub league_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout. A timed out request counts as a failed fetch.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Upper bound on in-flight upstream requests during a report run.
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            max_concurrent_requests: default_max_concurrent_requests(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_first_week")]
    pub first_week: u32,
    #[serde(default = "default_last_week")]
    pub last_week: u32,
    /// Row limit for the all-time high score tables.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Hard cap on how many seasons the lineage walk will follow.
    #[serde(default = "default_max_seasons")]
    pub max_seasons: usize,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl ReportConfig {
    /// The scanned week window (regular season and playoffs together).
    pub fn weeks(&self) -> RangeInclusive<u32> {
        self.first_week..=self.last_week
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            first_week: default_first_week(),
            last_week: default_last_week(),
            top_n: default_top_n(),
            max_seasons: default_max_seasons(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.sleeper.app/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_concurrent_requests() -> usize {
    8
}

fn default_first_week() -> u32 {
    1
}

fn default_last_week() -> u32 {
    18
}

fn default_top_n() -> usize {
    20
}

fn default_max_seasons() -> usize {
    20
}

fn default_output_dir() -> String {
    "reports".to_string()
}

// ---------------------------------------------------------------------------
// identities.toml structs
// ---------------------------------------------------------------------------

/// Static identity tables: handle aliases, real names and roster overrides
/// for seasons where the upstream ownership link is missing or wrong.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentityConfig {
    /// Retired or renamed handle -> current handle.
    #[serde(default)]
    pub aliases: HashMap<String, String>,
    /// Canonical handle -> real-world display name.
    #[serde(default)]
    pub display_names: HashMap<String, String>,
    #[serde(default)]
    pub roster_overrides: Vec<RosterOverride>,
}

/// Pins a roster to a handle. Without `season_id` the override applies to
/// that roster number in every season that has no season-specific entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RosterOverride {
    #[serde(default)]
    pub season_id: Option<String>,
    pub roster_id: u32,
    pub handle: String,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` and
/// (optionally) `config/identities.toml`, relative to `base_dir`.
///
/// Does not copy defaults; see [`load_config_in`].
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- league.toml (required) ---
    let league_path = config_dir.join("league.toml");
    let league_text = read_file(&league_path)?;
    let league_file: LeagueFile =
        toml::from_str(&league_text).map_err(|e| ConfigError::ParseError {
            path: league_path.clone(),
            source: e,
        })?;

    // --- identities.toml (optional) ---
    let identities_path = config_dir.join("identities.toml");
    let identities = if identities_path.exists() {
        let text = read_file(&identities_path)?;
        toml::from_str(&text).map_err(|e| ConfigError::ParseError {
            path: identities_path.clone(),
            source: e,
        })?
    } else {
        IdentityConfig::default()
    };

    let config = Config {
        league: league_file.league,
        provider: league_file.provider,
        reports: league_file.reports,
        identities,
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    let mut copied = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let source = entry.path();
        if !source.is_file() {
            continue;
        }
        let Some(file_name) = source.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }

        let target = config_dir.join(file_name);
        if copy_if_missing(&source, &target)? {
            copied.push(target);
        }
    }

    Ok(copied)
}

/// Copy defaults if needed, then load config from `base_dir`.
pub fn load_config_in(base_dir: &Path) -> Result<Config, ConfigError> {
    ensure_config_files(base_dir)?;
    load_config_from(base_dir)
}

/// Convenience wrapper: loads config relative to the current working directory.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    load_config_in(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

/// Returns `true` when `target` was created. An existing target is left alone.
///
/// The source is read before the target is created, and a target whose write
/// fails is removed, so a failed copy never leaves an empty config behind.
fn copy_if_missing(source: &Path, target: &Path) -> Result<bool, ConfigError> {
    if target.exists() {
        return Ok(false);
    }

    let content = std::fs::read(source).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read {}: {e}", source.display()),
    })?;

    let mut dest = match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)
    {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => {
            return Err(ConfigError::DefaultsCopyError {
                message: format!("failed to create {}: {e}", target.display()),
            })
        }
    };

    if let Err(e) = std::io::Write::write_all(&mut dest, &content) {
        drop(dest);
        let _ = std::fs::remove_file(target);
        return Err(ConfigError::DefaultsCopyError {
            message: format!("failed to write {}: {e}", target.display()),
        });
    }
    Ok(true)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.league.league_id.trim().is_empty() {
        return Err(invalid("league.league_id", "must not be empty"));
    }

    let provider = &config.provider;
    if provider.base_url.trim().is_empty() {
        return Err(invalid("provider.base_url", "must not be empty"));
    }
    if provider.timeout_secs == 0 {
        return Err(invalid("provider.timeout_secs", "must be > 0"));
    }
    if provider.max_concurrent_requests == 0 {
        return Err(invalid("provider.max_concurrent_requests", "must be > 0"));
    }

    let reports = &config.reports;
    if reports.first_week == 0 {
        return Err(invalid("reports.first_week", "weeks are 1-indexed"));
    }
    if reports.last_week < reports.first_week {
        return Err(invalid(
            "reports.last_week",
            format!(
                "must be >= first_week ({}), got {}",
                reports.first_week, reports.last_week
            ),
        ));
    }
    if reports.top_n == 0 {
        return Err(invalid("reports.top_n", "must be > 0"));
    }
    if reports.max_seasons == 0 {
        return Err(invalid("reports.max_seasons", "must be > 0"));
    }

    for (idx, o) in config.identities.roster_overrides.iter().enumerate() {
        if o.handle.trim().is_empty() {
            return Err(invalid(
                &format!("roster_overrides[{idx}].handle"),
                "must not be empty",
            ));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Workspace root, where the shipped `defaults/` directory lives.
    fn project_root() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
    }

    const MINIMAL_LEAGUE: &str = r#"
[league]
name = "Test League"
league_id = "300"
"#;

    /// Fresh scratch dir with an empty `config/` inside.
    fn scratch(name: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        tmp
    }

    fn expect_validation_field(err: ConfigError, expected: &str) {
        match &err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, expected),
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn load_shipped_defaults() {
        let tmp = scratch("leaguebook_cfg_defaults");
        let root = project_root();
        fs::copy(
            root.join("defaults/league.toml"),
            tmp.join("config/league.toml"),
        )
        .unwrap();
        fs::copy(
            root.join("defaults/identities.toml"),
            tmp.join("config/identities.toml"),
        )
        .unwrap();

        let config = load_config_from(&tmp).expect("shipped defaults should load");
        assert_eq!(config.league.league_id, "1187453772455809024");
        assert_eq!(config.provider.base_url, "https://api.sleeper.app/v1");
        assert_eq!(config.reports.weeks(), 1..=18);
        assert_eq!(config.reports.top_n, 20);
        assert_eq!(config.reports.max_seasons, 20);
        assert_eq!(
            config.identities.aliases.get("BradKane").map(String::as_str),
            Some("BradWillz")
        );
        assert!(config
            .identities
            .roster_overrides
            .iter()
            .any(|o| o.season_id.is_none() && o.roster_id == 8));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn minimal_league_file_uses_defaults() {
        let tmp = scratch("leaguebook_cfg_minimal");
        fs::write(tmp.join("config/league.toml"), MINIMAL_LEAGUE).unwrap();

        let config = load_config_from(&tmp).expect("minimal config should load");
        assert_eq!(config.league.name, "Test League");
        assert_eq!(config.provider.timeout_secs, 10);
        assert_eq!(config.provider.max_concurrent_requests, 8);
        assert_eq!(config.reports.first_week, 1);
        assert_eq!(config.reports.last_week, 18);
        assert!(config.identities.aliases.is_empty());
        assert!(config.identities.roster_overrides.is_empty());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn identities_file_is_parsed() {
        let tmp = scratch("leaguebook_cfg_identities");
        fs::write(tmp.join("config/league.toml"), MINIMAL_LEAGUE).unwrap();
        fs::write(
            tmp.join("config/identities.toml"),
            r#"
[aliases]
old_name = "new_name"

[display_names]
new_name = "Newt"

[[roster_overrides]]
season_id = "300"
roster_id = 4
handle = "new_name"
"#,
        )
        .unwrap();

        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.identities.display_names["new_name"], "Newt");
        assert_eq!(
            config.identities.roster_overrides,
            vec![RosterOverride {
                season_id: Some("300".into()),
                roster_id: 4,
                handle: "new_name".into(),
            }]
        );

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_empty_league_id() {
        let tmp = scratch("leaguebook_cfg_empty_id");
        fs::write(
            tmp.join("config/league.toml"),
            "[league]\nname = \"x\"\nleague_id = \"  \"\n",
        )
        .unwrap();
        expect_validation_field(load_config_from(&tmp).unwrap_err(), "league.league_id");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_max_seasons() {
        let tmp = scratch("leaguebook_cfg_zero_seasons");
        fs::write(
            tmp.join("config/league.toml"),
            format!("{MINIMAL_LEAGUE}\n[reports]\nmax_seasons = 0\n"),
        )
        .unwrap();
        expect_validation_field(load_config_from(&tmp).unwrap_err(), "reports.max_seasons");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_concurrency() {
        let tmp = scratch("leaguebook_cfg_zero_concurrency");
        fs::write(
            tmp.join("config/league.toml"),
            format!("{MINIMAL_LEAGUE}\n[provider]\nmax_concurrent_requests = 0\n"),
        )
        .unwrap();
        expect_validation_field(
            load_config_from(&tmp).unwrap_err(),
            "provider.max_concurrent_requests",
        );
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_timeout() {
        let tmp = scratch("leaguebook_cfg_zero_timeout");
        fs::write(
            tmp.join("config/league.toml"),
            format!("{MINIMAL_LEAGUE}\n[provider]\ntimeout_secs = 0\n"),
        )
        .unwrap();
        expect_validation_field(load_config_from(&tmp).unwrap_err(), "provider.timeout_secs");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_top_n() {
        let tmp = scratch("leaguebook_cfg_zero_top_n");
        fs::write(
            tmp.join("config/league.toml"),
            format!("{MINIMAL_LEAGUE}\n[reports]\ntop_n = 0\n"),
        )
        .unwrap();
        expect_validation_field(load_config_from(&tmp).unwrap_err(), "reports.top_n");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_inverted_week_range() {
        let tmp = scratch("leaguebook_cfg_inverted_weeks");
        fs::write(
            tmp.join("config/league.toml"),
            format!("{MINIMAL_LEAGUE}\n[reports]\nfirst_week = 10\nlast_week = 3\n"),
        )
        .unwrap();
        expect_validation_field(load_config_from(&tmp).unwrap_err(), "reports.last_week");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_week_zero() {
        let tmp = scratch("leaguebook_cfg_week_zero");
        fs::write(
            tmp.join("config/league.toml"),
            format!("{MINIMAL_LEAGUE}\n[reports]\nfirst_week = 0\n"),
        )
        .unwrap();
        expect_validation_field(load_config_from(&tmp).unwrap_err(), "reports.first_week");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_blank_override_handle() {
        let tmp = scratch("leaguebook_cfg_blank_override");
        fs::write(tmp.join("config/league.toml"), MINIMAL_LEAGUE).unwrap();
        fs::write(
            tmp.join("config/identities.toml"),
            "[[roster_overrides]]\nroster_id = 2\nhandle = \"\"\n",
        )
        .unwrap();
        expect_validation_field(
            load_config_from(&tmp).unwrap_err(),
            "roster_overrides[0].handle",
        );
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_for_missing_league_toml() {
        let tmp = scratch("leaguebook_cfg_missing_league");
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::FileNotFound { path } => assert!(path.ends_with("league.toml")),
            other => panic!("expected FileNotFound, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = scratch("leaguebook_cfg_invalid_toml");
        fs::write(tmp.join("config/league.toml"), "this is not valid [[[ toml").unwrap();
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::ParseError { path, .. } => assert!(path.ends_with("league.toml")),
            other => panic!("expected ParseError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_copies_missing_and_skips_examples() {
        let tmp = std::env::temp_dir().join("leaguebook_cfg_ensure");
        let _ = fs::remove_dir_all(&tmp);
        let defaults = tmp.join("defaults");
        fs::create_dir_all(&defaults).unwrap();
        fs::write(defaults.join("league.toml"), MINIMAL_LEAGUE).unwrap();
        fs::write(defaults.join("identities.toml.example"), "[aliases]\n").unwrap();

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert_eq!(copied.len(), 1);
        assert!(tmp.join("config/league.toml").exists());
        assert!(!tmp.join("config/identities.toml.example").exists());

        // Second run leaves the existing file alone.
        fs::write(tmp.join("config/league.toml"), "# custom\n").unwrap();
        assert!(ensure_config_files(&tmp).unwrap().is_empty());
        assert_eq!(
            fs::read_to_string(tmp.join("config/league.toml")).unwrap(),
            "# custom\n"
        );

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn failed_copy_leaves_no_target_behind() {
        let tmp = scratch("leaguebook_cfg_failed_copy");
        let target = tmp.join("config/league.toml");

        let err = copy_if_missing(&tmp.join("defaults/league.toml"), &target).unwrap_err();
        assert!(matches!(err, ConfigError::DefaultsCopyError { .. }));
        assert!(!target.exists());

        // A later run with the default in place still gets a real copy.
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::write(tmp.join("defaults/league.toml"), MINIMAL_LEAGUE).unwrap();
        assert!(copy_if_missing(&tmp.join("defaults/league.toml"), &target).unwrap());
        assert_eq!(load_config_from(&tmp).unwrap().league.league_id, "300");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_errors_when_both_dirs_missing() {
        let tmp = std::env::temp_dir().join("leaguebook_cfg_both_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        match ensure_config_files(&tmp).unwrap_err() {
            ConfigError::DefaultsCopyError { message } => {
                assert!(message.contains("neither defaults/ nor config/"));
            }
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }
}
