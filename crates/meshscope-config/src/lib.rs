//! Configuration for meshscope.
//!
//! A single TOML file (platform config dir, or an explicit path) layered
//! over built-in defaults, with `MESHSCOPE_`-prefixed environment variables
//! on top. Translates the `[venn]` section into the core's
//! [`VennCalculator`] after validation.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use meshscope_core::{DEFAULT_ALTERNATIVE_LIMIT, VennCalculator};

/// Environment variable prefix; `__` separates nested keys.
pub const ENV_PREFIX: &str = "MESHSCOPE_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config file already exists at {}", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,

    /// Overlap layout radius tunables.
    #[serde(default)]
    pub venn: VennSettings,

    #[serde(default)]
    pub patterns: PatternSettings,

    #[serde(default)]
    pub alternatives: AlternativeSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    /// Output format: table, json, json-compact, yaml or plain.
    #[serde(default = "default_output")]
    pub output: String,

    /// Color mode: auto, always or never.
    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct VennSettings {
    #[serde(default = "default_min_radius")]
    pub min_radius: u32,

    #[serde(default = "default_max_radius")]
    pub max_radius: u32,

    /// Radius units gained per dB above −100 dBm.
    #[serde(default = "default_coverage_multiplier")]
    pub coverage_multiplier: f64,
}

impl Default for VennSettings {
    fn default() -> Self {
        Self {
            min_radius: default_min_radius(),
            max_radius: default_max_radius(),
            coverage_multiplier: default_coverage_multiplier(),
        }
    }
}

fn default_min_radius() -> u32 {
    VennCalculator::default().min_radius
}
fn default_max_radius() -> u32 {
    VennCalculator::default().max_radius
}
fn default_coverage_multiplier() -> f64 {
    VennCalculator::default().coverage_multiplier
}

impl VennSettings {
    /// Validate and convert to the core calculator.
    pub fn to_calculator(&self) -> Result<VennCalculator, ConfigError> {
        if self.min_radius == 0 {
            return Err(invalid("venn.min_radius", "must be greater than 0"));
        }
        if self.min_radius >= self.max_radius {
            return Err(invalid(
                "venn.max_radius",
                format!(
                    "must be greater than min_radius ({} >= {})",
                    self.min_radius, self.max_radius
                ),
            ));
        }
        if !self.coverage_multiplier.is_finite() || self.coverage_multiplier < 0.0 {
            return Err(invalid(
                "venn.coverage_multiplier",
                format!("expected a non-negative number, got {}", self.coverage_multiplier),
            ));
        }
        Ok(VennCalculator {
            min_radius: self.min_radius,
            max_radius: self.max_radius,
            coverage_multiplier: self.coverage_multiplier,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PatternSettings {
    /// How far back `patterns` looks, in hours.
    #[serde(default = "default_window_hours")]
    pub window_hours: u32,
}

impl Default for PatternSettings {
    fn default() -> Self {
        Self {
            window_hours: default_window_hours(),
        }
    }
}

fn default_window_hours() -> u32 {
    24
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct AlternativeSettings {
    /// Maximum roaming candidates listed.
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl Default for AlternativeSettings {
    fn default() -> Self {
        Self {
            limit: default_limit(),
        }
    }
}

fn default_limit() -> usize {
    DEFAULT_ALTERNATIVE_LIMIT
}

impl Config {
    /// Check every section; returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        const OUTPUTS: [&str; 5] = ["table", "json", "json-compact", "yaml", "plain"];
        const COLORS: [&str; 3] = ["auto", "always", "never"];

        if !OUTPUTS.contains(&self.defaults.output.as_str()) {
            return Err(invalid(
                "defaults.output",
                format!(
                    "expected one of {}, got '{}'",
                    OUTPUTS.join(", "),
                    self.defaults.output
                ),
            ));
        }
        if !COLORS.contains(&self.defaults.color.as_str()) {
            return Err(invalid(
                "defaults.color",
                format!(
                    "expected one of {}, got '{}'",
                    COLORS.join(", "),
                    self.defaults.color
                ),
            ));
        }
        self.venn.to_calculator()?;
        if self.patterns.window_hours == 0 {
            return Err(invalid("patterns.window_hours", "must be at least 1"));
        }
        if self.alternatives.limit == 0 {
            return Err(invalid("alternatives.limit", "must be at least 1"));
        }
        Ok(())
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "meshscope", "meshscope").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("meshscope");
    p
}

// ── Config loading ──────────────────────────────────────────────────

fn figment_for(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Load and validate config from `path` (a missing file means defaults)
/// plus environment.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = figment_for(path).extract()?;
    config.validate()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`, creating parents.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Write a default config to `path` unless one exists (or `force`).
pub fn init_config(path: &Path, force: bool) -> Result<Config, ConfigError> {
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists {
            path: path.to_path_buf(),
        });
    }
    let cfg = Config::default();
    save_config_to(&cfg, path)?;
    Ok(cfg)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use figment::Jail;
    use pretty_assertions::assert_eq;

    // Loading reads process environment, so every test that loads runs in a
    // Jail (serialized, with a scratch working directory).

    #[test]
    fn defaults_match_core_tunables() {
        let cfg = Config::default();
        assert_eq!(cfg.defaults.output, "table");
        assert_eq!(cfg.patterns.window_hours, 24);
        assert_eq!(cfg.alternatives.limit, DEFAULT_ALTERNATIVE_LIMIT);
        assert_eq!(cfg.venn.to_calculator().unwrap(), VennCalculator::default());
        cfg.validate().unwrap();
    }

    #[test]
    fn missing_file_yields_defaults() {
        Jail::expect_with(|_jail| {
            let cfg = load_config_from(Path::new("absent.toml")).unwrap();
            assert_eq!(cfg, Config::default());
            Ok(())
        });
    }

    #[test]
    fn file_values_override_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                "[defaults]\noutput = \"json\"\n\n[venn]\nmax_radius = 150\n\n[alternatives]\nlimit = 3\n",
            )?;
            let cfg = load_config_from(Path::new("config.toml")).unwrap();
            assert_eq!(cfg.defaults.output, "json");
            assert_eq!(cfg.defaults.color, "auto");
            assert_eq!(cfg.venn.max_radius, 150);
            assert_eq!(cfg.venn.min_radius, 40);
            assert_eq!(cfg.alternatives.limit, 3);
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[patterns]\nwindow_hours = 6\n")?;
            jail.set_env("MESHSCOPE_PATTERNS__WINDOW_HOURS", "48");
            jail.set_env("MESHSCOPE_VENN__MIN_RADIUS", "30");
            let cfg = load_config_from(Path::new("config.toml")).unwrap();
            assert_eq!(cfg.patterns.window_hours, 48);
            assert_eq!(cfg.venn.min_radius, 30);
            Ok(())
        });
    }

    #[test]
    fn invalid_radius_bounds_are_rejected() {
        let venn = VennSettings {
            min_radius: 120,
            max_radius: 40,
            coverage_multiplier: 3.5,
        };
        let err = venn.to_calculator().unwrap_err();
        assert!(err.to_string().contains("venn.max_radius"));

        let venn = VennSettings {
            coverage_multiplier: f64::NAN,
            ..VennSettings::default()
        };
        assert!(venn.to_calculator().is_err());
    }

    #[test]
    fn unknown_output_format_fails_validation() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[defaults]\noutput = \"xml\"\n")?;
            let err = load_config_from(Path::new("config.toml")).unwrap_err();
            assert!(
                matches!(err, ConfigError::Validation { ref field, .. } if field == "defaults.output")
            );
            Ok(())
        });
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        Jail::expect_with(|jail| {
            let path = jail.directory().join("nested").join("config.toml");
            init_config(&path, false).unwrap();
            let written = std::fs::read_to_string(&path).unwrap();
            assert!(written.contains("[venn]"));
            assert!(matches!(
                init_config(&path, false),
                Err(ConfigError::AlreadyExists { .. })
            ));
            init_config(&path, true).unwrap();
            assert_eq!(load_config_from(&path).unwrap(), Config::default());
            Ok(())
        });
    }
}
