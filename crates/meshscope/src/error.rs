//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use meshscope_config::ConfigError;
use meshscope_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const PARSE: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Input ────────────────────────────────────────────────────────
    #[error("Input file not found: {path}")]
    #[diagnostic(
        code(meshscope::input_not_found),
        help("Check the path, or pass `-` to read from stdin.")
    )]
    InputNotFound { path: String },

    #[error("SSID '{ssid}' not found in scan")]
    #[diagnostic(
        code(meshscope::ssid_not_found),
        help("SSIDs in this scan: {available}")
    )]
    SsidNotFound { ssid: String, available: String },

    #[error("No usable link information in {path}")]
    #[diagnostic(
        code(meshscope::no_link),
        help(
            "Expected `iw dev <if> link` output with `Connected to`, `SSID:` and `freq:` lines.\n\
             Is the interface associated?"
        )
    )]
    NoLink { path: String },

    #[error("Could not parse {what}")]
    #[diagnostic(
        code(meshscope::parse),
        help("Check --input-format matches the file contents.")
    )]
    Parse {
        what: String,
        #[source]
        source: CoreError,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(meshscope::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration file already exists at {path}")]
    #[diagnostic(
        code(meshscope::config_exists),
        help("Use `meshscope config init --force` to overwrite it.")
    )]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(
        code(meshscope::config),
        help("Run `meshscope config path` to locate the file in use.")
    )]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(meshscope::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InputNotFound { .. } | Self::SsidNotFound { .. } => exit_code::NOT_FOUND,
            Self::Parse { .. } | Self::NoLink { .. } => exit_code::PARSE,
            Self::Validation { .. } | Self::ConfigExists { .. } => exit_code::USAGE,
            Self::Config(_) | Self::Io(_) | Self::Render(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        let what = match &err {
            CoreError::InvalidBssid { .. } => "BSSID".to_owned(),
            CoreError::Decode { what, .. } => (*what).to_owned(),
        };
        Self::Parse { what, source: err }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::AlreadyExists { path } => Self::ConfigExists {
                path: path.display().to_string(),
            },
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_parse_exit_code() {
        let err = CliError::from(CoreError::InvalidBssid {
            value: "nope".into(),
        });
        assert_eq!(err.exit_code(), exit_code::PARSE);
        assert!(err.to_string().contains("BSSID"));
    }

    #[test]
    fn config_validation_is_a_usage_error() {
        let err = CliError::from(ConfigError::Validation {
            field: "venn.min_radius".into(),
            reason: "must be greater than 0".into(),
        });
        assert_eq!(err.exit_code(), exit_code::USAGE);
        assert_eq!(
            err.to_string(),
            "Invalid value for venn.min_radius: must be greater than 0"
        );
    }

    #[test]
    fn missing_inputs_are_not_found() {
        let err = CliError::SsidNotFound {
            ssid: "Guest".into(),
            available: "Home".into(),
        };
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
    }
}
