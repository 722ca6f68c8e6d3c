//! Config resolution for the CLI.
//!
//! Flags beat the config file; the file (or `MESHSCOPE_*` env) beats the
//! built-in defaults.

use std::path::PathBuf;

use clap::ValueEnum;

pub use meshscope_config::Config;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

/// The config file in effect: `--config` if given, else the platform path.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(meshscope_config::config_path)
}

/// Load and validate the config in effect. A missing file yields defaults.
pub fn load_config(global: &GlobalOpts) -> Result<Config, CliError> {
    let path = config_path(global);
    tracing::debug!(path = %path.display(), "loading config");
    Ok(meshscope_config::load_config_from(&path)?)
}

/// Settings resolved from flags and config, shared by every handler.
#[derive(Debug, Clone, Copy)]
pub struct OutputSettings {
    pub format: OutputFormat,
    pub color: bool,
    pub quiet: bool,
}

impl OutputSettings {
    pub fn resolve(global: &GlobalOpts, cfg: &Config) -> Self {
        let format = global.output.unwrap_or_else(|| {
            <OutputFormat as ValueEnum>::from_str(&cfg.defaults.output, true)
                .unwrap_or(OutputFormat::Table)
        });
        let color = global.color.unwrap_or_else(|| {
            <ColorMode as ValueEnum>::from_str(&cfg.defaults.color, true)
                .unwrap_or(ColorMode::Auto)
        });
        Self {
            format,
            color: crate::output::should_color(color),
            quiet: global.quiet,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::Parser;

    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["meshscope"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["config", "path"]);
        Cli::try_parse_from(argv).unwrap().global
    }

    #[test]
    fn config_defaults_apply_without_flags() {
        let mut cfg = Config::default();
        cfg.defaults.output = "json-compact".into();
        cfg.defaults.color = "never".into();
        let settings = OutputSettings::resolve(&global(&[]), &cfg);
        assert_eq!(settings.format, OutputFormat::JsonCompact);
        assert!(!settings.color);
    }

    #[test]
    fn flags_override_config() {
        let mut cfg = Config::default();
        cfg.defaults.output = "yaml".into();
        let g = global(&["-o", "plain", "--color", "always", "-q"]);
        let settings = OutputSettings::resolve(&g, &cfg);
        assert_eq!(settings.format, OutputFormat::Plain);
        assert!(settings.color);
        assert!(settings.quiet);
    }

    #[test]
    fn explicit_config_path_wins() {
        let g = global(&["--config", "/tmp/meshscope-alt.toml"]);
        assert_eq!(config_path(&g), PathBuf::from("/tmp/meshscope-alt.toml"));
    }
}
