//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config::{self, OutputSettings};
use crate::error::CliError;
use crate::output;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::config_path(global);
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load_config(global)?;
            let settings = OutputSettings::resolve(global, &cfg);
            let rendered = match settings.format {
                // The config file format is the natural "table" view here.
                OutputFormat::Table | OutputFormat::Plain => {
                    toml::to_string_pretty(&cfg).map_err(|e| CliError::Render(e.to_string()))?
                }
                format => output::render_single(format, &cfg, |_| String::new(), |_| String::new())?,
            };
            output::print_output(rendered.trim_end(), settings.quiet);
            Ok(())
        }

        ConfigCommand::Init { force } => {
            meshscope_config::init_config(&path, force)?;
            eprintln!("Wrote default config to {}", path.display());
            Ok(())
        }
    }
}
