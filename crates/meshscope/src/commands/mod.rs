//! Command dispatch: bridges CLI args -> core analyses -> output formatting.

pub mod alternatives;
pub mod analyze;
pub mod config_cmd;
pub mod patterns;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::config::{self, OutputSettings};
use crate::error::CliError;

/// Dispatch an analysis command to the appropriate handler.
pub fn dispatch(cmd: &Command, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config(global)?;
    let settings = OutputSettings::resolve(global, &cfg);
    match cmd {
        Command::Analyze(args) => analyze::handle(args, &cfg, settings),
        Command::Alternatives(args) => alternatives::handle(args, &cfg, settings),
        Command::Patterns(args) => patterns::handle(args, &cfg, settings),
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
