//! Shared helpers for command handlers.

use std::io::Read;
use std::path::Path;

use chrono::Utc;
use meshscope_core::scan::{self, parse_iw_link, parse_iw_scan};
use meshscope_core::{ApObservation, ConnectionEvent, CurrentConnection};

use crate::cli::InputFormat;
use crate::error::CliError;

/// Read a whole input file, or stdin when `path` is `-`.
pub fn read_input(path: &Path) -> Result<String, CliError> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => CliError::InputNotFound {
            path: path.display().to_string(),
        },
        _ => CliError::Io(e),
    })
}

/// Load scan observations. `iw` text is stamped with the current time.
pub fn load_scan(path: &Path, format: InputFormat) -> Result<Vec<ApObservation>, CliError> {
    let text = read_input(path)?;
    let observations = match format {
        InputFormat::Iw => parse_iw_scan(&text, Utc::now()),
        InputFormat::Json => scan::observations_from_json(&text)?,
    };
    tracing::debug!(
        path = %path.display(),
        observations = observations.len(),
        "loaded scan"
    );
    Ok(observations)
}

/// Load the current link, failing when the interface isn't associated.
pub fn load_link(path: &Path, format: InputFormat) -> Result<CurrentConnection, CliError> {
    let text = read_input(path)?;
    match format {
        InputFormat::Iw => parse_iw_link(&text).ok_or_else(|| CliError::NoLink {
            path: path.display().to_string(),
        }),
        InputFormat::Json => Ok(scan::connection_from_json(&text)?),
    }
}

/// Load a JSON event log.
pub fn load_events(path: &Path) -> Result<Vec<ConnectionEvent>, CliError> {
    let text = read_input(path)?;
    Ok(scan::events_from_json(&text)?)
}
