// PostgreSQL version resolution.
//
// An explicit version from the command line always wins. Otherwise the
// version is read from `heroku pg:info`, whose output contains a line like
//
//     PG Version:            14.10
//
// The line is split on commas, the first field is split on whitespace and the
// last token is the version.

use log::{debug, info, warn};

use crate::command::CommandRunner;
use crate::config::ToolPaths;
use crate::error::PgsnapError;
use crate::heroku;

/// Label marking the version line in `pg:info` output (case-sensitive)
pub const VERSION_LABEL: &str = "PG Version";

/// Find the version line in `pg:info` output and pull the version token out of it
pub fn parse_postgres_version(info: &str) -> Result<String, PgsnapError> {
    let line = info
        .lines()
        .find(|line| line.contains(VERSION_LABEL))
        .ok_or_else(|| PgsnapError::VersionLabelMissing {
            label: VERSION_LABEL,
            command: "pg:info".to_string(),
        })?;
    debug!("Version line: {:?}", line);

    let first_field = line.split(',').next().unwrap_or_default();
    first_field
        .split_whitespace()
        .last()
        .map(str::to_string)
        .ok_or_else(|| PgsnapError::EmptyVersion { line: line.to_string() })
}

/// Ask Heroku which PostgreSQL version the app's database runs
pub fn discover_postgres_version<R>(
    runner: &mut R,
    tools: &ToolPaths,
    app_name: &str,
) -> Result<String, PgsnapError>
where
    R: CommandRunner + ?Sized,
{
    let command = heroku::info_command(tools, app_name);
    let outcome = runner.capture(&command)?;
    if !outcome.is_success() {
        warn!("`{}` failed with {}", command, outcome.status_text());
    }
    parse_postgres_version(&outcome.stdout).map_err(|e| match e {
        PgsnapError::VersionLabelMissing { label, .. } => {
            PgsnapError::VersionLabelMissing { label, command: command.to_string() }
        }
        other => other,
    })
}

/// Use the explicit version if given, otherwise discover it
pub fn resolve_postgres_version<R>(
    explicit: Option<&str>,
    runner: &mut R,
    tools: &ToolPaths,
    app_name: &str,
) -> Result<String, PgsnapError>
where
    R: CommandRunner + ?Sized,
{
    if let Some(version) = explicit {
        info!("Using PostgreSQL {} from the command line", version);
        return Ok(version.to_string());
    }
    let version = discover_postgres_version(runner, tools, app_name)?;
    info!("Heroku app {} runs PostgreSQL {}", app_name, version);
    Ok(version)
}
