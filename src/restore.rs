use std::path::Path;

use log::debug;

use crate::command::ExternalCommand;
use crate::config::{RunConfig, ToolPaths};

/// Build the pg_restore command that loads `dump_file` into the local database
///
/// The dump is restored with `--clean --no-acl --no-owner`, so objects are
/// dropped before being recreated and Heroku's roles and grants are skipped.
/// The password travels in the child's `PGPASSWORD` so pg_restore does not
/// prompt for it.
pub fn restore_command(tools: &ToolPaths, config: &RunConfig, dump_file: &Path) -> ExternalCommand {
    debug!("Building pg_restore command for {}", dump_file.display());
    ExternalCommand::new(&tools.pg_restore)
        .args(["--verbose", "--clean", "--no-acl", "--no-owner"])
        .args(["-h", config.host.as_str()])
        .args(["-p".to_string(), config.port.to_string()])
        .args(["-U", config.db_user.as_str()])
        .args(["-d", config.db_name.as_str()])
        .arg(dump_file.to_string_lossy())
        .env("PGPASSWORD", config.db_password.as_str())
}
