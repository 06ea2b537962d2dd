// Heroku Postgres CLI commands: backup capture, backup download and pg:info.

use std::path::Path;

use humansize::{format_size, DECIMAL};
use log::{info, warn};

use crate::command::ExternalCommand;
use crate::config::ToolPaths;

fn app_command(tools: &ToolPaths, subcommand: &str, app_name: &str) -> ExternalCommand {
    ExternalCommand::new(&tools.heroku)
        .arg(subcommand)
        .arg("--app")
        .arg(app_name)
}

/// `heroku pg:info --app <app>`
pub fn info_command(tools: &ToolPaths, app_name: &str) -> ExternalCommand {
    app_command(tools, "pg:info", app_name)
}

/// `heroku pg:backups:capture --app <app>`
pub fn capture_command(tools: &ToolPaths, app_name: &str) -> ExternalCommand {
    app_command(tools, "pg:backups:capture", app_name)
}

/// `heroku pg:backups:download --app <app>`, which writes `latest.dump` in the working directory
pub fn download_command(tools: &ToolPaths, app_name: &str) -> ExternalCommand {
    app_command(tools, "pg:backups:download", app_name)
}

/// Log how big the downloaded dump is, or warn if the download left nothing behind
pub fn report_dump_size(dump_file: &Path) -> Option<u64> {
    match std::fs::metadata(dump_file) {
        Ok(meta) => {
            info!("Backup saved to {} ({})", dump_file.display(), format_size(meta.len(), DECIMAL));
            Some(meta.len())
        }
        Err(e) => {
            warn!("Backup file {} is not readable after download: {}", dump_file.display(), e);
            None
        }
    }
}
