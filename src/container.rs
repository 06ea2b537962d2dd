// Docker commands for the local PostgreSQL container.

use std::path::Path;

use log::debug;

use crate::command::{ExternalCommand, HIDDEN};
use crate::config::{RunConfig, ToolPaths};
use crate::error::PgsnapError;

/// Official image on Docker Hub; the engine version is the tag
pub const POSTGRES_IMAGE: &str = "postgres";
/// Port the server listens on inside the container
pub const CONTAINER_PORT: u16 = 5432;
/// Data directory of the official image
pub const CONTAINER_DATA_DIR: &str = "/var/lib/postgresql/data";

pub fn image_reference(version: &str) -> String {
    format!("{}:{}", POSTGRES_IMAGE, version)
}

/// `docker pull postgres:<version>`
pub fn pull_command(tools: &ToolPaths, version: &str) -> ExternalCommand {
    ExternalCommand::new(&tools.docker)
        .arg("pull")
        .arg(image_reference(version))
}

/// `docker run --name ... -d postgres:<version>` with credentials, port mapping and data volume
pub fn run_command(tools: &ToolPaths, config: &RunConfig, version: &str) -> ExternalCommand {
    ExternalCommand::new(&tools.docker)
        .args(["run", "--name", config.container_name.as_str()])
        .args(["-e".to_string(), format!("POSTGRES_DB={}", config.db_name)])
        .args(["-e".to_string(), format!("POSTGRES_USER={}", config.db_user)])
        .arg("-e")
        .masked_arg(
            format!("POSTGRES_PASSWORD={}", config.db_password),
            format!("POSTGRES_PASSWORD={}", HIDDEN),
        )
        .args(["-p".to_string(), format!("{}:{}", config.port, CONTAINER_PORT)])
        .args([
            "-v".to_string(),
            format!("{}:{}", config.data_directory.display(), CONTAINER_DATA_DIR),
        ])
        .arg("-d")
        .arg(image_reference(version))
}

/// Create the bind-mount source up front so Docker does not create it as root
pub fn ensure_data_directory(path: &Path) -> Result<(), PgsnapError> {
    debug!("Ensuring data directory {}", path.display());
    std::fs::create_dir_all(path)
        .map_err(|source| PgsnapError::DataDirectory { path: path.to_path_buf(), source })
}
