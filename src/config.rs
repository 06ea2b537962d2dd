use std::env;
use std::path::PathBuf;

use crate::command::HIDDEN;

/// File name `heroku pg:backups:download` always writes to
pub const DEFAULT_DUMP_FILE: &str = "latest.dump";

/// Load environment variables from .env file or from the file specified in DOTENV_PATH
pub fn load_env() {
    // Check if DOTENV_PATH is set and use that file instead of the default .env
    if let Ok(dotenv_path) = env::var("DOTENV_PATH") {
        dotenvy::from_path(dotenv_path).ok();
    } else {
        dotenvy::dotenv().ok();
    }
}

/// Get environment variable with a default value
fn get_env_with_default(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}

/// Everything one run needs, fixed once parsing is done
#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    pub app_name: String,
    pub container_name: String,
    /// Explicit engine version; skips `pg:info` discovery when set
    pub postgres_version: Option<String>,
    pub db_name: String,
    pub db_user: String,
    pub db_password: String,
    pub host: String,
    pub port: u16,
    pub data_directory: PathBuf,
    pub dump_file: PathBuf,
    pub create_backup: bool,
    pub download_backup: bool,
    pub create_container: bool,
    pub import_data: bool,
    /// Abort on the first non-zero exit instead of logging and moving on
    pub strict: bool,
    pub dry_run: bool,
}

impl RunConfig {
    /// True when step 1 will leave a fresh `latest.dump` behind
    pub fn fetches_backup(&self) -> bool {
        self.create_backup || self.download_backup
    }

    /// Connection URL for the local database with the password masked
    pub fn connection_url_masked(&self) -> String {
        format!(
            "postgresql://{}:{}@{}:{}/{}",
            self.db_user, HIDDEN, self.host, self.port, self.db_name
        )
    }
}

/// Program names of the external tools
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolPaths {
    pub heroku: String,
    pub docker: String,
    pub pg_restore: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            heroku: "heroku".to_string(),
            docker: "docker".to_string(),
            pg_restore: "pg_restore".to_string(),
        }
    }
}

impl ToolPaths {
    /// Load tool locations from HEROKU_BIN, DOCKER_BIN and PG_RESTORE_BIN
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            heroku: get_env_with_default("HEROKU_BIN", &defaults.heroku),
            docker: get_env_with_default("DOCKER_BIN", &defaults.docker),
            pg_restore: get_env_with_default("PG_RESTORE_BIN", &defaults.pg_restore),
        }
    }
}
