use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};

use crate::config::{RunConfig, DEFAULT_DUMP_FILE};

const ABOUT: &str = "Pull a Heroku Postgres backup into a local Docker PostgreSQL container";

const LONG_ABOUT: &str = "\
Pull a Heroku Postgres backup into a local Docker PostgreSQL container.

- With --create_backup, a new backup is captured on Heroku with
    heroku pg:backups:capture --app <app_name>
  and then downloaded with
    heroku pg:backups:download --app <app_name>
  --download_backup only downloads the latest existing backup.
  Either way the dump lands in ./latest.dump and --dump_file is ignored.
- With --create_container, the image postgres:<postgres_version> is pulled and
    docker run --name <container_name> \\
        -e POSTGRES_DB=<db_name> \\
        -e POSTGRES_USER=<db_user> \\
        -e POSTGRES_PASSWORD=<db_password> \\
        -p <port>:5432 \\
        -v <data_directory>:/var/lib/postgresql/data \\
        -d postgres:<postgres_version>
  is started. Without --postgres_version the version is read from
    heroku pg:info --app <app_name>
- With --import_data, the dump is loaded with
    pg_restore --verbose --clean --no-acl --no-owner \\
        -h <host> -p <port> -U <db_user> -d <db_name> <dump_file>";

const AFTER_LONG_HELP: &str = "\
Afterwards, point your application at the local database. For Django:

DATABASES = {
    'default': {
        'ENGINE': 'django.db.backends.postgresql',
        'NAME': '<db_name>',
        'USER': '<db_user>',
        'PASSWORD': '<db_password>',
        'HOST': 'localhost',
        'PORT': '<port>',
    },
}

Reference:
- Heroku: https://devcenter.heroku.com/articles/heroku-postgres-import-export
- Postgres Docker: https://www.docker.com/blog/how-to-use-the-postgres-docker-official-image/";

/// Command-line options for pgsnap
#[derive(Debug, Parser)]
#[command(name = "pgsnap", version, about = ABOUT, long_about = LONG_ABOUT, after_long_help = AFTER_LONG_HELP)]
pub struct Opt {
    #[arg(long = "app_name", alias = "app-name", env = "HEROKU_APP", default_value = "test", help = "Heroku app name")]
    pub app_name: String,

    #[arg(long = "container_name", alias = "container-name", env = "PG_CONTAINER_NAME", default_value = "test", help = "Docker container name")]
    pub container_name: String,

    #[arg(long = "postgres_version", alias = "postgres-version", env = "PG_IMAGE_VERSION", help = "PostgreSQL version to run; read from `heroku pg:info` when omitted")]
    pub postgres_version: Option<String>,

    #[arg(long = "db_name", alias = "db-name", env = "PG_DB_NAME", default_value = "postgres", help = "Database name")]
    pub db_name: String,

    #[arg(long = "db_user", alias = "db-user", env = "PG_USERNAME", default_value = "postgres", help = "Database user")]
    pub db_user: String,

    #[arg(long = "db_password", alias = "db-password", env = "PG_PASSWORD", default_value = "postgres", hide_env_values = true, help = "Database password")]
    pub db_password: String,

    #[arg(long, env = "PG_HOST", default_value = "localhost", help = "Host pg_restore connects to")]
    pub host: String,

    #[arg(long, env = "PG_PORT", default_value_t = 5432, help = "Host port mapped to the container's port 5432")]
    pub port: u16,

    #[arg(long = "data_directory", alias = "data-directory", env = "PG_DATA_DIRECTORY", help = "Host directory mounted as the PostgreSQL data volume [default: $PWD/pgdata]")]
    pub data_directory: Option<PathBuf>,

    #[arg(long = "dump_file", alias = "dump-file", env = "PG_DUMP_FILE", default_value = DEFAULT_DUMP_FILE, help = "Dump file to restore")]
    pub dump_file: PathBuf,

    #[arg(long = "create_backup", alias = "create-backup", action = ArgAction::Set, num_args = 0..=1, default_value = "false", default_missing_value = "true", value_parser = BoolishValueParser::new(), help = "Capture and download a new Heroku backup")]
    pub create_backup: bool,

    #[arg(long = "download_backup", alias = "download-backup", action = ArgAction::Set, num_args = 0..=1, default_value = "false", default_missing_value = "true", value_parser = BoolishValueParser::new(), help = "Download the latest existing Heroku backup")]
    pub download_backup: bool,

    #[arg(long = "create_container", alias = "create-container", action = ArgAction::Set, num_args = 0..=1, default_value = "false", default_missing_value = "true", value_parser = BoolishValueParser::new(), help = "Pull the image and start the PostgreSQL container")]
    pub create_container: bool,

    #[arg(long = "import_data", alias = "import-data", action = ArgAction::Set, num_args = 0..=1, default_value = "false", default_missing_value = "true", value_parser = BoolishValueParser::new(), help = "Restore the dump file into the database")]
    pub import_data: bool,

    #[arg(long, env = "PGSNAP_STRICT", action = ArgAction::Set, num_args = 0..=1, default_value = "false", default_missing_value = "true", value_parser = BoolishValueParser::new(), help = "Stop at the first external command that exits non-zero")]
    pub strict: bool,

    #[arg(long = "dry_run", alias = "dry-run", action = ArgAction::Set, num_args = 0..=1, default_value = "false", default_missing_value = "true", value_parser = BoolishValueParser::new(), help = "Print the commands instead of running them")]
    pub dry_run: bool,

    #[arg(long = "log_file", alias = "log-file", env = "PGSNAP_LOG_FILE", default_value = "pgsnap.log", help = "Log file path")]
    pub log_file: PathBuf,
}

impl Opt {
    /// Turn parsed options into the run configuration
    pub fn into_config(self) -> Result<RunConfig> {
        let data_directory = match self.data_directory {
            Some(dir) => dir,
            None => std::env::current_dir()
                .context("Failed to determine the current directory")?
                .join("pgdata"),
        };
        Ok(RunConfig {
            app_name: self.app_name,
            container_name: self.container_name,
            postgres_version: self.postgres_version.filter(|v| !v.trim().is_empty()),
            db_name: self.db_name,
            db_user: self.db_user,
            db_password: self.db_password,
            host: self.host,
            port: self.port,
            data_directory,
            dump_file: self.dump_file,
            create_backup: self.create_backup,
            download_backup: self.download_backup,
            create_container: self.create_container,
            import_data: self.import_data,
            strict: self.strict,
            dry_run: self.dry_run,
        })
    }
}
