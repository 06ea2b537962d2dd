// Runs the three steps in their fixed order:
//
//   1. fetch a Heroku backup (capture + download, or download only)
//   2. start a local PostgreSQL container
//   3. pg_restore the dump into it
//
// Each step is gated by its own flag. No step is retried and nothing is
// rolled back when a later step fails.

use std::path::PathBuf;

use log::{error, info, warn};

use crate::command::{CommandOutcome, CommandRunner, ExternalCommand};
use crate::config::{RunConfig, ToolPaths, DEFAULT_DUMP_FILE};
use crate::error::PgsnapError;
use crate::{container, heroku, restore, version};

/// Exit code recorded for a program that could not be started
pub const MISSING_PROGRAM_CODE: i32 = 127;

/// One external command the run executed
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepRecord {
    /// Command line as displayed (secrets masked)
    pub command: String,
    pub code: Option<i32>,
}

/// Result of a run
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct RunReport {
    /// Dump the restore step used or would have used
    pub dump_file: PathBuf,
    /// Engine version, only set when the container step ran
    pub postgres_version: Option<String>,
    /// Side-effecting commands in execution order
    pub steps: Vec<StepRecord>,
}

impl RunReport {
    /// Commands that exited non-zero (only possible outside strict mode)
    pub fn failed_steps(&self) -> impl Iterator<Item = &StepRecord> {
        self.steps.iter().filter(|step| step.code != Some(0))
    }
}

pub struct Orchestrator<'a, R: CommandRunner + ?Sized> {
    config: &'a RunConfig,
    tools: &'a ToolPaths,
    runner: &'a mut R,
    report: RunReport,
}

impl<'a, R: CommandRunner + ?Sized> Orchestrator<'a, R> {
    pub fn new(config: &'a RunConfig, tools: &'a ToolPaths, runner: &'a mut R) -> Self {
        Self {
            config,
            tools,
            runner,
            report: RunReport { dump_file: config.dump_file.clone(), ..RunReport::default() },
        }
    }

    pub fn run(mut self) -> Result<RunReport, PgsnapError> {
        self.fetch_backup()?;
        if self.config.create_container {
            self.start_container()?;
        }
        if self.config.import_data {
            self.import_data()?;
        }
        Ok(self.report)
    }

    fn fetch_backup(&mut self) -> Result<(), PgsnapError> {
        let config = self.config;
        let app = config.app_name.as_str();
        if config.create_backup {
            info!("Capturing a new backup of Heroku app {}", app);
            self.execute(heroku::capture_command(self.tools, app))?;
            self.execute(heroku::download_command(self.tools, app))?;
        } else if config.download_backup {
            info!("Downloading the latest backup of Heroku app {}", app);
            self.execute(heroku::download_command(self.tools, app))?;
        } else {
            return Ok(());
        }

        // the download always lands in latest.dump, whatever --dump_file said
        let dump_file = PathBuf::from(DEFAULT_DUMP_FILE);
        if dump_file != config.dump_file {
            info!(
                "Using downloaded {} instead of {}",
                dump_file.display(),
                config.dump_file.display()
            );
        }
        if !config.dry_run {
            heroku::report_dump_size(&dump_file);
        }
        self.report.dump_file = dump_file;
        Ok(())
    }

    fn start_container(&mut self) -> Result<(), PgsnapError> {
        let config = self.config;
        let version = version::resolve_postgres_version(
            config.postgres_version.as_deref(),
            &mut *self.runner,
            self.tools,
            &config.app_name,
        )?;
        info!(
            "Starting container {} from {}",
            config.container_name,
            container::image_reference(&version)
        );

        if !config.dry_run {
            container::ensure_data_directory(&config.data_directory)?;
        }
        self.execute(container::pull_command(self.tools, &version))?;
        self.execute(container::run_command(self.tools, config, &version))?;
        self.report.postgres_version = Some(version);
        Ok(())
    }

    fn import_data(&mut self) -> Result<(), PgsnapError> {
        info!(
            "Restoring {} into {}",
            self.report.dump_file.display(),
            self.config.connection_url_masked()
        );
        let command = restore::restore_command(self.tools, self.config, &self.report.dump_file);
        self.execute(command)
    }

    /// Run one side-effecting command and apply the exit-code policy
    fn execute(&mut self, command: ExternalCommand) -> Result<(), PgsnapError> {
        let shown = command.to_string();
        let outcome = match self.runner.run(&command) {
            Ok(outcome) => outcome,
            // a shell reports a missing program as 127 and carries on
            Err(e @ PgsnapError::Spawn { .. }) if !self.config.strict => {
                warn!("{}, continuing", e);
                CommandOutcome { code: Some(MISSING_PROGRAM_CODE), stdout: String::new() }
            }
            Err(e) => {
                self.report.steps.push(StepRecord { command: shown, code: None });
                return Err(e);
            }
        };
        self.report.steps.push(StepRecord { command: shown.clone(), code: outcome.code });

        if outcome.is_success() {
            return Ok(());
        }
        if self.config.strict {
            error!("`{}` failed with {}", shown, outcome.status_text());
            return Err(PgsnapError::StepFailed { command: shown, status: outcome.status_text() });
        }
        warn!("`{}` failed with {}, continuing", shown, outcome.status_text());
        Ok(())
    }
}
