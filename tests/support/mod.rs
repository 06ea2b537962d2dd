// Shared helpers for the integration tests
#![allow(dead_code)]

use std::collections::VecDeque;

use clap::{CommandFactory, FromArgMatches};
use pgsnap::cli::Opt;
use pgsnap::command::{CommandOutcome, CommandRunner, ExternalCommand};
use pgsnap::config::RunConfig;
use pgsnap::error::PgsnapError;

/// How a recorded command was invoked
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Run(ExternalCommand),
    Capture(ExternalCommand),
}

impl Call {
    pub fn command(&self) -> &ExternalCommand {
        match self {
            Call::Run(cmd) | Call::Capture(cmd) => cmd,
        }
    }

    pub fn line(&self) -> String {
        self.command().to_string()
    }
}

/// Records every command instead of spawning it
#[derive(Default)]
pub struct RecordingRunner {
    pub calls: Vec<Call>,
    /// stdout returned by `capture`
    pub info_output: String,
    /// exit codes handed out to `run` in order; success once exhausted
    pub run_codes: VecDeque<Option<i32>>,
    /// programs that fail to start, as if they were not on PATH
    pub missing_programs: Vec<String>,
}

impl RecordingRunner {
    pub fn with_info(info_output: &str) -> Self {
        Self { info_output: info_output.to_string(), ..Self::default() }
    }

    pub fn lines(&self) -> Vec<String> {
        self.calls.iter().map(Call::line).collect()
    }

    pub fn captures(&self) -> usize {
        self.calls.iter().filter(|call| matches!(call, Call::Capture(_))).count()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&mut self, command: &ExternalCommand) -> Result<CommandOutcome, PgsnapError> {
        self.calls.push(Call::Run(command.clone()));
        if self.missing_programs.iter().any(|p| p == command.program()) {
            return Err(PgsnapError::Spawn {
                program: command.program().to_string(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }
        let code = self.run_codes.pop_front().unwrap_or(Some(0));
        Ok(CommandOutcome { code, stdout: String::new() })
    }

    fn capture(&mut self, command: &ExternalCommand) -> Result<CommandOutcome, PgsnapError> {
        self.calls.push(Call::Capture(command.clone()));
        Ok(CommandOutcome { code: Some(0), stdout: self.info_output.clone() })
    }
}

/// Build a run configuration the way main does, from command-line style arguments.
///
/// Environment fallbacks (PG_PORT, HEROKU_APP, ...) are switched off so a
/// developer's shell or .env cannot change what the tests see.
pub fn config_from(args: &[&str]) -> RunConfig {
    let argv = std::iter::once("pgsnap").chain(args.iter().copied());
    let matches = Opt::command()
        .mut_args(|arg| arg.env(None::<&'static str>))
        .try_get_matches_from(argv)
        .expect("valid arguments");
    Opt::from_arg_matches(&matches)
        .expect("valid arguments")
        .into_config()
        .expect("valid configuration")
}
