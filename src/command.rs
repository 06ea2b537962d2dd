// Structured invocation of external tools.
//
// Every external program is described by an `ExternalCommand` (program name,
// argument vector, extra environment) and executed through a `CommandRunner`.
// Nothing here goes through a shell, so names, passwords and paths are passed
// to the child verbatim.

use std::fmt;
use std::process::{Command, Stdio};

use log::{debug, info};

use crate::error::PgsnapError;

/// Placeholder printed instead of secret values
pub const HIDDEN: &str = "[hidden]";

/// A single external program invocation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExternalCommand {
    program: String,
    args: Vec<String>,
    envs: Vec<(String, String)>,
    /// Display overrides for arguments holding secrets, by argument index
    masked: Vec<(usize, String)>,
}

impl ExternalCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            envs: Vec::new(),
            masked: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Add an argument that logs and dry-run output show as `shown`
    pub fn masked_arg(mut self, arg: impl Into<String>, shown: impl Into<String>) -> Self {
        self.masked.push((self.args.len(), shown.into()));
        self.args.push(arg.into());
        self
    }

    /// Set an environment variable for the child only; values are never displayed
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    pub fn get_envs(&self) -> &[(String, String)] {
        &self.envs
    }

    fn display_arg(&self, index: usize) -> &str {
        self.masked
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, shown)| shown.as_str())
            .unwrap_or(self.args[index].as_str())
    }

    fn to_process(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }
        cmd
    }
}

impl fmt::Display for ExternalCommand {
    /// Render as a shell-like line with secrets masked; for humans only
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for index in 0..self.args.len() {
            write!(f, " {}", self.display_arg(index))?;
        }
        Ok(())
    }
}

/// What an external command left behind
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Exit code, `None` when the child was killed by a signal
    pub code: Option<i32>,
    /// Captured stdout (empty unless the command was captured)
    pub stdout: String,
}

impl CommandOutcome {
    pub fn success() -> Self {
        Self { code: Some(0), stdout: String::new() }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }

    /// Human readable exit status for diagnostics
    pub fn status_text(&self) -> String {
        match self.code {
            Some(code) => format!("exit code {}", code),
            None => "termination by signal".to_string(),
        }
    }
}

/// Seam between the orchestrator and the operating system
pub trait CommandRunner {
    /// Run with inherited stdio and wait for the child to exit
    fn run(&mut self, command: &ExternalCommand) -> Result<CommandOutcome, PgsnapError>;

    /// Run with stdout captured; stderr stays attached to the terminal
    fn capture(&mut self, command: &ExternalCommand) -> Result<CommandOutcome, PgsnapError>;
}

/// Spawns real child processes and blocks on each one
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, command: &ExternalCommand) -> Result<CommandOutcome, PgsnapError> {
        info!("Running: {}", command);
        let status = command
            .to_process()
            .status()
            .map_err(|source| PgsnapError::Spawn { program: command.program().to_string(), source })?;
        debug!("`{}` finished with {:?}", command.program(), status.code());
        Ok(CommandOutcome { code: status.code(), stdout: String::new() })
    }

    fn capture(&mut self, command: &ExternalCommand) -> Result<CommandOutcome, PgsnapError> {
        info!("Querying: {}", command);
        let output = command
            .to_process()
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|source| PgsnapError::Spawn { program: command.program().to_string(), source })?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!("`{}` produced {} bytes of output", command.program(), stdout.len());
        Ok(CommandOutcome { code: output.status.code(), stdout })
    }
}

/// Prints side-effecting commands instead of running them.
///
/// Captured commands are read-only queries, so they still go to the wrapped
/// runner; version discovery needs their real output.
#[derive(Debug, Default)]
pub struct DryRunRunner<R = SystemRunner> {
    inner: R,
}

impl<R: CommandRunner> DryRunRunner<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: CommandRunner> CommandRunner for DryRunRunner<R> {
    fn run(&mut self, command: &ExternalCommand) -> Result<CommandOutcome, PgsnapError> {
        info!("Dry run, skipping: {}", command);
        println!("{}", command);
        Ok(CommandOutcome::success())
    }

    fn capture(&mut self, command: &ExternalCommand) -> Result<CommandOutcome, PgsnapError> {
        self.inner.capture(command)
    }
}
