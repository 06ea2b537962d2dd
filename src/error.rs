use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PgsnapError {
    #[error("no line containing \"{label}\" in the output of `{command}`")]
    VersionLabelMissing { label: &'static str, command: String },

    #[error("the \"PG Version\" line has no version token: {line:?}")]
    EmptyVersion { line: String },

    #[error("failed to start `{program}` (is it installed and on PATH?): {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` failed with {status}")]
    StepFailed { command: String, status: String },

    #[error("cannot create data directory {}: {source}", .path.display())]
    DataDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
