use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("invalid group size {size}: inputs must be grouped in chunks of at least 1")]
    InvalidChunkSize { size: usize },
    #[error("failed to read input list {path}: {source}")]
    InputList {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to transfer payload {path}: {source}")]
    Payload {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to walk payload directory: {0}")]
    PayloadWalk(#[from] walkdir::Error),
    #[error("failed to write job array file {path}: {source}")]
    JobArray {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to create log directory {path}: {source}")]
    LogDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid export entry `{key}`: {message}")]
    InvalidExport { key: String, message: String },
    #[error("{program} binary not found in PATH")]
    BinaryNotFound { program: String },
    #[error("sbatch process failed (exit_code={exit_code:?}): {stderr}")]
    ProcessFailed {
        exit_code: Option<i32>,
        stderr: String,
    },
    #[error("failed to resolve the submission directory: {0}")]
    SubmissionDir(#[source] std::io::Error),
    #[error("failed to write report: {0}")]
    Report(#[source] std::io::Error),
}
