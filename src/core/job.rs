use std::fmt;
use std::path::PathBuf;

pub const PRETEND_STATUS: &str = "-- PRETEND MODE --";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStatus {
    Submitted(String),
    Failed(String),
    Pretend,
}

impl SubmitStatus {
    pub fn is_submitted(&self) -> bool {
        matches!(self, SubmitStatus::Submitted(_))
    }
}

impl fmt::Display for SubmitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitStatus::Submitted(job_id) => f.write_str(job_id),
            SubmitStatus::Failed(message) => write!(f, "Job failed with error: {message}"),
            SubmitStatus::Pretend => f.write_str(PRETEND_STATUS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionResult {
    pub input: String,
    pub job_array_file: String,
    pub remote_job_array: PathBuf,
    pub array_args: String,
    pub exports: String,
    pub command: String,
    pub status: SubmitStatus,
}
