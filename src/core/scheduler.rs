use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::process::{Command, Stdio};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::core::command::{SbatchCommand, SBATCH};
use crate::core::error::SubmitError;

static RE_SUBMITTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Submitted batch job (\d+)").unwrap());

/// Environment handed to the scheduler process.
///
/// Captured once at startup and never modified afterwards. Values need not be UTF-8.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<OsString, OsString>,
}

impl Environment {
    pub fn capture() -> Self {
        Self {
            vars: std::env::vars_os().collect(),
        }
    }

    pub fn get(&self, key: impl AsRef<OsStr>) -> Option<&OsStr> {
        self.vars.get(key.as_ref()).map(OsString::as_os_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OsStr, &OsStr)> {
        self.vars.iter().map(|(k, v)| (k.as_os_str(), v.as_os_str()))
    }
}

impl<K: Into<OsString>, V: Into<OsString>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerResponse {
    pub stdout: String,
    pub stderr: String,
}

impl SchedulerResponse {
    /// Job id announced on stdout, if the submission was accepted.
    pub fn job_id(&self) -> Option<&str> {
        RE_SUBMITTED
            .captures(&self.stdout)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str())
    }
}

pub trait Scheduler {
    fn submit(&self, command: &SbatchCommand, env: &Environment) -> Result<SchedulerResponse, SubmitError>;
}

impl<S: Scheduler + ?Sized> Scheduler for &S {
    fn submit(&self, command: &SbatchCommand, env: &Environment) -> Result<SchedulerResponse, SubmitError> {
        (**self).submit(command, env)
    }
}

#[derive(Debug, Clone)]
pub struct SbatchCli {
    pub program: String,
}

impl Default for SbatchCli {
    fn default() -> Self {
        Self {
            program: SBATCH.to_string(),
        }
    }
}

impl Scheduler for SbatchCli {
    fn submit(&self, command: &SbatchCommand, env: &Environment) -> Result<SchedulerResponse, SubmitError> {
        let args = command.to_args();
        debug!(program = %self.program, ?args, "invoking scheduler");

        let mut cmd = Command::new(&self.program);
        cmd.args(&args)
            .env_clear()
            .envs(env.iter())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let output = cmd.output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SubmitError::BinaryNotFound {
                    program: self.program.clone(),
                }
            } else {
                SubmitError::ProcessFailed {
                    exit_code: None,
                    stderr: e.to_string(),
                }
            }
        })?;

        debug!(exit_code = ?output.status.code(), "scheduler returned");

        Ok(SchedulerResponse {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(stdout: &str) -> SchedulerResponse {
        SchedulerResponse {
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    #[test]
    fn accepted_submission_yields_job_id() {
        assert_eq!(response("Submitted batch job 4242\n").job_id(), Some("4242"));
    }

    #[test]
    fn other_output_is_not_a_submission() {
        assert_eq!(response("").job_id(), None);
        assert_eq!(response("sbatch: error: invalid partition\n").job_id(), None);
        assert_eq!(response("Submitted batch job\n").job_id(), None);
        assert_eq!(response("  Submitted batch job 12\n").job_id(), None);
    }

    #[test]
    fn environment_is_an_explicit_value() {
        let env: Environment = [("PATH", "/usr/bin"), ("HOME", "/home/user")].into_iter().collect();
        assert_eq!(env.get("PATH"), Some(OsStr::new("/usr/bin")));
        assert_eq!(env.iter().count(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn capture_keeps_non_utf8_values() {
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(b"\xff\xfe");
        std::env::set_var("SUBMIT_SLURM_TEST_RAW_BYTES", raw);

        let env = Environment::capture();

        assert_eq!(env.get("SUBMIT_SLURM_TEST_RAW_BYTES"), Some(raw));
        std::env::remove_var("SUBMIT_SLURM_TEST_RAW_BYTES");
    }

    #[test]
    fn missing_binary_is_reported() {
        let cli = SbatchCli {
            program: "definitely-not-an-sbatch-binary".to_string(),
        };
        let command = SbatchCommand {
            workdir: "/tmp".into(),
            array: "0-0".to_string(),
            job_name: "x".to_string(),
            log_file: "/tmp/x.log".into(),
            resources: crate::core::command::Resources {
                time: crate::core::command::WallTime(1),
                mem_per_cpu: "1mb".to_string(),
                partition: "main".to_string(),
            },
            exports: String::new(),
            script: "/tmp/job.sh".into(),
        };

        let err = cli.submit(&command, &Environment::capture()).unwrap_err();
        assert!(matches!(err, SubmitError::BinaryNotFound { ref program } if program == "definitely-not-an-sbatch-binary"));
        assert_eq!(err.to_string(), "definitely-not-an-sbatch-binary binary not found in PATH");
    }
}
