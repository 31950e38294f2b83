use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

pub mod chunks;
pub mod command;
pub mod config;
pub mod error;
pub mod exports;
pub mod job;
pub mod job_array;
pub mod payload;
pub mod report;
pub mod scheduler;

use chunks::{split_list_into_jobs, Chunk};
use command::SbatchCommand;
use config::{InputMode, SubmitConfig};
use error::SubmitError;
use exports::{make_exports_string, make_job_params};
use job::{SubmissionResult, SubmitStatus};
use job_array::{create_jobs_array_from_chunks, job_array_file_name, DEFAULT_SEPARATOR};
use payload::{transfer_path, PayloadSet};
use report::{format_payload_line, format_submission};
use scheduler::Scheduler;

/// Everything computed for one input argument before any side effect.
#[derive(Debug, Clone)]
struct SubmissionPlan {
    input: String,
    chunks: Vec<Chunk>,
    job_array_file: String,
    local_job_array: PathBuf,
    remote_job_array: PathBuf,
    exports: String,
    command: SbatchCommand,
}

pub struct Submitter<S: Scheduler> {
    config: SubmitConfig,
    scheduler: S,
}

impl<S: Scheduler> Submitter<S> {
    pub fn new(config: SubmitConfig, scheduler: S) -> Self {
        Self { config, scheduler }
    }

    /// Transfer the main payload, then submit every input and print a report for each.
    pub fn run<W: Write>(&self, out: &mut W) -> Result<Vec<SubmissionResult>, SubmitError> {
        if self.config.job_limit > 0 {
            debug!(limit = self.config.job_limit, "job limit is recorded but adds no dependencies");
        }

        let payload = self.transfer_main_payload()?;
        writeln!(out, "{}", format_payload_line(&payload)).map_err(SubmitError::Report)?;

        let mut results = Vec::with_capacity(self.config.inputs.len());
        for input in &self.config.inputs {
            let result = self.submit_input(input)?;
            writeln!(out, "{}", format_submission(&result)).map_err(SubmitError::Report)?;
            results.push(result);
        }

        let submitted = results.iter().filter(|r| r.status.is_submitted()).count();
        info!(total = results.len(), submitted, "run finished");

        Ok(results)
    }

    pub fn transfer_main_payload(&self) -> Result<PayloadSet, SubmitError> {
        let payload = self.config.main_payload()?;
        if self.config.pretend {
            debug!("pretend mode, main payload is not transferred");
        } else {
            info!(entries = payload.len(), workdir = %self.config.workdir.display(), "transferring main payload");
            payload.transfer(&self.config.workdir)?;
        }
        Ok(payload)
    }

    /// Prepare, transfer and submit a single input argument.
    ///
    /// Scheduler failures and empty lists end up in the result; I/O failures are returned.
    pub fn submit_input(&self, input: &str) -> Result<SubmissionResult, SubmitError> {
        let plan = self.prepare(input)?;

        let status = if plan.chunks.is_empty() {
            warn!(input, "input list has no entries, nothing submitted");
            SubmitStatus::Failed(format!("input list {input} has no entries"))
        } else if self.config.pretend {
            SubmitStatus::Pretend
        } else {
            self.transfer(&plan)?;
            self.submit(&plan)
        };

        Ok(SubmissionResult {
            input: plan.input,
            job_array_file: plan.job_array_file,
            remote_job_array: plan.remote_job_array,
            array_args: plan.command.array_args(),
            exports: plan.exports,
            command: plan.command.render(),
            status,
        })
    }

    fn prepare(&self, input: &str) -> Result<SubmissionPlan, SubmitError> {
        let chunks = match &self.config.mode {
            InputMode::Lists { .. } => {
                split_list_into_jobs(Path::new(input), self.config.group, self.config.file_limit)?
            }
            InputMode::SingleFile => vec![vec![input.to_string()]],
        };

        let array = self.config.mode.array_spec().resolve(chunks.len());
        let job_array_file = job_array_file_name(input);
        let local_job_array = self.config.local_path(&job_array_file);
        let remote_job_array = self.config.remote_path(&job_array_file);

        let params = make_job_params(
            remote_job_array.display().to_string(),
            self.config.events,
            self.config.output_dir.clone(),
        );
        let exports = make_exports_string(&params)?;

        let job_name = Path::new(input)
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| input.to_string());

        let command = SbatchCommand {
            workdir: self.config.workdir.clone(),
            array,
            job_name,
            log_file: self.config.remote_logfile(),
            resources: self.config.resources(),
            exports: exports.clone(),
            script: self.config.job_script(),
        };

        debug!(input, chunks = chunks.len(), array = %command.array, "prepared submission");

        Ok(SubmissionPlan {
            input: input.to_string(),
            chunks,
            job_array_file,
            local_job_array,
            remote_job_array,
            exports,
            command,
        })
    }

    fn transfer(&self, plan: &SubmissionPlan) -> Result<(), SubmitError> {
        create_jobs_array_from_chunks(&plan.local_job_array, &plan.chunks, DEFAULT_SEPARATOR, &[])?;
        transfer_path(&plan.local_job_array, &self.config.workdir)?;

        let logdir = self.config.remote_logdir();
        if !logdir.is_dir() {
            fs::create_dir_all(&logdir).map_err(|source| SubmitError::LogDir {
                path: logdir.clone(),
                source,
            })?;
        }

        Ok(())
    }

    fn submit(&self, plan: &SubmissionPlan) -> SubmitStatus {
        match self.scheduler.submit(&plan.command, &self.config.env) {
            Ok(response) => match response.job_id() {
                Some(job_id) => {
                    info!(input = %plan.input, job_id, "job array submitted");
                    SubmitStatus::Submitted(job_id.to_string())
                }
                None => {
                    let message = if response.stderr.trim().is_empty() {
                        response.stdout.trim_end().to_string()
                    } else {
                        response.stderr.trim_end().to_string()
                    };
                    warn!(input = %plan.input, %message, "submission rejected");
                    SubmitStatus::Failed(message)
                }
            },
            Err(err) => {
                warn!(input = %plan.input, error = %err, "scheduler invocation failed");
                SubmitStatus::Failed(err.to_string())
            }
        }
    }
}
