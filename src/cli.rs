use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use crate::core::command::{ArraySpec, WallTime};
use crate::core::config::{InputMode, PayloadSource, SubmitConfig};
use crate::core::scheduler::Environment;

#[derive(Debug, Parser)]
#[command(
    name = "submit-slurm",
    version,
    about = "Submit jobs to the batch farm as Slurm job arrays"
)]
#[command(group(ArgGroup::new("payload_source").required(true).args(["payload", "payload_file"])))]
pub struct Cli {
    /// List files to process, or input files themselves with --file
    #[arg(value_name = "ARGUMENTS", required = true, num_args = 1..)]
    pub arguments: Vec<String>,

    #[arg(long, default_value = "main")]
    pub partition: String,

    /// Number of events per file to be processed
    #[arg(short = 'e', long, default_value_t = 1_000_000)]
    pub events: u64,

    /// Time needed to finish a task, in minutes
    #[arg(short = 't', long, default_value_t = 120)]
    pub time: u32,

    /// Requested memory per cpu
    #[arg(short = 'm', long, default_value = "1000mb")]
    pub mem: String,

    /// Comma separated payload to transfer to the workdir
    #[arg(short = 'p', long)]
    pub payload: Option<String>,

    /// File listing payload to transfer to the workdir
    #[arg(long)]
    pub payload_file: Option<PathBuf>,

    /// Job script to execute
    #[arg(short = 's', long, default_value = "job_script.sh")]
    pub script: PathBuf,

    /// Output directory passed to the job script
    #[arg(short = 'd', long, default_value = ".")]
    pub directory: String,

    #[arg(short = 'w', long)]
    pub workdir: PathBuf,

    /// Log directory, relative to the workdir
    #[arg(long, default_value = "log")]
    pub logdir: PathBuf,

    /// Number of files to process from each list, -1 for all
    #[arg(short = 'n', long, default_value_t = -1, allow_negative_numbers = true)]
    pub files: i64,

    /// Group inputs in larger groups
    #[arg(short = 'g', long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    pub group: u64,

    /// Limit jobs into max packages
    #[arg(short = 'l', long, default_value_t = 0)]
    pub limit: u32,

    /// Send as array job, optionally with an explicit range or a %N throttle
    #[arg(short = 'a', long, num_args = 0..=1, conflicts_with = "file")]
    pub array: Option<Option<String>>,

    /// Input is a single file
    #[arg(short = 'f', long)]
    pub file: bool,

    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Do not transfer anything or send actual jobs
    #[arg(long)]
    pub pretend: bool,
}

impl Cli {
    pub fn payload_source(&self) -> PayloadSource {
        match (&self.payload, &self.payload_file) {
            (_, Some(file)) => PayloadSource::File(file.clone()),
            (Some(list), None) => PayloadSource::Inline(list.clone()),
            (None, None) => PayloadSource::Inline(String::new()),
        }
    }

    pub fn input_mode(&self) -> InputMode {
        if self.file {
            InputMode::SingleFile
        } else {
            let spec = self.array.as_ref().and_then(|spec| spec.as_deref());
            InputMode::Lists {
                array: ArraySpec::parse(spec),
            }
        }
    }

    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

pub fn cli_to_config(cli: Cli, submission_dir: PathBuf, env: Environment) -> SubmitConfig {
    let payload = cli.payload_source();
    let mode = cli.input_mode();

    SubmitConfig {
        inputs: cli.arguments,
        partition: cli.partition,
        events: cli.events,
        time: WallTime(cli.time),
        mem: cli.mem,
        payload,
        script: cli.script,
        output_dir: cli.directory,
        workdir: cli.workdir,
        logdir: cli.logdir,
        file_limit: usize::try_from(cli.files).ok(),
        group: usize::try_from(cli.group).unwrap_or(usize::MAX),
        job_limit: cli.limit,
        mode,
        pretend: cli.pretend,
        submission_dir,
        env,
    }
}
