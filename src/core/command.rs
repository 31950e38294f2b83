use std::fmt;
use std::path::PathBuf;

pub const SBATCH: &str = "sbatch";

/// How the `--array` range of a submission is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ArraySpec {
    /// `0-(N-1)` for N chunks.
    #[default]
    Computed,
    /// `0-(N-1)` followed by a throttle suffix such as `%4`.
    Throttled(String),
    /// Used as given, ignoring the chunk count.
    Explicit(String),
}

impl ArraySpec {
    pub fn parse(spec: Option<&str>) -> Self {
        match spec {
            None => ArraySpec::Computed,
            Some(spec) if spec.starts_with('%') => ArraySpec::Throttled(spec.to_string()),
            Some(spec) => ArraySpec::Explicit(spec.to_string()),
        }
    }

    /// Array range for `chunk_count` chunks; zero chunks saturate to `0-0`.
    pub fn resolve(&self, chunk_count: usize) -> String {
        let last = chunk_count.saturating_sub(1);
        match self {
            ArraySpec::Computed => format!("0-{last}"),
            ArraySpec::Throttled(suffix) => format!("0-{last}{suffix}"),
            ArraySpec::Explicit(spec) => spec.clone(),
        }
    }
}

/// Requested wall time in minutes, rendered as `H:MM:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallTime(pub u32);

impl fmt::Display for WallTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}:00", self.0 / 60, self.0 % 60)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resources {
    pub time: WallTime,
    pub mem_per_cpu: String,
    pub partition: String,
}

impl Resources {
    pub fn to_args(&self) -> Vec<String> {
        vec![
            format!("--time={}", self.time),
            format!("--mem-per-cpu={}", self.mem_per_cpu),
            "-p".to_string(),
            self.partition.clone(),
        ]
    }
}

/// One `sbatch` invocation, kept structured until it is turned into tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SbatchCommand {
    pub workdir: PathBuf,
    pub array: String,
    pub job_name: String,
    pub log_file: PathBuf,
    pub resources: Resources,
    pub exports: String,
    pub script: PathBuf,
}

impl SbatchCommand {
    pub fn array_args(&self) -> String {
        format!("--array={}", self.array)
    }

    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "--chdir".to_string(),
            self.workdir.display().to_string(),
            self.array_args(),
            "-J".to_string(),
            self.job_name.clone(),
            "-o".to_string(),
            self.log_file.display().to_string(),
        ];

        args.extend(self.resources.to_args());
        args.push(format!("--export={}", self.exports));
        args.push("--".to_string());
        args.push(self.script.display().to_string());

        args
    }

    /// Shell-quoted command line, for display only.
    pub fn render(&self) -> String {
        let mut words = vec![SBATCH.to_string()];
        words.extend(self.to_args());
        shell_words::join(words)
    }
}
