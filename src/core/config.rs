use std::path::{Component, Path, PathBuf};

use crate::core::command::{ArraySpec, Resources, WallTime};
use crate::core::error::SubmitError;
use crate::core::payload::{payload_from_file, payload_from_string, PayloadSet};
use crate::core::scheduler::Environment;

pub const LOG_FILE_NAME: &str = "slurm-%A_%a-array.log";

/// Where the payload list comes from. Exactly one source is given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadSource {
    Inline(String),
    File(PathBuf),
}

impl PayloadSource {
    pub fn entries(&self) -> Result<Vec<PathBuf>, SubmitError> {
        match self {
            PayloadSource::Inline(list) => Ok(payload_from_string(list)),
            PayloadSource::File(path) => payload_from_file(path),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    /// Each argument is a file listing one input per line.
    Lists { array: ArraySpec },
    /// Each argument is itself the only input of its job.
    SingleFile,
}

impl InputMode {
    pub fn array_spec(&self) -> ArraySpec {
        match self {
            InputMode::Lists { array } => array.clone(),
            InputMode::SingleFile => ArraySpec::Computed,
        }
    }
}

/// Everything a run needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct SubmitConfig {
    pub inputs: Vec<String>,
    pub partition: String,
    pub events: u64,
    pub time: WallTime,
    pub mem: String,
    pub payload: PayloadSource,
    pub script: PathBuf,
    pub output_dir: String,
    pub workdir: PathBuf,
    pub logdir: PathBuf,
    pub file_limit: Option<usize>,
    pub group: usize,
    pub job_limit: u32,
    pub mode: InputMode,
    pub pretend: bool,
    /// Directory the tool was started from; job array files are generated here.
    pub submission_dir: PathBuf,
    pub env: Environment,
}

impl SubmitConfig {
    pub fn resources(&self) -> Resources {
        Resources {
            time: self.time,
            mem_per_cpu: self.mem.clone(),
            partition: self.partition.clone(),
        }
    }

    pub fn job_script(&self) -> PathBuf {
        self.submission_dir.join(&self.script)
    }

    pub fn remote_logdir(&self) -> PathBuf {
        self.workdir.join(&self.logdir)
    }

    pub fn remote_logfile(&self) -> PathBuf {
        self.remote_logdir().join(LOG_FILE_NAME)
    }

    /// Absolute location of `name` inside the working directory.
    pub fn remote_path(&self, name: &str) -> PathBuf {
        normalize_lexically(&self.submission_dir.join(&self.workdir).join(name))
    }

    pub fn local_path(&self, name: impl AsRef<Path>) -> PathBuf {
        self.submission_dir.join(name)
    }

    /// Payload from the configured source plus the job script, relative to the submission directory.
    pub fn main_payload(&self) -> Result<PayloadSet, SubmitError> {
        let mut payload: PayloadSet = self
            .payload
            .entries()?
            .into_iter()
            .map(|entry| self.local_path(entry))
            .collect();
        payload.insert(self.job_script());
        Ok(payload)
    }
}

/// Drop `.` and fold `..` into its parent without touching the filesystem.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(component),
            },
            other => normalized.push(other),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_components_are_folded() {
        assert_eq!(normalize_lexically(Path::new("/sub/../work/./a")), PathBuf::from("/work/a"));
        assert_eq!(normalize_lexically(Path::new("/../work")), PathBuf::from("/work"));
        assert_eq!(normalize_lexically(Path::new("../a/../b")), PathBuf::from("../b"));
        assert_eq!(normalize_lexically(Path::new("/scratch/work")), PathBuf::from("/scratch/work"));
    }
}
