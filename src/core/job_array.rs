use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::core::chunks::Chunk;
use crate::core::error::SubmitError;

pub const DEFAULT_SEPARATOR: &str = " ";

pub fn format_job_line(chunk: &[String], separator: &str, extra_args: &[(String, String)]) -> String {
    let mut line = chunk.join(separator);
    line.push_str(separator);

    for (key, value) in extra_args {
        line.push_str(key);
        line.push(' ');
        line.push_str(value);
    }

    line
}

/// Create the job array file from chunks.
///
/// Line `i` of the file belongs to array index `i`, so the file is always truncated.
pub fn create_jobs_array_from_chunks(
    path: &Path,
    chunks: &[Chunk],
    separator: &str,
    extra_args: &[(String, String)],
) -> Result<(), SubmitError> {
    let to_error = |source| SubmitError::JobArray {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(to_error)?;
    let mut writer = BufWriter::new(file);

    for chunk in chunks {
        writeln!(writer, "{}", format_job_line(chunk, separator, extra_args)).map_err(to_error)?;
    }

    writer.flush().map_err(to_error)
}

pub fn job_array_file_name(input: &str) -> String {
    format!("job_array__{}", input.replace('/', "__"))
}
