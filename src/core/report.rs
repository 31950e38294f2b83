use crate::core::job::SubmissionResult;
use crate::core::payload::PayloadSet;

pub fn format_payload_line(payload: &PayloadSet) -> String {
    format!("Main payload list : {}", payload.display_list())
}

pub fn format_submission(result: &SubmissionResult) -> String {
    [
        format!("- Input file      : {}", result.input),
        format!(
            "  Job array file  : {} -> {}",
            result.job_array_file,
            result.remote_job_array.display()
        ),
        format!("  Array info      : {}", result.array_args),
        format!("  Exports         : {}", result.exports),
        format!("  Job command     : {}", result.command),
        format!("  Submit status   : {}", result.status),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::job::SubmitStatus;
    use std::path::PathBuf;

    fn result(status: SubmitStatus) -> SubmissionResult {
        SubmissionResult {
            input: "lists/files.txt".to_string(),
            job_array_file: "job_array__lists__files.txt".to_string(),
            remote_job_array: PathBuf::from("/work/job_array__lists__files.txt"),
            array_args: "--array=0-1".to_string(),
            exports: "input=/work/job_array__lists__files.txt,events=10,odir=out".to_string(),
            command: "sbatch --chdir /work".to_string(),
            status,
        }
    }

    #[test]
    fn report_block_has_every_field() {
        let block = format_submission(&result(SubmitStatus::Submitted("77".to_string())));
        let lines: Vec<&str> = block.lines().collect();
        assert_eq!(
            lines,
            vec![
                "- Input file      : lists/files.txt",
                "  Job array file  : job_array__lists__files.txt -> /work/job_array__lists__files.txt",
                "  Array info      : --array=0-1",
                "  Exports         : input=/work/job_array__lists__files.txt,events=10,odir=out",
                "  Job command     : sbatch --chdir /work",
                "  Submit status   : 77",
            ]
        );
    }

    #[test]
    fn pretend_and_failure_statuses() {
        let pretend = format_submission(&result(SubmitStatus::Pretend));
        assert!(pretend.ends_with("Submit status   : -- PRETEND MODE --"));

        let failed = format_submission(&result(SubmitStatus::Failed("bad partition".to_string())));
        assert!(failed.ends_with("Submit status   : Job failed with error: bad partition"));
    }

    #[test]
    fn payload_line_lists_paths() {
        let payload: PayloadSet = ["macros", "job_script.sh"].into_iter().collect();
        assert_eq!(format_payload_line(&payload), "Main payload list : job_script.sh macros");
    }
}
