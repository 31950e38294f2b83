use std::fs;
use std::path::Path;

use crate::core::error::SubmitError;

pub type Chunk = Vec<String>;

/// Split `items` into consecutive groups of `size` elements.
///
/// Concatenating the result reproduces `items`; only the last group may be shorter.
pub fn chunks<T: Clone>(items: &[T], size: usize) -> Result<Vec<Vec<T>>, SubmitError> {
    if size == 0 {
        return Err(SubmitError::InvalidChunkSize { size });
    }

    Ok(items.chunks(size).map(<[T]>::to_vec).collect())
}

pub fn read_input_list(path: &Path) -> Result<Vec<String>, SubmitError> {
    let content = fs::read_to_string(path).map_err(|source| SubmitError::InputList {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(content.lines().map(str::to_string).collect())
}

/// Open a list file and convert it into chunks.
///
/// `limit` keeps only the first `n` lines before grouping.
pub fn split_list_into_jobs(
    path: &Path,
    size: usize,
    limit: Option<usize>,
) -> Result<Vec<Chunk>, SubmitError> {
    let mut lines = read_input_list(path)?;
    if let Some(limit) = limit {
        lines.truncate(limit);
    }

    chunks(&lines, size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SIX: [u32; 6] = [1, 2, 3, 4, 5, 6];

    #[test]
    fn chunks_keep_order_and_size() {
        assert_eq!(
            chunks(&SIX, 1).unwrap(),
            vec![vec![1], vec![2], vec![3], vec![4], vec![5], vec![6]]
        );
        assert_eq!(
            chunks(&SIX, 2).unwrap(),
            vec![vec![1, 2], vec![3, 4], vec![5, 6]]
        );
        assert_eq!(chunks(&SIX, 3).unwrap(), vec![vec![1, 2, 3], vec![4, 5, 6]]);
        assert_eq!(chunks(&SIX, 4).unwrap(), vec![vec![1, 2, 3, 4], vec![5, 6]]);
        assert_eq!(chunks(&SIX, 5).unwrap(), vec![vec![1, 2, 3, 4, 5], vec![6]]);
        assert_eq!(chunks(&SIX, 6).unwrap(), vec![vec![1, 2, 3, 4, 5, 6]]);
    }

    #[test]
    fn chunk_count_is_ceiling_and_concat_is_identity() {
        let items: Vec<u32> = (0..23).collect();
        for size in 1..30 {
            let groups = chunks(&items, size).unwrap();
            assert_eq!(groups.len(), items.len().div_ceil(size));
            assert!(groups[..groups.len() - 1].iter().all(|g| g.len() == size));
            assert!(groups.iter().all(|g| !g.is_empty()));
            assert_eq!(groups.concat(), items);
        }
    }

    #[test]
    fn empty_input_gives_no_chunks() {
        let empty: [u32; 0] = [];
        assert!(chunks(&empty, 3).unwrap().is_empty());
    }

    #[test]
    fn zero_size_is_rejected() {
        let err = chunks(&SIX, 0).unwrap_err();
        assert!(matches!(err, SubmitError::InvalidChunkSize { size: 0 }));
    }

    #[test]
    fn split_list_file_into_jobs() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "line1\nline2\nline3\nline4\nline5\nline6").unwrap();

        let jobs = split_list_into_jobs(file.path(), 3, None).unwrap();
        assert_eq!(
            jobs,
            vec![
                vec!["line1", "line2", "line3"],
                vec!["line4", "line5", "line6"],
            ]
        );

        let limited = split_list_into_jobs(file.path(), 3, Some(4)).unwrap();
        assert_eq!(
            limited,
            vec![vec!["line1", "line2", "line3"], vec!["line4"]]
        );
    }

    #[test]
    fn missing_list_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = split_list_into_jobs(&dir.path().join("nope.txt"), 1, None).unwrap_err();
        assert!(matches!(err, SubmitError::InputList { .. }));
    }
}
