//! Positional train/test partitioning of a line file.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use super::lines::{count_lines, write_record, LineReader};
use super::staging::{sibling_with_suffix, StagedFile};
use crate::error::TextprepError;

/// Number of trailing lines that go to the test partition.
pub fn test_line_count(total: usize, test_size: f64) -> usize {
    let raw = (total as f64 * test_size).round() as usize;
    raw.min(total)
}

pub(crate) fn validate_fraction(name: &str, value: f64) -> Result<(), TextprepError> {
    if !(0.0 < value && value < 1.0) {
        return Err(TextprepError::InvalidArgument(format!(
            "{name} must be in the open interval (0.0, 1.0), got {value}"
        )));
    }
    Ok(())
}

/// Split `path` into `<stem>_train` and `<stem>_test` files beside it.
///
/// The last `round(total * test_size)` lines go to the test file and every
/// earlier line to the train file, both in original order. When `keep_raw`
/// is false the source is removed once both outputs are in place.
pub fn train_test_split(
    path: &Path,
    test_size: f64,
    keep_raw: bool,
) -> Result<(PathBuf, PathBuf), TextprepError> {
    validate_fraction("test_size", test_size)?;

    let total = count_lines(path)?;
    let test_count = test_line_count(total, test_size);
    let train_count = total - test_count;

    let train_path = sibling_with_suffix(path, "train");
    let test_path = sibling_with_suffix(path, "test");

    let mut train = StagedFile::create(&train_path)?;
    let mut test = StagedFile::create(&test_path)?;

    for (index, line) in LineReader::new(path).lines()?.enumerate() {
        let line = line?;
        let (writer, dest) = if index < train_count {
            (&mut train, &train_path)
        } else {
            (&mut test, &test_path)
        };
        write_record(writer, &line).map_err(TextprepError::io_at(dest))?;
    }

    let train_path = train.commit()?;
    let test_path = test.commit()?;

    if !keep_raw {
        fs::remove_file(path).map_err(TextprepError::io_at(path))?;
    }

    info!(
        "split {} into {} train / {} test lines",
        path.display(),
        train_count,
        test_count
    );

    Ok((train_path, test_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_rounds_to_nearest() {
        assert_eq!(test_line_count(10, 0.3), 3);
        assert_eq!(test_line_count(7, 0.3), 2);
        assert_eq!(test_line_count(5, 0.5), 3);
        assert_eq!(test_line_count(1, 0.3), 0);
        assert_eq!(test_line_count(0, 0.3), 0);
    }

    #[test]
    fn rejects_fraction_outside_open_interval() {
        for bad in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            assert!(validate_fraction("test_size", bad).is_err(), "{bad}");
        }
        assert!(validate_fraction("test_size", 0.25).is_ok());
    }

    #[test]
    fn last_lines_go_to_test() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("corpus.txt");
        let content: String = (0..10).map(|i| format!("line {i}\n")).collect();
        fs::write(&path, content).expect("write corpus");

        let (train, test) = train_test_split(&path, 0.3, true).expect("split");

        assert_eq!(train, temp.path().join("corpus_train.txt"));
        assert_eq!(test, temp.path().join("corpus_test.txt"));
        assert!(path.exists());

        let train_text = fs::read_to_string(&train).expect("read train");
        let test_text = fs::read_to_string(&test).expect("read test");
        assert!(train_text.starts_with("line 0\n"));
        assert!(train_text.ends_with("line 6\n"));
        assert_eq!(test_text, "line 7\nline 8\nline 9\n");
    }

    #[test]
    fn removes_source_unless_kept() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("raw.txt");
        fs::write(&path, "a\nb\nc\nd").expect("write corpus");

        let (train, test) = train_test_split(&path, 0.5, false).expect("split");

        assert!(!path.exists());
        assert_eq!(fs::read_to_string(train).expect("read"), "a\nb\n");
        assert_eq!(fs::read_to_string(test).expect("read"), "c\nd\n");
    }

    #[test]
    fn invalid_fraction_leaves_source_in_place() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("raw.txt");
        fs::write(&path, "a\nb\n").expect("write corpus");

        let err = train_test_split(&path, 1.0, false).unwrap_err();
        assert!(matches!(err, TextprepError::InvalidArgument(_)));
        assert!(path.exists());
        assert!(!temp.path().join("raw_train.txt").exists());
    }

    #[test]
    fn failed_output_commit_keeps_source() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("raw.txt");
        fs::write(&path, "a\nb\nc\nd\n").expect("write corpus");
        let blocked = temp.path().join("raw_test.txt");
        fs::create_dir(&blocked).expect("create blocking dir");
        fs::write(blocked.join("keep"), "x").expect("write blocking file");

        let err = train_test_split(&path, 0.5, false).unwrap_err();

        assert!(matches!(err, TextprepError::IoAt { path: ref failed, .. } if *failed == blocked));
        assert_eq!(fs::read_to_string(&path).expect("read source"), "a\nb\nc\nd\n");
        assert!(blocked.is_dir());
    }
}
