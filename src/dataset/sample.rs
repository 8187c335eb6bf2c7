//! Random line sampling.
//!
//! Sampling is two-pass: the file is counted, `sample_count` distinct line
//! indices are drawn uniformly without replacement, then a second streaming
//! pass copies the chosen lines. Selected lines keep their original file
//! order, so a fixed seed always produces the same output file.

use std::path::{Path, PathBuf};

use log::info;
use rand::{rngs::StdRng, SeedableRng};

use super::lines::{count_lines, write_record, LineReader};
use super::staging::{sibling_with_suffix, StagedFile};
use crate::error::TextprepError;

/// Write `sample_count` random lines of `path` to `<stem>_samples` beside it.
pub fn make_samples(path: &Path, sample_count: usize) -> Result<PathBuf, TextprepError> {
    make_samples_with(path, sample_count, None)
}

/// Like [`make_samples`], with a reproducible selection for a given seed.
pub fn make_samples_seeded(
    path: &Path,
    sample_count: usize,
    seed: u64,
) -> Result<PathBuf, TextprepError> {
    make_samples_with(path, sample_count, Some(seed))
}

fn make_samples_with(
    path: &Path,
    sample_count: usize,
    seed: Option<u64>,
) -> Result<PathBuf, TextprepError> {
    let total = count_lines(path)?;
    if sample_count > total {
        return Err(TextprepError::InvalidArgument(format!(
            "sample_count {} exceeds the {} line(s) in {}",
            sample_count,
            total,
            path.display()
        )));
    }

    let selected = select_line_indices(total, sample_count, seed);
    let sample_path = sibling_with_suffix(path, "samples");
    let mut output = StagedFile::create(&sample_path)?;

    let mut wanted = selected.iter().copied().peekable();
    for (index, line) in LineReader::new(path).lines()?.enumerate() {
        let Some(&next) = wanted.peek() else {
            break;
        };
        let line = line?;
        if index == next {
            write_record(&mut output, &line).map_err(TextprepError::io_at(&sample_path))?;
            wanted.next();
        }
    }
    info!(
        "sampled {} of {} lines from {}",
        sample_count,
        total,
        path.display()
    );

    output.commit()
}

/// Draw `k` distinct indices from `0..total`, returned in ascending order.
pub fn select_line_indices(total: usize, k: usize, seed: Option<u64>) -> Vec<usize> {
    let k = k.min(total);
    let mut indices = if let Some(seed) = seed {
        let mut rng = StdRng::seed_from_u64(seed);
        rand::seq::index::sample(&mut rng, total, k).into_vec()
    } else {
        let mut rng = rand::rng();
        rand::seq::index::sample(&mut rng, total, k).into_vec()
    };
    indices.sort_unstable();
    indices
}
