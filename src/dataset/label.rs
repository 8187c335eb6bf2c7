//! Labeling text files by the directory that contains them.
//!
//! Each mapped subdirectory of the root is scanned (non-recursively, sorted by
//! file name) and every file becomes one output line `"<label>\t<text>"`.
//! Labels and texts are both flattened onto a single line.
//! Reads run on a dedicated, bounded rayon pool in batches of `task_size`
//! files. Batches are rendered into whole buffers and collected in discovery
//! order before anything is written, so the output is deterministic and no
//! two batches can interleave.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use rayon::prelude::*;
use walkdir::WalkDir;

use super::staging::StagedFile;
use crate::error::TextprepError;

#[derive(Clone, Debug)]
struct LabelTask {
    label: String,
    path: PathBuf,
}

/// Write one `label\ttext` line per file found under the mapped directories.
pub fn label_by_dir<L: Display>(
    output: &Path,
    root: &Path,
    mapping: &BTreeMap<String, L>,
    task_size: usize,
) -> Result<PathBuf, TextprepError> {
    if task_size == 0 {
        return Err(TextprepError::InvalidArgument(
            "task_size must be greater than 0".to_string(),
        ));
    }

    let tasks = collect_tasks(root, mapping)?;
    let batch_count = tasks.len().div_ceil(task_size);
    let workers = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .clamp(1, batch_count.max(1));

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|source| TextprepError::Io(std::io::Error::other(source.to_string())))?;

    debug!(
        "labeling {} file(s) in {} batch(es) on {} worker(s)",
        tasks.len(),
        batch_count,
        workers
    );

    let batches: Vec<String> = pool.install(|| {
        tasks
            .par_chunks(task_size)
            .map(render_batch)
            .collect::<Result<Vec<_>, _>>()
    })?;

    let mut writer = StagedFile::create(output)?;
    for batch in &batches {
        writer
            .write_all(batch.as_bytes())
            .map_err(TextprepError::io_at(output))?;
    }
    let output = writer.commit()?;

    info!(
        "labeled {} file(s) from {} into {}",
        tasks.len(),
        root.display(),
        output.display()
    );

    Ok(output)
}

fn collect_tasks<L: Display>(
    root: &Path,
    mapping: &BTreeMap<String, L>,
) -> Result<Vec<LabelTask>, TextprepError> {
    let mut tasks = Vec::new();

    for (dir_name, label) in mapping {
        let dir = root.join(dir_name);
        if !dir.is_dir() {
            warn!("skipping missing label directory {}", dir.display());
            continue;
        }

        let label = flatten_text(&label.to_string());
        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|source| TextprepError::IoAt {
                path: dir.clone(),
                source: source.into(),
            })?;
            if entry.file_type().is_file() {
                tasks.push(LabelTask {
                    label: label.clone(),
                    path: entry.into_path(),
                });
            }
        }
    }

    Ok(tasks)
}

fn render_batch(batch: &[LabelTask]) -> Result<String, TextprepError> {
    let mut rendered = String::new();
    for task in batch {
        let bytes = fs::read(&task.path).map_err(TextprepError::io_at(&task.path))?;
        let text = String::from_utf8(bytes).map_err(|_| TextprepError::Decode {
            path: task.path.clone(),
        })?;
        rendered.push_str(&task.label);
        rendered.push('\t');
        rendered.push_str(&flatten_text(&text));
        rendered.push('\n');
    }
    Ok(rendered)
}

/// Collapse the text onto one line: each run of `\r`/`\n` becomes a single
/// space, tabs become spaces, and trailing whitespace is dropped.
pub fn flatten_text(text: &str) -> String {
    let mut flat = String::with_capacity(text.len());
    let mut in_break = false;

    for ch in text.chars() {
        match ch {
            '\r' | '\n' => {
                if !in_break {
                    flat.push(' ');
                    in_break = true;
                }
            }
            '\t' => {
                flat.push(' ');
                in_break = false;
            }
            other => {
                flat.push(other);
                in_break = false;
            }
        }
    }

    let trimmed = flat.trim_end().len();
    flat.truncate(trimmed);
    flat
}
