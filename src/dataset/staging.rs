//! Write-then-rename output files.
//!
//! Every file produced by split, sample, label, extract and acquisition is
//! written into a temporary sibling and renamed onto its destination only
//! once the writer has been flushed. A failure part-way through leaves the
//! destination untouched (the temporary file is removed on drop).

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::TextprepError;

/// A buffered writer whose content only appears at `dest` after [`commit`].
///
/// [`commit`]: StagedFile::commit
pub(crate) struct StagedFile {
    writer: BufWriter<NamedTempFile>,
    dest: PathBuf,
}

impl StagedFile {
    pub(crate) fn create(dest: &Path) -> Result<Self, TextprepError> {
        let dir = parent_dir(dest);
        let temp = NamedTempFile::new_in(dir).map_err(TextprepError::io_at(dir))?;
        Ok(Self {
            writer: BufWriter::new(temp),
            dest: dest.to_path_buf(),
        })
    }

    /// Flush and atomically move the staged content onto the destination.
    pub(crate) fn commit(self) -> Result<PathBuf, TextprepError> {
        let Self { writer, dest } = self;
        let temp = writer
            .into_inner()
            .map_err(|source| TextprepError::IoAt {
                path: dest.clone(),
                source: source.into_error(),
            })?;
        temp.persist(&dest).map_err(|source| TextprepError::IoAt {
            path: dest.clone(),
            source: source.error,
        })?;
        Ok(dest)
    }
}

impl Write for StagedFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Directory containing `path`, or `.` for a bare file name.
pub(crate) fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// `dir/stem_suffix.ext` next to `path`.
pub(crate) fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}_{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}_{}", stem, suffix),
    };
    path.with_file_name(name)
}
