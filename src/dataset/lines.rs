//! Streaming access to line-oriented files.
//!
//! A line file holds one record per line. Nothing here loads a whole file into
//! memory: counting reads fixed-size chunks and [`LineReader`] yields one line
//! at a time, reopening the file for every pass.

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::TextprepError;

const CHUNK_SIZE: usize = 64 * 1024;

/// Count the records of a line file.
///
/// Every `\n` terminates one record. A non-empty final line without a
/// terminator counts as one more record, so `"a\nb"` and `"a\nb\n"` both
/// have two lines. An empty file has zero.
pub fn count_lines(path: &Path) -> Result<usize, TextprepError> {
    let mut file = File::open(path).map_err(TextprepError::io_at(path))?;
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut count = 0usize;
    let mut last_byte = None;

    loop {
        let read = match file.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(TextprepError::IoAt {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let chunk = &buf[..read];
        count += chunk.iter().filter(|&&b| b == b'\n').count();
        last_byte = chunk.last().copied();
    }

    if matches!(last_byte, Some(b) if b != b'\n') {
        count += 1;
    }

    Ok(count)
}

/// A restartable producer of the lines of a file.
///
/// Each call to [`lines`](LineReader::lines) reopens the file and starts from
/// the first record.
#[derive(Clone, Debug)]
pub struct LineReader {
    path: PathBuf,
}

impl LineReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Open a fresh pass over the file.
    pub fn lines(&self) -> Result<Lines, TextprepError> {
        let file = File::open(&self.path).map_err(TextprepError::io_at(&self.path))?;
        Ok(Lines {
            reader: BufReader::with_capacity(CHUNK_SIZE, file),
            path: self.path.clone(),
        })
    }
}

/// Iterator over raw line bytes, terminator included when present.
pub struct Lines {
    reader: BufReader<File>,
    path: PathBuf,
}

impl Iterator for Lines {
    type Item = Result<Vec<u8>, TextprepError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = Vec::new();
        match self.reader.read_until(b'\n', &mut line) {
            Ok(0) => None,
            Ok(_) => Some(Ok(line)),
            Err(source) => Some(Err(TextprepError::IoAt {
                path: self.path.clone(),
                source,
            })),
        }
    }
}

/// Write one record, adding the terminator if the source line lacked it.
pub(crate) fn write_record<W: Write>(writer: &mut W, line: &[u8]) -> std::io::Result<()> {
    writer.write_all(line)?;
    if !line.ends_with(b"\n") {
        writer.write_all(b"\n")?;
    }
    Ok(())
}
