//! Prepared dataset files and their in-memory tabular view.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::dataset::LineReader;
use crate::error::TextprepError;

/// Which prepared file to load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Split {
    Train,
    Test,
    Sample,
}

/// How a line file is read into a [`Table`].
#[derive(Clone, Debug)]
pub struct DataOptions {
    pub delimiter: u8,
    /// Treat the first line as column names.
    pub has_header: bool,
    /// Explicit column names; overrides the header or generated names.
    pub columns: Vec<String>,
}

impl Default for DataOptions {
    fn default() -> Self {
        Self {
            delimiter: b'\t',
            has_header: false,
            columns: Vec::new(),
        }
    }
}

/// Rows of a line file split into columns.
///
/// Every row has exactly `columns.len()` cells; short records are padded
/// with empty strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cells of the named column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let index = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| row[index].as_str()).collect())
    }
}

/// Files produced by [`DatasetSource::download`](crate::DatasetSource::download).
///
/// The caller owns `root` and everything beneath it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Resource {
    pub root: PathBuf,
    pub train_file_path: PathBuf,
    pub test_file_path: PathBuf,
    pub sample_file_path: Option<PathBuf>,
}

impl Resource {
    pub fn path_of(&self, split: Split) -> Option<&Path> {
        match split {
            Split::Train => Some(self.train_file_path.as_path()),
            Split::Test => Some(self.test_file_path.as_path()),
            Split::Sample => self.sample_file_path.as_deref(),
        }
    }

    /// Load the train file as a tab-separated table without header.
    pub fn data(&self) -> Result<Table, TextprepError> {
        self.data_with(Split::Train, &DataOptions::default())
    }

    pub fn data_of(&self, split: Split) -> Result<Table, TextprepError> {
        self.data_with(split, &DataOptions::default())
    }

    pub fn data_with(&self, split: Split, opts: &DataOptions) -> Result<Table, TextprepError> {
        let path = self.path_of(split).ok_or_else(|| {
            TextprepError::InvalidArgument("no sample file was produced for this resource".into())
        })?;
        read_table(path, opts)
    }
}

/// Read a delimited line file into a [`Table`].
///
/// Every `\n`-terminated record is one row, blank lines included. A trailing
/// `\r` is dropped; any other `\r` stays inside its cell. Quotes are literal.
pub fn read_table(path: &Path, opts: &DataOptions) -> Result<Table, TextprepError> {
    let mut lines = LineReader::new(path).lines()?;

    let header = if opts.has_header {
        match lines.next() {
            Some(line) => split_record(path, &line?, opts.delimiter)?,
            None => Vec::new(),
        }
    } else {
        Vec::new()
    };

    let mut rows = Vec::new();
    for line in lines {
        rows.push(split_record(path, &line?, opts.delimiter)?);
    }

    let width = rows
        .iter()
        .map(Vec::len)
        .chain([header.len(), opts.columns.len()])
        .max()
        .unwrap_or(0);

    let mut columns = if !opts.columns.is_empty() {
        opts.columns.clone()
    } else {
        header
    };
    for index in columns.len()..width {
        columns.push(format!("column_{index}"));
    }
    for row in &mut rows {
        row.resize(width, String::new());
    }

    Ok(Table { columns, rows })
}

fn split_record(path: &Path, line: &[u8], delimiter: u8) -> Result<Vec<String>, TextprepError> {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    if line.is_empty() {
        return Ok(Vec::new());
    }

    line.split(|byte| *byte == delimiter)
        .map(|field| {
            String::from_utf8(field.to_vec()).map_err(|_| TextprepError::Decode {
                path: path.to_path_buf(),
            })
        })
        .collect()
}
