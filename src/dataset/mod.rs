//! Dataset metadata and the file operations used to prepare it.
//!
//! [`Dataset`] carries a dataset's identity and exposes every preparation step
//! as a method taking explicit paths. Concrete datasets implement
//! [`DatasetSource`], which supplies the one dataset-specific step
//! (`extract`) and gets the [`download`](DatasetSource::download)
//! orchestration for free.

pub mod acquire;
pub mod extract;
pub mod label;
pub mod lines;
pub mod sample;
pub mod split;
mod staging;

use std::collections::BTreeMap;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::TextprepError;
use crate::resource::Resource;

pub use extract::ArchiveFormat;
pub use lines::LineReader;

/// Default fraction of lines held out for the test partition.
pub const DEFAULT_TEST_SIZE: f64 = 0.3;

/// Identity and origin of a dataset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub name: String,
    pub site_url: String,
    pub download_url: String,
    pub description: String,
}

impl Dataset {
    pub fn new(
        name: impl Into<String>,
        site_url: impl Into<String>,
        download_url: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            site_url: site_url.into(),
            download_url: download_url.into(),
            description: description.into(),
        }
    }

    /// Download the archive at `download_url` into `root`.
    pub fn save_dataset(&self, root: &Path) -> Result<PathBuf, TextprepError> {
        acquire::save_url(&self.download_url, root)
    }

    /// Extract one archive member next to the archive.
    pub fn extract_file(&self, archive: &Path, member: &str) -> Result<PathBuf, TextprepError> {
        extract::extract_member(archive, member)
    }

    /// Extract several archive members; paths come back in input order.
    pub fn extract_files<S: AsRef<str>>(
        &self,
        archive: &Path,
        members: &[S],
    ) -> Result<Vec<PathBuf>, TextprepError> {
        extract::extract_members(archive, members)
    }

    /// Split a line file into `(train, test)` files.
    pub fn train_test_split(
        &self,
        path: &Path,
        test_size: f64,
        keep_raw: bool,
    ) -> Result<(PathBuf, PathBuf), TextprepError> {
        split::train_test_split(path, test_size, keep_raw)
    }

    /// Write `sample_count` randomly chosen lines to a new file.
    pub fn make_samples(&self, path: &Path, sample_count: usize) -> Result<PathBuf, TextprepError> {
        sample::make_samples(path, sample_count)
    }

    /// Seeded variant of [`make_samples`](Dataset::make_samples).
    pub fn make_samples_seeded(
        &self,
        path: &Path,
        sample_count: usize,
        seed: u64,
    ) -> Result<PathBuf, TextprepError> {
        sample::make_samples_seeded(path, sample_count, seed)
    }

    /// Label every file under the mapped subdirectories of `root`.
    pub fn label_by_dir<L: Display>(
        &self,
        output: &Path,
        root: &Path,
        mapping: &BTreeMap<String, L>,
        task_size: usize,
    ) -> Result<PathBuf, TextprepError> {
        label::label_by_dir(output, root, mapping, task_size)
    }

    /// Number of records in `path`; an unterminated final line counts.
    pub fn get_line_count(&self, path: &Path) -> Result<usize, TextprepError> {
        lines::count_lines(path)
    }
}

/// Options for [`DatasetSource::download`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DownloadOptions {
    /// Fraction of lines sent to the test file, in (0, 1).
    pub test_size: f64,
    /// When set, also write this many random train lines to a sample file.
    pub sample_count: Option<usize>,
    /// Keep the downloaded archive and the extracted raw file.
    pub keep_raw: bool,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            test_size: DEFAULT_TEST_SIZE,
            sample_count: None,
            keep_raw: false,
        }
    }
}

impl DownloadOptions {
    pub fn validate(&self) -> Result<(), TextprepError> {
        split::validate_fraction("test_size", self.test_size)?;
        if self.sample_count == Some(0) {
            return Err(TextprepError::InvalidArgument(
                "sample_count must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// A concrete dataset: its metadata plus how to pull its line file out of
/// the downloaded archive.
pub trait DatasetSource {
    fn dataset(&self) -> &Dataset;

    /// Extract the dataset's line file from `archive` and return its path.
    ///
    /// Implementations normally call [`Dataset::extract_file`].
    fn extract(&self, archive: &Path) -> Result<PathBuf, TextprepError>;

    /// Fetch, extract, split and optionally sample the dataset under `root`.
    fn download(&self, root: &Path, opts: &DownloadOptions) -> Result<Resource, TextprepError> {
        opts.validate()?;
        let dataset = self.dataset();

        let archive = dataset.save_dataset(root)?;
        let raw = self.extract(&archive)?;
        if !opts.keep_raw {
            fs::remove_file(&archive).map_err(TextprepError::io_at(&archive))?;
        }

        let (train, test) = dataset.train_test_split(&raw, opts.test_size, opts.keep_raw)?;
        let samples = match opts.sample_count {
            Some(count) => Some(dataset.make_samples(&train, count)?),
            None => None,
        };

        info!("prepared dataset '{}' in {}", dataset.name, root.display());

        Ok(Resource {
            root: root.to_path_buf(),
            train_file_path: train,
            test_file_path: test,
            sample_file_path: samples,
        })
    }
}
