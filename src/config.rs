//! YAML dataset descriptions.
//!
//! A config names an archive dataset and the single member holding its line
//! file, so simple datasets need no Rust code:
//!
//! ```yaml
//! name: movie_lines
//! site_url: https://example.com/movies
//! download_url: https://example.com/movies/lines.tar.gz
//! description: One movie line per row
//! member: lines/all.txt
//! download:
//!   test_size: 0.2
//!   sample_count: 100
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, DatasetSource, DownloadOptions, DEFAULT_TEST_SIZE};
use crate::error::TextprepError;

/// Serialized form of an archive dataset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetConfig {
    pub name: String,
    #[serde(default)]
    pub site_url: String,
    pub download_url: String,
    #[serde(default)]
    pub description: String,
    /// Archive member holding the dataset's line file.
    pub member: String,
    #[serde(default)]
    pub download: DownloadConfig,
}

/// Optional defaults for the download step.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DownloadConfig {
    pub test_size: Option<f64>,
    pub sample_count: Option<usize>,
    pub keep_raw: Option<bool>,
}

impl DatasetConfig {
    pub fn from_yaml_file(path: &Path) -> Result<Self, TextprepError> {
        let text = fs::read_to_string(path).map_err(TextprepError::io_at(path))?;
        let config: Self = serde_yaml::from_str(&text).map_err(|source| TextprepError::Config {
            path: path.to_path_buf(),
            message: source.to_string(),
        })?;
        config.check().map_err(|message| TextprepError::Config {
            path: path.to_path_buf(),
            message,
        })?;
        Ok(config)
    }

    fn check(&self) -> Result<(), String> {
        for (field, value) in [
            ("name", &self.name),
            ("download_url", &self.download_url),
            ("member", &self.member),
        ] {
            if value.trim().is_empty() {
                return Err(format!("'{field}' must not be empty"));
            }
        }
        Ok(())
    }

    pub fn dataset(&self) -> Dataset {
        Dataset::new(
            self.name.clone(),
            self.site_url.clone(),
            self.download_url.clone(),
            self.description.clone(),
        )
    }

    /// Download options from the config, falling back to the defaults.
    pub fn download_options(&self) -> DownloadOptions {
        DownloadOptions {
            test_size: self.download.test_size.unwrap_or(DEFAULT_TEST_SIZE),
            sample_count: self.download.sample_count,
            keep_raw: self.download.keep_raw.unwrap_or(false),
        }
    }
}

/// A dataset whose line file is one named member of its archive.
#[derive(Clone, Debug)]
pub struct ArchiveDataset {
    dataset: Dataset,
    member: String,
}

impl ArchiveDataset {
    pub fn new(dataset: Dataset, member: impl Into<String>) -> Self {
        Self {
            dataset,
            member: member.into(),
        }
    }

    pub fn from_config(config: &DatasetConfig) -> Self {
        Self::new(config.dataset(), config.member.clone())
    }

    pub fn member(&self) -> &str {
        &self.member
    }
}

impl DatasetSource for ArchiveDataset {
    fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    fn extract(&self, archive: &Path) -> Result<PathBuf, TextprepError> {
        self.dataset.extract_file(archive, &self.member)
    }
}
