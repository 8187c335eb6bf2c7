//! Member extraction from zip and gzip-compressed tar archives.
//!
//! Members are addressed by their `/`-separated path inside the archive and
//! written into the directory holding the archive under their final path
//! component, so `project-master/docs/README.md` becomes `README.md`.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use log::{debug, info};

use super::staging::{parent_dir, StagedFile};
use crate::error::TextprepError;

/// Container formats understood by the extractor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    TarGz,
}

impl ArchiveFormat {
    /// Infer the format from the archive's file name.
    pub fn from_path(path: &Path) -> Result<Self, TextprepError> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        if name.ends_with(".zip") {
            Ok(ArchiveFormat::Zip)
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Ok(ArchiveFormat::TarGz)
        } else {
            Err(TextprepError::UnsupportedArchive(path.to_path_buf()))
        }
    }
}

/// Extract a single member and return the path it was written to.
pub fn extract_member(archive: &Path, member: &str) -> Result<PathBuf, TextprepError> {
    let mut paths = extract_members(archive, &[member])?;
    Ok(paths.remove(0))
}

/// Extract several members; the returned paths follow the input order.
pub fn extract_members<S: AsRef<str>>(
    archive: &Path,
    members: &[S],
) -> Result<Vec<PathBuf>, TextprepError> {
    let format = ArchiveFormat::from_path(archive)?;
    let out_dir = parent_dir(archive);

    let mut targets = Vec::with_capacity(members.len());
    for member in members {
        let member = normalize_member(member.as_ref());
        let dest = output_path(out_dir, member).ok_or_else(|| TextprepError::NotFound {
            member: member.to_string(),
            archive: archive.to_path_buf(),
        })?;
        targets.push((member.to_string(), dest));
    }

    match format {
        ArchiveFormat::Zip => extract_zip(archive, &targets)?,
        ArchiveFormat::TarGz => extract_tar_gz(archive, &targets)?,
    }

    info!(
        "extracted {} member(s) from {}",
        targets.len(),
        archive.display()
    );

    Ok(targets.into_iter().map(|(_, dest)| dest).collect())
}

/// List the regular-file members of an archive, in archive order.
pub fn list_members(archive: &Path) -> Result<Vec<String>, TextprepError> {
    match ArchiveFormat::from_path(archive)? {
        ArchiveFormat::Zip => {
            let zip = open_zip(archive)?;
            Ok(zip
                .file_names()
                .filter(|name| !name.ends_with('/'))
                .map(str::to_string)
                .collect())
        }
        ArchiveFormat::TarGz => {
            let mut tar = open_tar_gz(archive)?;
            let mut names = Vec::new();
            for entry in tar.entries().map_err(archive_err(archive))? {
                let entry = entry.map_err(archive_err(archive))?;
                if entry.header().entry_type().is_file() {
                    let path = entry.path().map_err(archive_err(archive))?;
                    names.push(normalize_member(&path.to_string_lossy()).to_string());
                }
            }
            Ok(names)
        }
    }
}

fn extract_zip(archive: &Path, targets: &[(String, PathBuf)]) -> Result<(), TextprepError> {
    let mut zip = open_zip(archive)?;

    for (member, dest) in targets {
        let mut entry = match zip.by_name(member) {
            Ok(entry) if entry.is_file() => entry,
            Ok(_) | Err(zip::result::ZipError::FileNotFound) => {
                return Err(TextprepError::NotFound {
                    member: member.clone(),
                    archive: archive.to_path_buf(),
                })
            }
            Err(source) => return Err(archive_err(archive)(source)),
        };

        let mut output = StagedFile::create(dest)?;
        io::copy(&mut entry, &mut output).map_err(archive_err(archive))?;
        output.commit()?;
        debug!("wrote {} to {}", member, dest.display());
    }

    Ok(())
}

fn extract_tar_gz(archive: &Path, targets: &[(String, PathBuf)]) -> Result<(), TextprepError> {
    // Tar is sequential, so all requested members are collected in one pass.
    let mut wanted: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (index, (member, _)) in targets.iter().enumerate() {
        wanted.entry(member.as_str()).or_default().push(index);
    }
    let mut found = vec![false; targets.len()];

    let mut tar = open_tar_gz(archive)?;
    for entry in tar.entries().map_err(archive_err(archive))? {
        let mut entry = entry.map_err(archive_err(archive))?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let name = entry
            .path()
            .map_err(archive_err(archive))?
            .to_string_lossy()
            .into_owned();
        let Some(indices) = wanted.get(normalize_member(&name)) else {
            continue;
        };

        let first = indices[0];
        if found[first] {
            continue;
        }
        let dest = &targets[first].1;
        let mut output = StagedFile::create(dest)?;
        io::copy(&mut entry, &mut output).map_err(archive_err(archive))?;
        output.commit()?;
        debug!("wrote {} to {}", name, dest.display());

        for &index in indices {
            found[index] = true;
        }
        if found.iter().all(|&done| done) {
            break;
        }
    }

    if let Some(missing) = found.iter().position(|&done| !done) {
        return Err(TextprepError::NotFound {
            member: targets[missing].0.clone(),
            archive: archive.to_path_buf(),
        });
    }

    Ok(())
}

fn open_zip(archive: &Path) -> Result<zip::ZipArchive<BufReader<File>>, TextprepError> {
    let file = File::open(archive).map_err(TextprepError::io_at(archive))?;
    zip::ZipArchive::new(BufReader::new(file)).map_err(archive_err(archive))
}

fn open_tar_gz(archive: &Path) -> Result<tar::Archive<GzDecoder<BufReader<File>>>, TextprepError> {
    let file = File::open(archive).map_err(TextprepError::io_at(archive))?;
    Ok(tar::Archive::new(GzDecoder::new(BufReader::new(file))))
}

fn archive_err<E: std::fmt::Display>(archive: &Path) -> impl FnOnce(E) -> TextprepError + '_ {
    move |source| TextprepError::Archive {
        path: archive.to_path_buf(),
        message: source.to_string(),
    }
}

fn normalize_member(member: &str) -> &str {
    member.trim_start_matches("./")
}

/// Flattened destination for a member, `None` for directory references.
fn output_path(out_dir: &Path, member: &str) -> Option<PathBuf> {
    let file_name = member.rsplit('/').next().filter(|name| !name.is_empty())?;
    Some(out_dir.join(file_name))
}
