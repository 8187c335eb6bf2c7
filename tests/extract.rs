//! Integration tests for archive member extraction.

use std::fs;
use std::path::Path;

use textprep::dataset::extract::list_members;
use textprep::{Dataset, TextprepError};

mod common;

const README: &[u8] = b"# project\n\nA sample readme.\n";
const LICENSE: &[u8] = b"MIT License\n";
const IMAGE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 1, 2, 3];

fn entries() -> Vec<(&'static str, &'static [u8])> {
    vec![
        ("project-master/README.md", README),
        ("project-master/LICENSE", LICENSE),
        ("project-master/docs/logo.png", IMAGE),
    ]
}

fn check_extracts_in_order(archive: &Path) {
    let d = Dataset::default();
    let members = ["project-master/docs/logo.png", "project-master/README.md"];
    let extracted = d.extract_files(archive, &members).expect("extract");

    let dir = archive.parent().expect("archive dir");
    assert_eq!(extracted, vec![dir.join("logo.png"), dir.join("README.md")]);
    assert_eq!(fs::read(&extracted[0]).expect("read png"), IMAGE);
    assert_eq!(fs::read(&extracted[1]).expect("read readme"), README);
}

#[test]
fn extracts_zip_members_in_input_order() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let archive = temp.path().join("master.zip");
    common::build_zip(&archive, &entries());

    check_extracts_in_order(&archive);
}

#[test]
fn extracts_tar_gz_members_in_input_order() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let archive = temp.path().join("master.tar.gz");
    common::build_tar_gz(&archive, &entries());

    check_extracts_in_order(&archive);
}

#[test]
fn single_member_returns_single_path() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let archive = temp.path().join("master.tgz");
    common::build_tar_gz(&archive, &entries());

    let path = Dataset::default()
        .extract_file(&archive, "project-master/LICENSE")
        .expect("extract");
    assert_eq!(path, temp.path().join("LICENSE"));
    assert_eq!(fs::read(path).expect("read license"), LICENSE);
}

#[test]
fn missing_member_names_member_and_archive() {
    let temp = tempfile::tempdir().expect("create temp dir");
    for name in ["master.zip", "master.tar.gz"] {
        let archive = temp.path().join(name);
        if name.ends_with(".zip") {
            common::build_zip(&archive, &entries());
        } else {
            common::build_tar_gz(&archive, &entries());
        }

        let err = Dataset::default()
            .extract_files(&archive, &["project-master/README.md", "project-master/missing.txt"])
            .unwrap_err();
        match err {
            TextprepError::NotFound { member, archive: reported } => {
                assert_eq!(member, "project-master/missing.txt");
                assert_eq!(reported, archive);
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }
}

#[test]
fn unsupported_extension_is_rejected() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let archive = temp.path().join("master.7z");
    fs::write(&archive, b"not an archive").expect("write file");

    let err = Dataset::default()
        .extract_file(&archive, "project-master/README.md")
        .unwrap_err();
    assert!(matches!(err, TextprepError::UnsupportedArchive(_)));
}

#[test]
fn corrupt_zip_is_an_archive_error() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let archive = temp.path().join("broken.zip");
    fs::write(&archive, b"PK\x03\x04 truncated").expect("write file");

    let err = Dataset::default()
        .extract_file(&archive, "anything.txt")
        .unwrap_err();
    assert!(matches!(err, TextprepError::Archive { .. }));
}

#[test]
fn lists_file_members_for_both_formats() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let zip = temp.path().join("master.zip");
    let tgz = temp.path().join("master.tar.gz");
    common::build_zip(&zip, &entries());
    common::build_tar_gz(&tgz, &entries());

    let expected: Vec<String> = entries().iter().map(|(name, _)| name.to_string()).collect();
    assert_eq!(list_members(&zip).expect("list zip"), expected);
    assert_eq!(list_members(&tgz).expect("list tar.gz"), expected);
}
