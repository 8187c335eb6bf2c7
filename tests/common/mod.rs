#![allow(dead_code)]

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::Path;
use std::thread;

use flate2::write::GzEncoder;
use flate2::Compression;

/// Write `count` numbered lines, newline-terminated.
pub fn write_lines(path: &Path, count: usize) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    let content: String = (0..count).map(|i| format!("record {i}\tbody {i}\n")).collect();
    fs::write(path, content).expect("write line file");
}

pub fn numbered_lines(count: usize) -> Vec<u8> {
    (0..count)
        .map(|i| format!("record {i}\tbody {i}\n"))
        .collect::<String>()
        .into_bytes()
}

pub fn build_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let file = File::create(path).expect("create zip");
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    for (name, data) in entries {
        writer.start_file(*name, options).expect("start zip entry");
        writer.write_all(data).expect("write zip entry");
    }
    writer.finish().expect("finish zip");
}

pub fn build_tar_gz(path: &Path, entries: &[(&str, &[u8])]) {
    let file = File::create(path).expect("create tar.gz");
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    for (name, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        builder
            .append_data(&mut header, name, *data)
            .expect("append tar entry");
    }
    builder
        .into_inner()
        .expect("finish tar")
        .finish()
        .expect("finish gzip");
}

pub fn archive_bytes(build: fn(&Path, &[(&str, &[u8])]), name: &str, entries: &[(&str, &[u8])]) -> Vec<u8> {
    let temp = tempfile::tempdir().expect("create temp dir");
    let path = temp.path().join(name);
    build(&path, entries);
    fs::read(&path).expect("read archive")
}

/// Answer exactly one HTTP request with `status` and `body`.
///
/// Returns a URL on the loopback interface ending in `/<file_name>`.
pub fn serve_once(file_name: &str, status: u16, body: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");

    thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return;
        };
        let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
        let mut line = String::new();
        loop {
            line.clear();
            match reader.read_line(&mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) if line == "\r\n" || line == "\n" => break,
                Ok(_) => {}
            }
        }

        let reason = if status == 200 { "OK" } else { "Error" };
        let head = format!(
            "HTTP/1.1 {status} {reason}\r\nContent-Type: application/octet-stream\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        let _ = stream.write_all(head.as_bytes());
        let _ = stream.write_all(&body);
        let _ = stream.flush();
    });

    format!("http://{addr}/downloads/{file_name}")
}
