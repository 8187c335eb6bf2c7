//! Archive acquisition over HTTP.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::info;

use super::staging::StagedFile;
use crate::error::TextprepError;

/// Stream `url` into `root/<last path segment>` and return the local path.
///
/// `root` is created when missing. The body is copied in fixed-size chunks
/// and only renamed into place once the transfer has completed. There is a
/// single attempt: network and filesystem errors go straight to the caller.
pub fn save_url(url: &str, root: &Path) -> Result<PathBuf, TextprepError> {
    let file_name = file_name_from_url(url)?;
    fs::create_dir_all(root).map_err(TextprepError::io_at(root))?;
    let dest = root.join(file_name);

    let response = agent_for(url)
        .get(url)
        .call()
        .map_err(|source| TextprepError::Http {
            url: url.to_string(),
            message: source.to_string(),
        })?;

    let mut body = response.into_body().into_reader();
    let mut output = StagedFile::create(&dest)?;
    let bytes = io::copy(&mut body, &mut output).map_err(|source| TextprepError::Http {
        url: url.to_string(),
        message: format!("failed while streaming body: {source}"),
    })?;
    let dest = output.commit()?;

    info!("downloaded {} ({} bytes) to {}", url, bytes, dest.display());
    Ok(dest)
}

/// Agent without timeouts; loopback hosts bypass any proxy from the environment.
fn agent_for(url: &str) -> ureq::Agent {
    let loopback = url::Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(is_loopback_host))
        .unwrap_or(false);

    let mut builder = ureq::Agent::config_builder();
    if loopback {
        builder = builder.proxy(None);
    }
    builder.build().into()
}

fn is_loopback_host(host: &str) -> bool {
    let host = host.trim_start_matches('[').trim_end_matches(']');
    host.eq_ignore_ascii_case("localhost")
        || host
            .parse::<std::net::IpAddr>()
            .map(|ip| ip.is_loopback())
            .unwrap_or(false)
}

/// The last non-empty path segment of `url`.
pub fn file_name_from_url(url: &str) -> Result<String, TextprepError> {
    let parsed = url::Url::parse(url)
        .map_err(|source| TextprepError::InvalidArgument(format!("invalid URL '{url}': {source}")))?;

    parsed
        .path_segments()
        .and_then(|segments| segments.filter(|segment| !segment.is_empty()).next_back())
        .map(str::to_string)
        .ok_or_else(|| {
            TextprepError::InvalidArgument(format!(
                "URL '{url}' has no path segment to name the downloaded file"
            ))
        })
}
