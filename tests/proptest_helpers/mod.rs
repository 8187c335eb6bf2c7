#![allow(dead_code)]

use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Line file contents: `(lines, terminate_last)`.
///
/// Lines never contain `\n`; they may be empty or contain `\r` and tabs.
pub fn arb_line_file(max_lines: usize) -> impl Strategy<Value = (Vec<String>, bool)> {
    (
        prop::collection::vec("[a-z0-9 \\t\\r]{0,12}", 0..max_lines),
        any::<bool>(),
    )
}

pub fn render_line_file(lines: &[String], terminate_last: bool) -> Vec<u8> {
    let mut content = lines.join("\n");
    if terminate_last && !lines.is_empty() {
        content.push('\n');
    }
    content.into_bytes()
}

/// Record count as defined for line files.
pub fn expected_line_count(lines: &[String], terminate_last: bool) -> usize {
    match lines.last() {
        None => 0,
        // A single empty unterminated line renders as an empty file.
        Some(last) if !terminate_last && last.is_empty() => lines.len() - 1,
        Some(_) => lines.len(),
    }
}
