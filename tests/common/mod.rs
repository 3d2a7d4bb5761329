//! Shared utilities for integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// The legacy document used by the decode scenarios.
#[allow(dead_code)]
pub const LEGACY_SAMPLE: &str = "\
[common]
server_addr = example.com
server_port = 7001
token = 123456
frpcgui_manual_start = true
frpcgui_delete_method = absolute
frpcgui_delete_after_date = 2023-03-23T00:00:00Z
meta_1 = value

[ssh]
type = tcp
local_ip = 192.168.1.1
local_port = 22
remote_port = 6000
meta_2 = value
";

/// Writes `content` to `name` inside `dir` and returns the path.
#[allow(dead_code)]
pub fn write_config(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Reads a file written by a test back as text.
#[allow(dead_code)]
pub fn read_config(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}
