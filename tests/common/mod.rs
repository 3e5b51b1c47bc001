#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use salesboard::{
    config::PipelineConfig,
    io_utils,
    records::RecordTable,
    report::{PreparedData, prepare},
};
use tempfile::{TempDir, tempdir};

pub const JANUARY_FILE: &str = "ventas_enero.csv";
pub const FEBRUARY_FILE: &str = "ventas_febrero.csv";

/// Returns the absolute path to a fixture under `tests/data`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Both sales fixtures read as raw tables, January first.
pub fn fixture_tables() -> Vec<RecordTable> {
    [JANUARY_FILE, FEBRUARY_FILE]
        .iter()
        .map(|name| {
            io_utils::read_table(&fixture_path(name), b',', encoding_rs::UTF_8)
                .expect("read fixture")
        })
        .collect()
}

/// Both fixtures ingested, resolved, and coerced with the default config.
pub fn prepared_fixtures() -> PreparedData {
    prepare(&fixture_tables(), &PipelineConfig::default()).expect("prepare fixtures")
}

pub fn pairs(items: &[(&str, usize)]) -> Vec<(String, usize)> {
    items
        .iter()
        .map(|(category, count)| (category.to_string(), *count))
        .collect()
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}
