use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};

pub fn archshape_cmd() -> Command {
    let mut cmd = Command::cargo_bin("archshape").unwrap();
    cmd.env_remove("ARCHSHAPE_CONFIG");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Write a CSV fixture into `dir` and return its path
#[allow(dead_code)]
pub fn write_csv(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[allow(dead_code)]
pub const DATUM_CSV: &str = "latitude,longitude,label\n\"40.0\",\"-90.0\",\"Site datum\"\n";
