#![allow(dead_code)]
use assert_cmd::{cargo_bin_cmd, Command};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn pc() -> Command {
    cargo_bin_cmd!("punchcard")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_punchcard.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Initialize the schema (uses --test so no config file is written)
pub fn init_db(db_path: &str) {
    pc().args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

/// Clock a full worked day for `user` on `date`: in at `start`, out at `end`.
pub fn clock_full_day(db_path: &str, user: &str, date: &str, start: &str, end: &str) {
    pc().args([
        "--db", db_path, "clock", "in", "--user", user, "--date", date, "--at", start,
    ])
    .assert()
    .success();

    pc().args([
        "--db", db_path, "clock", "out", "--user", user, "--date", date, "--at", end,
    ])
    .assert()
    .success();
}
