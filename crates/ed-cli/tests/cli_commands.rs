#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable
#![allow(missing_docs)] // integration test crate; workspace denies missing_docs

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn depths() -> Command {
    Command::cargo_bin("depths").unwrap()
}

#[test]
fn help_lists_subcommands() {
    depths()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("new"))
        .stdout(predicate::str::contains("play"))
        .stdout(predicate::str::contains("sessions"));
}

#[test]
fn new_creates_a_saved_session() {
    let dir = TempDir::new().unwrap();

    depths()
        .args(["new", "--name", "Throg", "--class", "warrior"])
        .args(["--store-dir", dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome, Throg the Warrior!"))
        .stdout(predicate::str::contains("session:"));

    depths()
        .args(["sessions", "--store-dir", dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Throg"))
        .stdout(predicate::str::contains("cave_entrance"));
}

#[test]
fn sessions_on_empty_store_says_so() {
    let dir = TempDir::new().unwrap();
    depths()
        .args(["sessions", "--store-dir", dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("no saved sessions"));
}

#[test]
fn state_of_unknown_session_fails() {
    let dir = TempDir::new().unwrap();
    depths()
        .args(["state", "nope", "--store-dir", dir.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("session not found"));
}

#[test]
fn play_runs_a_full_victory_from_piped_commands() {
    let script = "take magical rope\n\
                  go east\n\
                  use rope\n\
                  go east\n\
                  take crystal\n\
                  go west\n\
                  go west\n\
                  exit\n";

    depths()
        .args(["play", "--name", "Mystara", "--class", "wizard"])
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome, Mystara the Wizard!"))
        .stdout(predicate::str::contains("You take the Magical Rope."))
        .stdout(predicate::str::contains("VICTORY"));
}

#[test]
fn play_narrates_blocked_moves_and_unknown_commands() {
    let script = "go south\n\
                  dance wildly\n\
                  quit\n";

    depths()
        .arg("play")
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains("can't go south"))
        .stdout(predicate::str::contains("dance wildly"));
}

#[test]
fn saved_game_survives_between_invocations() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().to_str().unwrap().to_string();

    let output = depths()
        .args(["new", "--name", "Tess", "--class", "rogue"])
        .args(["--store-dir", &store])
        .output()
        .unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let session_id = stdout
        .lines()
        .find_map(|line| line.strip_prefix("session: "))
        .expect("session id in output")
        .trim()
        .to_string();

    depths()
        .args(["play", "--session", &session_id, "--store-dir", &store])
        .write_stdin("take rope\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("You take the Magical Rope."));

    depths()
        .args(["state", &session_id, "--store-dir", &store])
        .assert()
        .success()
        .stdout(predicate::str::contains("magical_rope"))
        .stdout(predicate::str::contains("\"turn_count\": 1"));

    depths()
        .args(["delete", &session_id, "--store-dir", &store])
        .assert()
        .success();

    depths()
        .args(["sessions", "--store-dir", &store])
        .assert()
        .success()
        .stdout(predicate::str::contains("no saved sessions"));
}
