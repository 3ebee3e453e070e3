use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

const INPUT: &str = "one\ntwo\nthree MARK\nfour\nfive\n";

fn awksed() -> Command {
    Command::cargo_bin("awksed").unwrap()
}

#[test]
fn inserts_after_the_anchor() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.txt");
    let output = dir.path().join("out.txt");
    fs::write(&input, INPUT).unwrap();

    awksed()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .args(["-s", "MARK", "-p", "1", "-l", "inserted"])
        .assert()
        .success();

    let lines: Vec<String> = fs::read_to_string(&output).unwrap().lines().map(String::from).collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[3], "inserted");
    assert_eq!(fs::read_to_string(&input).unwrap(), INPUT);
}

#[test]
fn inserts_before_with_negative_placement() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.txt");
    let output = dir.path().join("out.txt");
    fs::write(&input, INPUT).unwrap();

    awksed()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .args(["-s", "MARK", "-p", "-1", "-l", "before"])
        .assert()
        .success();

    let text = fs::read_to_string(&output).unwrap();
    assert_eq!(text, "one\ntwo\nbefore\nthree MARK\nfour\nfive\n");
}

#[test]
fn edits_in_place_without_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.txt");
    fs::write(&input, INPUT).unwrap();

    awksed()
        .arg("-i")
        .arg(&input)
        .args(["-s", "five", "-p", "1", "-l", "six"])
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&input).unwrap(), format!("{INPUT}six\n"));
}

#[test]
fn skip_selects_a_later_match() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.txt");
    fs::write(&input, "a x\nb\nc x\nd\n").unwrap();

    awksed()
        .arg("-i")
        .arg(&input)
        .args(["-s", "x", "-c", "1", "-p", "1", "-l", "new"])
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&input).unwrap(), "a x\nb\nc x\nnew\nd\n");
}

#[test]
fn zero_placement_is_rejected() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.txt");
    fs::write(&input, INPUT).unwrap();

    awksed()
        .arg("-i")
        .arg(&input)
        .args(["-s", "MARK", "-p", "0", "-l", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("placement of zero"));

    assert_eq!(fs::read_to_string(&input).unwrap(), INPUT);
}

#[test]
fn zero_placement_is_reported_before_environment_lookup() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.txt");
    fs::write(&input, INPUT).unwrap();

    awksed()
        .env_remove("AWKSED_UNSET_VAR")
        .arg("-i")
        .arg(&input)
        .args(["-s", "MARK", "-p", "0", "-l", "x $AWKSED_UNSET_VAR", "-e", "$AWKSED_UNSET_VAR"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("placement of zero"))
        .stderr(predicate::str::contains("not set").not());
}

#[test]
fn missing_anchor_fails() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.txt");
    fs::write(&input, INPUT).unwrap();

    awksed()
        .arg("-i")
        .arg(&input)
        .args(["-s", "absent", "-p", "1", "-l", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("found 0 time(s)"));
}

#[test]
fn substitutes_environment_placeholders() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.txt");
    fs::write(&input, INPUT).unwrap();

    awksed()
        .env("ANGLE", "42.5")
        .arg("-i")
        .arg(&input)
        .args(["-s", "MARK", "-p", "1", "-l", "dihedral $ANGLE", "-e", "$ANGLE"])
        .assert()
        .success();

    assert!(fs::read_to_string(&input).unwrap().contains("three MARK\ndihedral 42.5\n"));
}
