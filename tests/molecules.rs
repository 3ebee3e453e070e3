use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

const WATER_SDF: &str = "\
water
  test

  3  2  0  0  0  0  0  0  0  0999 V2000
    0.0000    0.0000    0.0000 O   0  0  0  0  0  0  0  0  0  0  0  0
    0.9572    0.0000    0.0000 H   0  0  0  0  0  0  0  0  0  0  0  0
   -0.2400    0.9266    0.0000 H   0  0  0  0  0  0  0  0  0  0  0  0
  1  2  1  0  0  0  0
  1  3  1  0  0  0  0
M  END
$$$$
";

const SALT_SDF: &str = "\
chloride
  test

  1  0  0  0  0  0  0  0  0  0999 V2000
    0.0000    0.0000    0.0000 Cl  0  5  0  0  0  0  0  0  0  0  0  0
M  END
$$$$
";

/// Two conformers of ammonia: planar, then pyramidal.
const AMMONIA_CONFORMERS: &str = "\
ammonia
  test

  4  3  0  0  0  0  0  0  0  0999 V2000
    0.0000    0.0000    0.0000 N   0  0  0  0  0  0  0  0  0  0  0  0
    1.0000    0.0000    0.0000 H   0  0  0  0  0  0  0  0  0  0  0  0
   -0.5000    0.8660    0.0000 H   0  0  0  0  0  0  0  0  0  0  0  0
   -0.5000   -0.8660    0.0000 H   0  0  0  0  0  0  0  0  0  0  0  0
  1  2  1  0  0  0  0
  1  3  1  0  0  0  0
  1  4  1  0  0  0  0
M  END
$$$$
ammonia
  test

  4  3  0  0  0  0  0  0  0  0999 V2000
    0.0000    0.0000    0.0000 N   0  0  0  0  0  0  0  0  0  0  0  0
    0.9400    0.0000   -0.3800 H   0  0  0  0  0  0  0  0  0  0  0  0
   -0.4700    0.8140   -0.3800 H   0  0  0  0  0  0  0  0  0  0  0  0
   -0.4700   -0.8140   -0.3800 H   0  0  0  0  0  0  0  0  0  0  0  0
  1  2  1  0  0  0  0
  1  3  1  0  0  0  0
  1  4  1  0  0  0  0
M  END
$$$$
";

fn tool(name: &str) -> Command {
    Command::cargo_bin(name).unwrap()
}

fn write(path: &Path, text: &str) {
    fs::write(path, text).unwrap();
}

#[test]
fn convert_sdf_to_mol2() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("water.sdf");
    let output = dir.path().join("water.mol2");
    write(&input, WATER_SDF);

    tool("mol-convert").arg("-i").arg(&input).arg("-o").arg(&output).assert().success();

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.contains("@<TRIPOS>MOLECULE"));
    assert!(text.contains("water"));
    assert!(text.contains("@<TRIPOS>BOND"));
}

#[test]
fn convert_rejects_unknown_output_format() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("water.sdf");
    write(&input, WATER_SDF);

    tool("mol-convert")
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("water.xyz"))
        .assert()
        .failure();
}

#[test]
fn charge_writes_mol2_with_charges() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("water.sdf");
    let output = dir.path().join("charged.mol2");
    write(&input, WATER_SDF);

    tool("mol-charge").arg("-i").arg(&input).arg("-o").arg(&output).assert().success();

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.contains("@<TRIPOS>ATOM"));
    assert!(!text.contains("NO_CHARGES"));
}

#[test]
fn charge_refuses_sdf_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("water.sdf");
    let output = dir.path().join("charged.sdf");
    write(&input, WATER_SDF);

    tool("mol-charge")
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot store partial charges"));
    assert!(!output.exists());
}

#[test]
fn charge_requires_existing_input() {
    let dir = tempdir().unwrap();
    tool("mol-charge")
        .arg("-i")
        .arg(dir.path().join("missing.sdf"))
        .arg("-o")
        .arg(dir.path().join("out.mol2"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn filter_keeps_only_unusual_molecules() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("mixed.sdf");
    let output = dir.path().join("kept.sdf");
    write(&input, &format!("{WATER_SDF}{SALT_SDF}"));

    tool("mol-filter").arg("-i").arg(&input).arg("-o").arg(&output).assert().success();

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("chloride"));
    assert!(!text.contains("water"));
}

#[test]
fn classify_reports_nitrogen_angle_sums() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("nh3.sdf");
    write(&input, AMMONIA_CONFORMERS);

    let out = tool("mol-classify-n").arg("-f").arg(&input).output().unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "");
    assert_eq!(lines[1], "ammonia\t2");
    assert_eq!(lines[2], "Invertible N with index 0: 360.000000");
    let pyramidal: f64 = lines[3].rsplit(": ").next().unwrap().parse().unwrap();
    assert!(pyramidal < 355.0, "{pyramidal}");
}

#[test]
fn combine_gathers_files_into_one_sdf() {
    let dir = tempdir().unwrap();
    let inputs = dir.path().join("mols");
    fs::create_dir(&inputs).unwrap();
    write(&inputs.join("b_salt.sdf"), SALT_SDF);
    write(&inputs.join("a_water.sdf"), WATER_SDF);
    write(&inputs.join("notes.txt"), "ignored");
    let output = dir.path().join("all.sdf");

    tool("mol-combine")
        .arg("-i")
        .arg(&inputs)
        .arg("-o")
        .arg(&output)
        .args(["-e", "sdf"])
        .assert()
        .success();

    let text = fs::read_to_string(&output).unwrap();
    let titles: Vec<&str> = text
        .split("$$$$\n")
        .filter(|r| !r.trim().is_empty())
        .map(|r| r.lines().next().unwrap())
        .collect();
    assert_eq!(titles, vec!["a_water", "b_salt"]);
}

#[test]
fn combine_refuses_to_overwrite() {
    let dir = tempdir().unwrap();
    let inputs = dir.path().join("mols");
    fs::create_dir(&inputs).unwrap();
    write(&inputs.join("water.sdf"), WATER_SDF);
    let output = dir.path().join("all.sdf");
    write(&output, "previous results, keep me\n");

    tool("mol-combine")
        .arg("-i")
        .arg(&inputs)
        .arg("-o")
        .arg(&output)
        .args(["-e", "sdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(fs::read_to_string(&output).unwrap(), "previous results, keep me\n");
}
