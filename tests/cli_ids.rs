use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

const CANONICAL: &str = r#"{"aaur":{"aaur_cne_0":[0,0],"aaur_cne_1":[100,200],"aaur_cne_2":[400,640]},"epal":{"epal_cne_0":[0,0],"epal_cne_1":[1000,1100],"epal_cne_2":[2000,2050],"epal_cne_3":[5000,5050]},"hsym":{"hsym_cne_0":[0,0],"hsym_cne_1":[50,120],"hsym_cne_2":[300,330],"hsym_cne_3":[700,720],"hsym_cne_4":[900,950]}}"#;

#[test]
fn command_ids() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("cnehg")?;
    let output = cmd.arg("ids").arg("tests/cne/pairwise").output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert!(output.status.success());
    assert_eq!(stdout.trim_end(), CANONICAL);

    Ok(())
}

#[test]
fn command_ids_file_order() -> anyhow::Result<()> {
    // files given in reverse order are still read by name
    let mut cmd = Command::cargo_bin("cnehg")?;
    let output = cmd
        .arg("ids")
        .arg("tests/cne/pairwise/epal_vs_hsym.out")
        .arg("tests/cne/pairwise/aaur_vs_hsym.out")
        .arg("tests/cne/pairwise/aaur_vs_epal.out")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(stdout.trim_end(), CANONICAL);

    Ok(())
}

#[test]
fn command_ids_coords() -> anyhow::Result<()> {
    let tempdir = TempDir::new()?;
    let out = tempdir.path().join("cnes.json");
    let coords = tempdir.path().join("coords");

    let mut cmd = Command::cargo_bin("cnehg")?;
    cmd.arg("ids")
        .arg("tests/cne/pairwise")
        .arg("-o")
        .arg(&out)
        .arg("--coords-dir")
        .arg(&coords)
        .assert()
        .success();

    assert_eq!(std::fs::read_to_string(&out)?.trim_end(), CANONICAL);
    assert_eq!(
        std::fs::read_to_string(coords.join("aaur_cne_coords.tsv"))?,
        "aaur_cne_0\t0\t0\naaur_cne_1\t100\t200\naaur_cne_2\t400\t640\n"
    );
    assert!(coords.join("epal_cne_coords.tsv").is_file());
    assert!(coords.join("hsym_cne_coords.tsv").is_file());

    Ok(())
}

#[test]
fn command_ids_sweep() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("cnehg")?;
    let output = cmd
        .arg("ids")
        .arg("tests/cne/pairwise")
        .arg("--mode")
        .arg("sweep")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    // no touching calls in this data set, both modes agree
    assert_eq!(stdout.trim_end(), CANONICAL);

    Ok(())
}

#[test]
fn command_ids_malformed_row() -> anyhow::Result<()> {
    let tempdir = TempDir::new()?;
    let infile = tempdir.path().join("aaur_vs_epal.out");
    std::fs::write(
        &infile,
        "aaur\t100\t150\t+\tepal\t1000\t1040\t+\t51\t41\t96.08\naaur\t400\tabc\t+\tepal\t2000\t2050\t-\t51\t51\t92.16\n",
    )?;
    let out = tempdir.path().join("cnes.json");

    let mut cmd = Command::cargo_bin("cnehg")?;
    cmd.arg("ids")
        .arg(&infile)
        .arg("-o")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 2"));

    // nothing written on failure
    assert!(!out.exists());

    Ok(())
}

#[test]
fn command_ids_bad_file_name() -> anyhow::Result<()> {
    let tempdir = TempDir::new()?;
    let infile = tempdir.path().join("aaur_epal.tsv");
    std::fs::write(&infile, "")?;

    let mut cmd = Command::cargo_bin("cnehg")?;
    cmd.arg("ids")
        .arg(&infile)
        .assert()
        .failure()
        .stderr(predicate::str::contains("_vs_"));

    Ok(())
}

#[test]
fn command_ids_empty_dir() -> anyhow::Result<()> {
    let tempdir = TempDir::new()?;

    let mut cmd = Command::cargo_bin("cnehg")?;
    let output = cmd.arg("ids").arg(tempdir.path()).output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert!(output.status.success());
    assert_eq!(stdout, "{}\n");

    Ok(())
}

#[test]
fn command_ids_coords_failure() -> anyhow::Result<()> {
    let tempdir = TempDir::new()?;
    let out = tempdir.path().join("cnes.json");
    // a regular file where the directory should go
    let coords = tempdir.path().join("coords");
    std::fs::write(&coords, "")?;

    let mut cmd = Command::cargo_bin("cnehg")?;
    cmd.arg("ids")
        .arg("tests/cne/pairwise")
        .arg("-o")
        .arg(&out)
        .arg("--coords-dir")
        .arg(&coords)
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not create"));

    assert!(!out.exists());

    Ok(())
}
