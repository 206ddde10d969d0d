use assert_cmd::prelude::*;
use std::process::Command;
use tempfile::TempDir;

#[test]
fn command_cluster() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("cnehg")?;
    let output = cmd
        .arg("cluster")
        .arg("tests/cne/links/pairwise_links.json")
        .arg("tests/cne/links/threeway_links.json")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert!(output.status.success());
    assert_eq!(stdout, "A1,B1,C1,D1\nE1,F1,G1\n");

    Ok(())
}

#[test]
fn command_cluster_dir_tab() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("cnehg")?;
    let output = cmd
        .arg("cluster")
        .arg("tests/cne/links")
        .arg("--sep")
        .arg("tab")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(stdout, "A1\tB1\tC1\tD1\nE1\tF1\tG1\n");

    Ok(())
}

#[test]
fn command_pipeline() -> anyhow::Result<()> {
    let tempdir = TempDir::new()?;
    let cnes = tempdir.path().join("cnes.json");
    let links = tempdir.path().join("pairwise_links.json");
    let clusters = tempdir.path().join("clusters.csv");

    let mut cmd = Command::cargo_bin("cnehg")?;
    cmd.arg("ids")
        .arg("tests/cne/pairwise")
        .arg("-o")
        .arg(&cnes)
        .assert()
        .success();

    let mut cmd = Command::cargo_bin("cnehg")?;
    cmd.arg("links")
        .arg(&cnes)
        .arg("tests/cne/pairwise")
        .arg("-o")
        .arg(&links)
        .assert()
        .success();

    let mut cmd = Command::cargo_bin("cnehg")?;
    cmd.arg("cluster")
        .arg(&links)
        .arg("-o")
        .arg(&clusters)
        .assert()
        .success();

    assert_eq!(
        std::fs::read_to_string(&clusters)?,
        "aaur_cne_1,epal_cne_1,hsym_cne_1\n\
         aaur_cne_2,epal_cne_2,hsym_cne_2,hsym_cne_4\n\
         epal_cne_3,hsym_cne_3\n"
    );

    Ok(())
}

#[test]
fn command_cluster_empty() -> anyhow::Result<()> {
    let tempdir = TempDir::new()?;
    let links = tempdir.path().join("empty.json");
    std::fs::write(&links, "[]")?;

    let mut cmd = Command::cargo_bin("cnehg")?;
    let output = cmd.arg("cluster").arg(&links).output()?;

    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    Ok(())
}
