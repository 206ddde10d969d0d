use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

fn coords(dir: &TempDir) -> anyhow::Result<PathBuf> {
    let coords = dir.path().join("coords");
    let mut cmd = Command::cargo_bin("cnehg")?;
    cmd.arg("ids")
        .arg("tests/cne/pairwise")
        .arg("-o")
        .arg(dir.path().join("cnes.json"))
        .arg("--coords-dir")
        .arg(&coords)
        .assert()
        .success();
    Ok(coords)
}

#[test]
fn command_remap() -> anyhow::Result<()> {
    let tempdir = TempDir::new()?;
    let coords = coords(&tempdir)?;
    let outdir = tempdir.path().join("orig");

    let mut cmd = Command::cargo_bin("cnehg")?;
    cmd.arg("remap")
        .arg(coords.join("aaur_cne_coords.tsv"))
        .arg(coords.join("hsym_cne_coords.tsv"))
        .arg("--fasta-dir")
        .arg("tests/cne/padded")
        .arg("--outdir")
        .arg(&outdir)
        .assert()
        .success();

    let aaur = std::fs::read_to_string(outdir.join("aaur_orig_coords.tsv"))?;
    assert_eq!(
        aaur,
        "interval_id\tpadded_start\tpadded_end\tscaffold_id\toriginal_start\toriginal_end\n\
         aaur_cne_0\t0\t0\tscfA1\t0\t0\n\
         aaur_cne_1\t100\t200\tscfA1\t100\t200\n\
         aaur_cne_2\t400\t640\tscfA2\t100\t340\n"
    );

    // scaffold lengths read from the padded FASTA
    let hsym = std::fs::read_to_string(outdir.join("hsym_orig_coords.tsv"))?;
    assert_eq!(hsym.lines().count(), 6);
    assert!(hsym.contains("hsym_cne_2\t300\t330\tscfH2\t100\t130\n"));
    assert!(hsym.contains("hsym_cne_3\t700\t720\tscfH2\t500\t520\n"));
    assert!(hsym.contains("hsym_cne_4\t900\t950\tscfH3\t100\t150\n"));

    Ok(())
}

#[test]
fn command_remap_species_failure() -> anyhow::Result<()> {
    let tempdir = TempDir::new()?;
    let coords = coords(&tempdir)?;
    let outdir = tempdir.path().join("orig");

    // epal_cne_3 ends past the 2500 bases of epal.sizes
    let mut cmd = Command::cargo_bin("cnehg")?;
    cmd.arg("remap")
        .arg(&coords)
        .arg("--fasta-dir")
        .arg("tests/cne/padded")
        .arg("--outdir")
        .arg(&outdir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("epal_cne_3"))
        .stderr(predicate::str::contains("1 of 3 species failed"));

    assert!(outdir.join("aaur_orig_coords.tsv").is_file());
    assert!(outdir.join("hsym_orig_coords.tsv").is_file());
    assert!(!outdir.join("epal_orig_coords.tsv").exists());

    Ok(())
}

#[test]
fn command_remap_missing_scaffolds() -> anyhow::Result<()> {
    let tempdir = TempDir::new()?;
    let coords = coords(&tempdir)?;
    let empty = TempDir::new()?;

    let mut cmd = Command::cargo_bin("cnehg")?;
    cmd.arg("remap")
        .arg(coords.join("aaur_cne_coords.tsv"))
        .arg("--fasta-dir")
        .arg(empty.path())
        .arg("--outdir")
        .arg(tempdir.path().join("orig"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("no scaffold file for aaur"));

    Ok(())
}
