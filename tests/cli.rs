mod common;

use common::{sample_h5, sample_mat};
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn tree_prints_the_hierarchy() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sample.h5");
    sample_h5(&path);

    let mut cmd = assert_cmd::cargo_bin_cmd!("h5lens");
    cmd.arg("tree").arg(&path);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Tree Structure: sample.h5"))
        .stdout(predicate::str::contains("Beta"))
        .stdout(predicate::str::contains("values"))
        .stdout(predicate::str::contains("units"));
}

#[test]
fn convert_reports_skipped_struct_arrays() {
    let dir = tempdir().unwrap();
    let mat = dir.path().join("input.mat");
    let h5 = dir.path().join("output.h5");
    sample_mat().write(&mat);

    let mut cmd = assert_cmd::cargo_bin_cmd!("h5lens");
    cmd.arg("convert").arg(&mat).arg(&h5);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Wrote"))
        .stderr(
            predicate::str::contains("Cannot convert structure of arrays to HDF5")
                .count(1),
        )
        .stderr(predicate::str::contains(
            "WARNING: Cannot convert structure of arrays to HDF5: 's/inner'",
        ));
    assert!(h5.is_file());
}

#[test]
fn convert_fails_on_missing_input() {
    let dir = tempdir().unwrap();

    let mut cmd = assert_cmd::cargo_bin_cmd!("h5lens");
    cmd.arg("convert")
        .arg(dir.path().join("absent.mat"))
        .arg(dir.path().join("out.h5"));
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to convert"));
}
