//! Command-line tests driving the `read-context` binary.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{NamedTempFile, TempDir};

fn write_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// 40 bases of chr1, 12 of chr2
fn fixture_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_file(
        &dir,
        "ref.fa",
        ">chr1\nACGTACGTAC\nGGGGCCCCAA\nTTTTACGTAC\nNNNNACGTAC\n>chr2\nAAAACCCCGGGG\n",
    );
    write_file(
        &dir,
        "reads.tsv",
        "name\tcontig\tstart\tend\n\
         first\tchr1\t1\t8\n\
         second\tchr1\t5\t24\n\
         third\tchr2\t3\t6\n",
    );
    write_file(
        &dir,
        "calls.vcf",
        "##fileformat=VCFv4.2\n\
         #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n\
         chr1\t6\t.\tC\tT\t.\t.\t.\n\
         chr1\t20\t.\tAA\tA\t.\t.\t.\n\
         chr2\t10\t.\tC\tG\t.\t.\t.\n",
    );
    dir
}

fn annotate(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("read-context").unwrap();
    cmd.arg("annotate")
        .arg("--reads")
        .arg(dir.path().join("reads.tsv"))
        .arg("--variants")
        .arg(dir.path().join("calls.vcf"))
        .arg("--reference")
        .arg(dir.path().join("ref.fa"));
    cmd
}

#[test]
fn test_help() {
    Command::cargo_bin("read-context")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("annotate"))
        .stdout(predicate::str::contains("shards"));
}

#[test]
fn test_annotate_text() {
    let dir = fixture_dir();
    annotate(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("first (#0) chr1:1-8"))
        .stdout(predicate::str::contains("Reference: ACGTACGT (8 bp)"))
        .stdout(predicate::str::contains("third (#2) chr2:3-6"))
        .stdout(predicate::str::contains("Variants: none"));
}

#[test]
fn test_annotate_tsv() {
    let dir = fixture_dir();
    annotate(&dir)
        .arg("--format")
        .arg("tsv")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "read_id\tname\tinterval\treference_bases\tvariant_ids\tsnps\tindels\n",
        ))
        .stdout(predicate::str::contains("0\tfirst\tchr1:1-8\tACGTACGT\t0\t1\t0\n"))
        .stdout(predicate::str::contains(
            "1\tsecond\tchr1:5-24\tACGTACGGGGCCCCAATTTT\t0,1\t1\t1\n",
        ))
        .stdout(predicate::str::contains("2\tthird\tchr2:3-6\tAACC\t.\t0\t0\n"));
}

#[test]
fn test_annotate_json_with_small_shards() {
    let dir = fixture_dir();
    let output = annotate(&dir)
        .args(["--shard-width", "4", "--threads", "2", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let contexts = json["contexts"].as_array().unwrap();
    assert_eq!(contexts.len(), 3);
    assert_eq!(contexts[1]["read"]["name"], "second");
    assert_eq!(
        contexts[1]["context"]["reference_bases"]["bases"],
        "ACGTACGGGGCCCCAATTTT"
    );
    assert_eq!(contexts[1]["context"]["variants"].as_array().unwrap().len(), 2);
    assert_eq!(json["stats"]["reads"], 3);
}

#[test]
fn test_annotate_config_file() {
    let dir = fixture_dir();
    let mut config = NamedTempFile::with_suffix(".json").unwrap();
    config.write_all(br#"{"shard_width": 5}"#).unwrap();
    config.flush().unwrap();

    annotate(&dir)
        .arg("--config")
        .arg(config.path())
        .arg("--format")
        .arg("tsv")
        .assert()
        .success()
        .stdout(predicate::str::contains("0,1\t1\t1"));
}

#[test]
fn test_annotate_read_past_contig_end() {
    let dir = fixture_dir();
    write_file(&dir, "reads.tsv", "bad\tchr2\t10\t20\n");

    annotate(&dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("chr2"));
}

#[test]
fn test_annotate_missing_reads_file() {
    let dir = fixture_dir();
    Command::cargo_bin("read-context")
        .unwrap()
        .arg("annotate")
        .arg("--reads")
        .arg(dir.path().join("missing.tsv"))
        .arg("--reference")
        .arg(dir.path().join("ref.fa"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load reads"));
}

#[test]
fn test_annotate_zero_shard_width() {
    let dir = fixture_dir();
    annotate(&dir)
        .args(["--shard-width", "0"])
        .assert()
        .failure();
}

#[test]
fn test_annotate_zero_threads() {
    let dir = fixture_dir();
    annotate(&dir)
        .args(["--threads", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid thread count 0"));
}

#[test]
fn test_shards_text() {
    Command::cargo_bin("read-context")
        .unwrap()
        .args(["shards", "1:2999999-3000008"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reference shard: 1#29"))
        .stdout(predicate::str::contains("Variant shards: 1#29, 1#30"));
}

#[test]
fn test_shards_tsv() {
    Command::cargo_bin("read-context")
        .unwrap()
        .args(["--format", "tsv", "shards", "chr1:95-105", "--shard-width", "10"])
        .assert()
        .success()
        .stdout(
            "kind\tcontig\tshard_number\nreference\tchr1\t9\nvariant\tchr1\t9\nvariant\tchr1\t10\n",
        );
}

#[test]
fn test_shards_invalid_interval() {
    Command::cargo_bin("read-context")
        .unwrap()
        .args(["shards", "1:200-100"])
        .assert()
        .failure();
}
