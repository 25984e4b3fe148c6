use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tar::{Builder, EntryType, Header};
use tempfile::tempdir;

fn write_minimal_archive(path: &Path) {
    let mut builder = Builder::new(Vec::new());
    let data: &[u8] = b"Jan  2 04:00:00 pool stratum+tcp up\n";
    let mut header = Header::new_gnu();
    header
        .set_path("pack/miner-1/var/log/messages")
        .expect("entry path");
    header.set_entry_type(EntryType::Regular);
    header.set_size(data.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder.append(&header, data).expect("append entry");
    let bytes = builder.into_inner().expect("finish archive");
    fs::write(path, bytes).expect("write archive");
}

#[test]
fn quad_names_keep_the_quad_in_the_key() {
    let tmp = tempdir().expect("tempdir");
    let home = tmp.path().join("antlog");
    let uploads = home.join("uploads");
    fs::create_dir_all(&uploads).expect("mkdir uploads");
    let archive = uploads.join("10.0.0.1_antminer_log_2024-01-01_2024-01-02.tar");
    write_minimal_archive(&archive);

    assert_cmd::cargo::cargo_bin_cmd!("antlog")
        .current_dir(tmp.path())
        .env("ANTLOG_HOME", &home)
        .env("ANTLOG_CONFIG_PATH", tmp.path().join("antlog.toml"))
        .args(["ingest", "--user", "alice", "--archive"])
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "canonical_key=10.0.0.1_2024-01-01_2024-01-02.tar",
        ));
}

#[test]
fn plain_names_key_on_the_dates_alone() {
    let tmp = tempdir().expect("tempdir");
    let home = tmp.path().join("antlog");
    let uploads = home.join("uploads");
    fs::create_dir_all(&uploads).expect("mkdir uploads");
    let archive = uploads.join("antminer_log_2024-01-01_2024-01-02.tar");
    write_minimal_archive(&archive);

    assert_cmd::cargo::cargo_bin_cmd!("antlog")
        .current_dir(tmp.path())
        .env("ANTLOG_HOME", &home)
        .env("ANTLOG_CONFIG_PATH", tmp.path().join("antlog.toml"))
        .args(["ingest", "--user", "alice", "--archive"])
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "canonical_key=2024-01-01_2024-01-02.tar",
        ));
}

#[test]
fn other_tar_names_are_rejected() {
    let tmp = tempdir().expect("tempdir");
    let home = tmp.path().join("antlog");
    let uploads = home.join("uploads");
    fs::create_dir_all(&uploads).expect("mkdir uploads");
    let archive = uploads.join("quarterly-export.tar");
    write_minimal_archive(&archive);

    assert_cmd::cargo::cargo_bin_cmd!("antlog")
        .current_dir(tmp.path())
        .env("ANTLOG_HOME", &home)
        .env("ANTLOG_CONFIG_PATH", tmp.path().join("antlog.toml"))
        .args(["ingest", "--user", "alice", "--archive"])
        .arg(&archive)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no known naming pattern"));
}
