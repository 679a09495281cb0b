use assert_fs::prelude::*;
use predicates::prelude::*;

#[test]
fn max_len_zero_is_invalid() {
    assert_cmd::cargo::cargo_bin_cmd!("chunk-relay")
        .args(["split", "--max-len", "0"])
        .write_stdin("hello")
        .assert()
        .failure()
        .code(2);
}

#[test]
fn send_without_destination_fails() {
    assert_cmd::cargo::cargo_bin_cmd!("chunk-relay")
        .args(["send"])
        .write_stdin("hello")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error destination is not configured"));
}

#[test]
fn missing_input_file_fails() {
    let dir = assert_fs::TempDir::new().unwrap();

    assert_cmd::cargo::cargo_bin_cmd!("chunk-relay")
        .current_dir(&dir)
        .args(["split", "absent.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("reading absent.txt"));
}

#[test]
fn unknown_config_key_fails() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("relay.toml").write_str("token = \"x\"\n").unwrap();

    assert_cmd::cargo::cargo_bin_cmd!("chunk-relay")
        .current_dir(&dir)
        .args(["split", "-C", "relay.toml"])
        .write_stdin("hello")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config"));
}
