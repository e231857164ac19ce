use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

const SEED: &str = r#"{
  "accounts": [
    {"id": "acc_a", "name": "Ama Mensah", "email": "ama@example.com", "balance_ghs": 100},
    {"id": "acc_b", "name": "Kofi Boateng", "email": "kofi@example.com"}
  ],
  "plans": [
    {"id": "plan_1", "name": "December Trip", "balance": 0}
  ]
}"#;

#[test]
fn test_batch_transfer_reports_result_and_final_balances() {
    let dir = tempfile::tempdir().unwrap();
    let seed = write_file(&dir, "seed.json", SEED);
    let ops = write_file(
        &dir,
        "ops.json",
        r#"{"account":"acc_a","type":"transfer","amount":40,"currency":"GHS","details":{"recipient_id":"acc_b"}}"#,
    );

    Command::cargo_bin("sika")
        .unwrap()
        .arg(&ops)
        .arg("--seed")
        .arg(&seed)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#""kind":"transfer","success":true,"status":"completed""#,
        ))
        .stdout(predicate::str::contains(r#""balance_ghs":"60""#))
        .stdout(predicate::str::contains(r#""balance_ghs":"40""#))
        .stdout(predicate::str::contains("Transfer to Kofi Boateng"));
}

#[test]
fn test_failed_operation_is_reported_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let seed = write_file(&dir, "seed.json", SEED);
    let ops = write_file(
        &dir,
        "ops.json",
        concat!(
            r#"{"account":"acc_b","type":"transfer","amount":500,"currency":"GHS","details":{"recipient_id":"acc_a"}}"#,
            "\n",
            r#"{"account":"acc_a","type":"fund-savings","amount":25,"currency":"GHS","details":{"plan_id":"plan_1"}}"#,
        ),
    );

    Command::cargo_bin("sika")
        .unwrap()
        .arg(&ops)
        .arg("--seed")
        .arg(&seed)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""success":false"#))
        .stdout(predicate::str::contains("insufficient funds in GHS balance"))
        .stdout(predicate::str::contains(
            r#""kind":"fund-savings","success":true"#,
        ))
        .stdout(predicate::str::contains(r#""balance_ghs":"75""#));
}

#[test]
fn test_malformed_line_goes_to_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let seed = write_file(&dir, "seed.json", SEED);
    let ops = write_file(&dir, "ops.json", r#"{"account":"acc_a","type":"nope"}"#);

    Command::cargo_bin("sika")
        .unwrap()
        .arg(&ops)
        .arg("--seed")
        .arg(&seed)
        .assert()
        .success()
        .stderr(predicate::str::contains("Error reading operation"));
}

#[test]
fn test_unknown_currency_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let seed = write_file(&dir, "seed.json", SEED);
    let ops = write_file(
        &dir,
        "ops.json",
        r#"{"account":"acc_a","type":"transfer","amount":10,"currency":"USD","details":{"recipient_id":"acc_b"}}"#,
    );

    Command::cargo_bin("sika")
        .unwrap()
        .arg(&ops)
        .arg("--seed")
        .arg(&seed)
        .assert()
        .success()
        .stderr(predicate::str::contains("Error reading operation"));
}

#[test]
fn test_missing_input_file_fails() {
    Command::cargo_bin("sika")
        .unwrap()
        .arg("does-not-exist.json")
        .assert()
        .failure();
}
