use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn test_cli_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("deckoracle"));
    cmd.args(["--cards", "3"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"event\":\"admission\""))
        .stdout(predicate::str::contains("\"event\":\"fulfillment\""))
        // Non-shuffled: the first three cards of the fixed-order deck.
        .stdout(predicate::str::contains("\"hand\":[\"AS\",\"2S\",\"3S\"]"));

    Ok(())
}

#[test]
fn test_cli_retains_payment() {
    let mut cmd = Command::new(cargo_bin!("deckoracle"));
    cmd.args(["--cards", "1", "--fee", "1.0", "--payment", "2.5"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"balance\":\"2.5\""));
}

#[test]
fn test_cli_rejects_underpayment() {
    let mut cmd = Command::new(cargo_bin!("deckoracle"));
    cmd.args(["--fee", "1.0", "--payment", "0.5"]);

    cmd.assert().failure();
}

#[test]
fn test_cli_rejects_zero_cards() {
    let mut cmd = Command::new(cargo_bin!("deckoracle"));
    cmd.args(["--cards", "0"]);

    cmd.assert().failure();
}
