use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

#[test]
fn test_minimum_transfer_rate_boundary() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "op, actor, role, wallet, receiver, tx, amount, name").unwrap();
    writeln!(file, "create_wallet, 1, owner, , , , , w").unwrap();
    // Below the minimum: rejected, balance untouched.
    writeln!(file, "deposit, 1, owner, 1, , , 0.09,").unwrap();
    // Exactly the minimum: accepted.
    writeln!(file, "deposit, 1, owner, 1, , , 0.1,").unwrap();

    let mut cmd = Command::new(cargo_bin!("wallet-ledger"));
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Error processing request"))
        .stdout(predicate::str::contains("1,1,w,0.10"));
}

#[test]
fn test_large_magnitudes() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "op, actor, role, wallet, receiver, tx, amount, name").unwrap();
    writeln!(file, "create_wallet, 1, owner, , , , , vault").unwrap();
    writeln!(file, "deposit, 1, owner, 1, , , 10000000000000000.00,").unwrap();
    writeln!(file, "withdraw, 1, owner, 1, , , 9999999999999999.99,").unwrap();

    let mut cmd = Command::new(cargo_bin!("wallet-ledger"));
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1,1,vault,0.01"));
}

#[test]
fn test_amount_with_excess_precision_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "op, actor, role, wallet, receiver, tx, amount, name").unwrap();
    writeln!(file, "create_wallet, 1, owner, , , , , w").unwrap();
    writeln!(file, "deposit, 1, owner, 1, , , 1.001,").unwrap();

    let mut cmd = Command::new(cargo_bin!("wallet-ledger"));
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Error processing request"))
        .stdout(predicate::str::contains("1,1,w,0.00"));
}
