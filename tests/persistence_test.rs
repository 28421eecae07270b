#![cfg(feature = "storage-rocksdb")]

use assert_cmd::cargo_bin;
use std::io::Write;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn test_rocksdb_persistence_recovery() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    // 1. First run: create a wallet and deposit into it
    let mut csv1 = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv1, "op, actor, role, wallet, receiver, tx, amount, name").unwrap();
    writeln!(csv1, "create_wallet, 1, owner, , , , , w").unwrap();
    writeln!(csv1, "deposit, 1, owner, 1, , , 100.00,").unwrap();

    let mut cmd1 = Command::new(cargo_bin!("wallet-ledger"));
    cmd1.arg(csv1.path()).arg("--db-path").arg(&db_path);

    let output1 = cmd1.output().expect("Failed to execute command");
    assert!(output1.status.success());
    let stdout1 = String::from_utf8_lossy(&output1.stdout);
    assert!(stdout1.contains("1,1,w,100.00"));

    // 2. Second run: deposit again against the same DB path
    let mut csv2 = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv2, "op, actor, role, wallet, receiver, tx, amount, name").unwrap();
    writeln!(csv2, "deposit, 1, owner, 1, , , 50.00,").unwrap();

    let mut cmd2 = Command::new(cargo_bin!("wallet-ledger"));
    cmd2.arg(csv2.path()).arg("--db-path").arg(&db_path);

    let output2 = cmd2.output().expect("Failed to execute command");
    assert!(output2.status.success());
    let stdout2 = String::from_utf8_lossy(&output2.stdout);

    // Should have recovered 100.00 and added 50.00 = 150.00
    assert!(stdout2.contains("1,1,w,150.00"));
}

#[test]
fn test_cancellation_survives_restart() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("cancel_db");

    let mut csv1 = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv1, "op, actor, role, wallet, receiver, tx, amount, name").unwrap();
    writeln!(csv1, "create_wallet, 1, owner, , , , , w").unwrap();
    writeln!(csv1, "deposit, 1, owner, 1, , , 100.00,").unwrap();

    let mut cmd1 = Command::new(cargo_bin!("wallet-ledger"));
    cmd1.arg(csv1.path()).arg("--db-path").arg(&db_path);
    assert!(cmd1.output().unwrap().status.success());

    // The deposit above is transaction 1; cancel it in a fresh process.
    let mut csv2 = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv2, "op, actor, role, wallet, receiver, tx, amount, name").unwrap();
    writeln!(csv2, "cancel, 9, admin, , , 1, ,").unwrap();

    let mut cmd2 = Command::new(cargo_bin!("wallet-ledger"));
    cmd2.arg(csv2.path()).arg("--db-path").arg(&db_path);
    let output2 = cmd2.output().unwrap();
    assert!(output2.status.success());
    let stdout2 = String::from_utf8_lossy(&output2.stdout);
    assert!(stdout2.contains("1,1,w,0.00"));
}
