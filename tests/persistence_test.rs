use assert_cmd::cargo_bin;
use std::io::Write;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn test_cart_survives_between_runs() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("cart_db");

    // 1. First run: add one product
    let mut csv1 = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv1, "type, id, kind, price, quantity").unwrap();
    writeln!(csv1, "add, P, product, 1200000, 1").unwrap();

    let mut cmd1 = Command::new(cargo_bin!("pawcart"));
    cmd1.env_remove("PAWCART_STORAGE_KEY")
        .arg("apply")
        .arg(csv1.path())
        .arg("--db-path")
        .arg(&db_path);

    let output1 = cmd1.output().expect("Failed to execute command");
    assert!(output1.status.success());
    let stdout1 = String::from_utf8_lossy(&output1.stdout);
    assert!(stdout1.contains("\"subtotal\": 1200000"));
    assert!(stdout1.contains("\"shipping\": 30000"));

    // 2. Second run: the same product again plus a pet, on the same storage
    let mut csv2 = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv2, "type, id, kind, price, quantity").unwrap();
    writeln!(csv2, "add, P, product, 1200000, 1").unwrap();
    writeln!(csv2, "add, L, pet, 6900000, 1").unwrap();

    let mut cmd2 = Command::new(cargo_bin!("pawcart"));
    cmd2.env_remove("PAWCART_STORAGE_KEY")
        .arg("apply")
        .arg(csv2.path())
        .arg("--db-path")
        .arg(&db_path);

    let output2 = cmd2.output().expect("Failed to execute command");
    assert!(output2.status.success());
    let stdout2 = String::from_utf8_lossy(&output2.stdout);

    // 2 x 1,200,000 + 6,900,000 = 9,300,000, merged into two lines
    assert!(stdout2.contains("\"subtotal\": 9300000"));
    assert!(stdout2.contains("\"lineCount\": 3"));
    assert!(stdout2.contains("\"kind\": \"livestock\""));

    // 3. Show reads the snapshot without changing it
    let mut cmd3 = Command::new(cargo_bin!("pawcart"));
    cmd3.env_remove("PAWCART_STORAGE_KEY")
        .arg("show")
        .arg("--db-path")
        .arg(&db_path);

    let output3 = cmd3.output().expect("Failed to execute command");
    assert!(output3.status.success());
    assert_eq!(output3.stdout, output2.stdout);
}

#[test]
fn test_clear_empties_persisted_cart() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("cart_db");

    let mut csv = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv, "type, id, kind, price, quantity").unwrap();
    writeln!(csv, "add, P, product, 500, 4").unwrap();
    writeln!(csv, "clear, , , ,").unwrap();

    let mut cmd = Command::new(cargo_bin!("pawcart"));
    cmd.env_remove("PAWCART_STORAGE_KEY")
        .arg("apply")
        .arg(csv.path())
        .arg("--db-path")
        .arg(&db_path);
    assert!(cmd.output().unwrap().status.success());

    let raw = std::fs::read_to_string(db_path.join("pawcart.cart.json")).unwrap();
    let snapshot: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(snapshot["lines"], serde_json::json!([]));
    assert_eq!(snapshot["lineCount"], 0);
}
