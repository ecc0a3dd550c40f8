//! CLI integration test driving a fast full week through the binary.

use std::process::Command;

#[test]
fn week_run_drains_and_reports_summary() {
    let bin = env!("CARGO_BIN_EXE_osteria");
    // Tiny floor and stock at a 5ms time unit: plenty of contention, still
    // fast. The run finishing at all is the no-lost-wakeup check.
    let output = Command::new(bin)
        .args(["run", "6", "2", "3", "5"])
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run week binary");

    assert!(
        output.status.success(),
        "week run exited with non-zero status: {:?}",
        output.status
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("WEEK SUMMARY"),
        "week summary missing from output"
    );

    let profit_line = stdout
        .lines()
        .find(|line| line.starts_with("weekly_profit="))
        .expect("weekly_profit line missing");
    let profit: u64 = profit_line["weekly_profit=".len()..]
        .trim()
        .parse()
        .expect("weekly_profit not a number");

    let dishes_line = stdout
        .lines()
        .find(|line| line.starts_with("dishes_sold="))
        .expect("dishes_sold line missing");
    let dishes: u64 = dishes_line["dishes_sold=".len()..]
        .trim()
        .parse()
        .expect("dishes_sold not a number");

    // Menu prices are drawn from 10..=50, so profit is bounded by sales.
    assert!(profit >= 10 * dishes);
    assert!(profit <= 50 * dishes);
}

#[test]
fn rejects_zero_stock_ceiling() {
    let bin = env!("CARGO_BIN_EXE_osteria");
    let output = Command::new(bin)
        .args(["run", "-", "-", "0"])
        .output()
        .expect("failed to run week binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("stock_ceiling must be > 0"));
}
