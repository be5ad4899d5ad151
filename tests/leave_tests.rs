use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{clock_full_day, init_db, pc, setup_test_db};

fn request_leave(db: &str, user: &str, start: &str, end: &str) {
    pc().args([
        "--db", db, "leave", "request", start, end, "--user", user,
    ])
    .assert()
    .success()
    .stdout(contains("filed"));
}

fn grant(db: &str, user: &str, year: &str, minutes: &str) {
    pc().args([
        "--db", db, "--role", "admin", "leave", "grant", "--user", user, "--year", year,
        "--minutes", minutes, "--actor", "root",
    ])
    .assert()
    .success();
}

#[test]
fn test_approve_creates_placeholder_records_for_range() {
    let db = setup_test_db("leave_placeholders");
    init_db(&db);
    request_leave(&db, "ada", "2025-07-01", "2025-07-03");

    pc().args([
        "--db", &db, "--role", "admin", "leave", "approve", "1", "--actor", "root",
    ])
    .assert()
    .success()
    .stdout(contains("approved"));

    // Exactly three zero-duration records tagged as leave.
    pc().args(["--db", &db, "list", "--period", "2025-07-01:2025-07-03", "--user", "ada"])
        .assert()
        .success()
        .stdout(contains("2025-07-01"))
        .stdout(contains("2025-07-02"))
        .stdout(contains("2025-07-03"))
        .stdout(contains("leave"))
        .stdout(contains("00:00"));
}

#[test]
fn test_approve_requires_admin_role() {
    let db = setup_test_db("leave_not_admin");
    init_db(&db);
    request_leave(&db, "ada", "2025-07-01", "2025-07-01");

    pc().args(["--db", &db, "leave", "approve", "1", "--actor", "ada"])
        .assert()
        .failure()
        .stderr(contains("Not authorized"));
}

#[test]
fn test_approve_fails_without_sufficient_balance() {
    let db = setup_test_db("leave_insufficient");
    init_db(&db);

    // 480 allocated, 3 full days (1440) requested.
    grant(&db, "ada", "2025", "480");
    request_leave(&db, "ada", "2025-07-01", "2025-07-03");

    pc().args([
        "--db", &db, "--role", "admin", "leave", "approve", "1", "--actor", "root",
    ])
    .assert()
    .failure()
    .stderr(contains("Insufficient leave balance"));

    // The aborted transaction must not have touched the balance or created
    // any placeholder.
    pc().args(["--db", &db, "leave", "balance", "--user", "ada"])
        .assert()
        .success()
        .stdout(contains("00:00"));

    pc().args(["--db", &db, "list", "--period", "2025-07", "--user", "ada"])
        .assert()
        .success()
        .stdout(contains("No daily records found"));
}

#[test]
fn test_cancel_after_approve_restores_balance_and_removes_placeholders() {
    let db = setup_test_db("leave_cancel_roundtrip");
    init_db(&db);

    grant(&db, "ada", "2025", "2400");
    request_leave(&db, "ada", "2025-07-01", "2025-07-02");

    pc().args([
        "--db", &db, "--role", "admin", "leave", "approve", "1", "--actor", "root",
    ])
    .assert()
    .success();

    // Two full days debited.
    pc().args(["--db", &db, "leave", "balance", "--user", "ada"])
        .assert()
        .success()
        .stdout(contains("16:00"));

    pc().args([
        "--db", &db, "--role", "admin", "leave", "cancel", "1", "--actor", "root",
    ])
    .assert()
    .success()
    .stdout(contains("cancelled"));

    // Round-trip: used back to zero, placeholders retracted.
    pc().args(["--db", &db, "leave", "balance", "--user", "ada"])
        .assert()
        .success()
        .stdout(contains("00:00").and(contains("16:00").not()));

    pc().args(["--db", &db, "list", "--period", "2025-07", "--user", "ada"])
        .assert()
        .success()
        .stdout(contains("No daily records found"));
}

#[test]
fn test_cancel_approved_requires_admin() {
    let db = setup_test_db("leave_cancel_admin_only");
    init_db(&db);
    request_leave(&db, "ada", "2025-07-01", "2025-07-01");

    pc().args([
        "--db", &db, "--role", "admin", "leave", "approve", "1", "--actor", "root",
    ])
    .assert()
    .success();

    pc().args(["--db", &db, "leave", "cancel", "1", "--actor", "ada"])
        .assert()
        .failure()
        .stderr(contains("Not authorized"));
}

#[test]
fn test_owner_can_cancel_own_pending_request() {
    let db = setup_test_db("leave_cancel_pending");
    init_db(&db);
    request_leave(&db, "ada", "2025-07-01", "2025-07-01");

    pc().args(["--db", &db, "leave", "cancel", "1", "--actor", "ada"])
        .assert()
        .success()
        .stdout(contains("cancelled"));

    // A cancelled request can no longer be approved.
    pc().args([
        "--db", &db, "--role", "admin", "leave", "approve", "1", "--actor", "root",
    ])
    .assert()
    .failure()
    .stderr(contains("only pending"));
}

#[test]
fn test_approve_skips_days_with_real_attendance() {
    let db = setup_test_db("leave_clock_precedence");
    init_db(&db);

    // Real attendance on the first day of the range.
    clock_full_day(&db, "ada", "2025-07-01", "09:00", "17:30");
    request_leave(&db, "ada", "2025-07-01", "2025-07-02");

    pc().args([
        "--db", &db, "--role", "admin", "leave", "approve", "1", "--actor", "root",
    ])
    .assert()
    .success();

    // Day one keeps its clock record; only day two got a placeholder.
    pc().args(["--db", &db, "record", "2025-07-01", "--user", "ada"])
        .assert()
        .success()
        .stdout(contains("clock"));

    pc().args(["--db", &db, "record", "2025-07-02", "--user", "ada"])
        .assert()
        .success()
        .stdout(contains("leave"));
}

#[test]
fn test_regrant_never_lowers_existing_allocation() {
    let db = setup_test_db("leave_grant_floor");
    init_db(&db);

    grant(&db, "ada", "2025", "960");
    grant(&db, "ada", "2025", "240");

    // The larger allocation stands; a smaller re-grant is a no-op.
    pc().args(["--db", &db, "leave", "balance", "--user", "ada"])
        .assert()
        .success()
        .stdout(contains("16:00").and(contains("04:00").not()));
}

#[test]
fn test_half_day_request_uses_half_minutes() {
    let db = setup_test_db("leave_half_day");
    init_db(&db);

    pc().args([
        "--db", &db, "leave", "request", "2025-07-01", "--user", "ada", "--half-day",
    ])
    .assert()
    .success()
    .stdout(contains("04:00"));
}
