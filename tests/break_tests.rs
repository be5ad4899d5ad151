use predicates::str::contains;

mod common;
use common::{init_db, pc, setup_test_db};

fn clock_in(db: &str, date: &str, at: &str) {
    pc().args([
        "--db", db, "clock", "in", "--user", "ada", "--date", date, "--at", at,
    ])
    .assert()
    .success();
}

#[test]
fn test_break_requires_active_session() {
    let db = setup_test_db("break_no_session");
    init_db(&db);

    pc().args([
        "--db", &db, "break", "start", "--user", "ada", "--date", "2025-06-02", "--at", "12:00",
    ])
    .assert()
    .failure()
    .stderr(contains("No active session"));
}

#[test]
fn test_second_open_break_rejected() {
    let db = setup_test_db("break_double_start");
    init_db(&db);
    clock_in(&db, "2025-06-02", "09:00");

    pc().args([
        "--db", &db, "break", "start", "--user", "ada", "--date", "2025-06-02", "--at", "12:00",
    ])
    .assert()
    .success();

    pc().args([
        "--db", &db, "break", "start", "--user", "ada", "--date", "2025-06-02", "--at", "12:05",
    ])
    .assert()
    .failure()
    .stderr(contains("break is already open"));
}

#[test]
fn test_break_end_without_open_break_fails() {
    let db = setup_test_db("break_no_open");
    init_db(&db);
    clock_in(&db, "2025-06-02", "09:00");

    pc().args([
        "--db", &db, "break", "end", "--user", "ada", "--date", "2025-06-02", "--at", "12:30",
    ])
    .assert()
    .failure()
    .stderr(contains("No open break"));
}

#[test]
fn test_break_duration_reported_on_end() {
    let db = setup_test_db("break_duration");
    init_db(&db);
    clock_in(&db, "2025-06-02", "09:00");

    pc().args([
        "--db", &db, "break", "start", "--user", "ada", "--date", "2025-06-02", "--at", "12:00",
    ])
    .assert()
    .success();

    pc().args([
        "--db", &db, "break", "end", "--user", "ada", "--date", "2025-06-02", "--at", "12:45",
    ])
    .assert()
    .success()
    .stdout(contains("back from break after 00:45"));
}

#[test]
fn test_multiple_closed_breaks_accumulate() {
    let db = setup_test_db("break_accumulate");
    init_db(&db);
    clock_in(&db, "2025-06-02", "09:00");

    for (start, end) in [("10:30", "10:45"), ("12:00", "12:45")] {
        pc().args([
            "--db", &db, "break", "start", "--user", "ada", "--date", "2025-06-02", "--at", start,
        ])
        .assert()
        .success();

        pc().args([
            "--db", &db, "break", "end", "--user", "ada", "--date", "2025-06-02", "--at", end,
        ])
        .assert()
        .success();
    }

    // 480 raw minutes minus 60 of breaks.
    pc().args([
        "--db", &db, "clock", "out", "--user", "ada", "--date", "2025-06-02", "--at", "17:00",
    ])
    .assert()
    .success()
    .stdout(contains("worked 07:00"))
    .stdout(contains("breaks 01:00"));
}
