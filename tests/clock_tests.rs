use predicates::str::contains;

mod common;
use common::{clock_full_day, init_db, pc, setup_test_db};

#[test]
fn test_clock_in_and_out_happy_path() {
    let db = setup_test_db("clock_happy");
    init_db(&db);

    pc().args([
        "--db", &db, "clock", "in", "--user", "ada", "--date", "2025-06-02", "--at", "08:30",
    ])
    .assert()
    .success()
    .stdout(contains("ada clocked in on 2025-06-02 at 08:30"));

    // 460 net minutes: early-out, 96% attendance.
    pc().args([
        "--db", &db, "clock", "out", "--user", "ada", "--date", "2025-06-02", "--at", "16:10",
    ])
    .assert()
    .success()
    .stdout(contains("worked 07:40"))
    .stdout(contains("attendance 96%"))
    .stdout(contains("early-out"));
}

#[test]
fn test_second_clock_in_same_day_rejected() {
    let db = setup_test_db("clock_double_in");
    init_db(&db);

    pc().args([
        "--db", &db, "clock", "in", "--user", "ada", "--date", "2025-06-02", "--at", "09:00",
    ])
    .assert()
    .success();

    pc().args([
        "--db", &db, "clock", "in", "--user", "ada", "--date", "2025-06-02", "--at", "09:05",
    ])
    .assert()
    .failure()
    .stderr(contains("active session already exists for ada on 2025-06-02"));

    // The loser must not have created a second row: one clock-out drains the day.
    pc().args([
        "--db", &db, "clock", "out", "--user", "ada", "--date", "2025-06-02", "--at", "17:00",
    ])
    .assert()
    .success();

    pc().args([
        "--db", &db, "clock", "out", "--user", "ada", "--date", "2025-06-02", "--at", "17:01",
    ])
    .assert()
    .failure()
    .stderr(contains("No active session"));
}

#[test]
fn test_clock_out_without_session_fails() {
    let db = setup_test_db("clock_no_session");
    init_db(&db);

    pc().args([
        "--db", &db, "clock", "out", "--user", "ada", "--date", "2025-06-02", "--at", "17:00",
    ])
    .assert()
    .failure()
    .stderr(contains("No active session for ada on 2025-06-02"));
}

#[test]
fn test_late_checkin_flagged_in_record() {
    let db = setup_test_db("clock_late");
    init_db(&db);
    clock_full_day(&db, "ada", "2025-06-03", "09:15", "17:30");

    pc().args(["--db", &db, "record", "2025-06-03", "--user", "ada"])
        .assert()
        .success()
        .stdout(contains("late"));
}

#[test]
fn test_overtime_day_with_break() {
    let db = setup_test_db("clock_overtime");
    init_db(&db);

    pc().args([
        "--db", &db, "clock", "in", "--user", "ada", "--date", "2025-06-04", "--at", "09:00",
    ])
    .assert()
    .success();

    pc().args([
        "--db", &db, "break", "start", "--user", "ada", "--date", "2025-06-04", "--at", "12:00",
    ])
    .assert()
    .success();

    pc().args([
        "--db", &db, "break", "end", "--user", "ada", "--date", "2025-06-04", "--at", "12:30",
    ])
    .assert()
    .success();

    // 600 raw minutes minus 30 break: 570 net, 30 minutes of overtime.
    pc().args([
        "--db", &db, "clock", "out", "--user", "ada", "--date", "2025-06-04", "--at", "19:00",
    ])
    .assert()
    .success()
    .stdout(contains("worked 09:30"))
    .stdout(contains("breaks 00:30"))
    .stdout(contains("overtime"));
}

#[test]
fn test_open_break_is_closed_and_counted_at_clock_out() {
    let db = setup_test_db("clock_open_break");
    init_db(&db);

    pc().args([
        "--db", &db, "clock", "in", "--user", "ada", "--date", "2025-06-05", "--at", "09:00",
    ])
    .assert()
    .success();

    pc().args([
        "--db", &db, "break", "start", "--user", "ada", "--date", "2025-06-05", "--at", "12:00",
    ])
    .assert()
    .success();

    // Never ended the break: clock-out closes it at 12:30 and counts it.
    pc().args([
        "--db", &db, "clock", "out", "--user", "ada", "--date", "2025-06-05", "--at", "12:30",
    ])
    .assert()
    .success()
    .stdout(contains("worked 03:00"))
    .stdout(contains("breaks 00:30"));
}

#[test]
fn test_sessions_are_per_user() {
    let db = setup_test_db("clock_per_user");
    init_db(&db);

    pc().args([
        "--db", &db, "clock", "in", "--user", "ada", "--date", "2025-06-02", "--at", "09:00",
    ])
    .assert()
    .success();

    // A different user on the same day is not blocked.
    pc().args([
        "--db", &db, "clock", "in", "--user", "bob", "--date", "2025-06-02", "--at", "09:00",
    ])
    .assert()
    .success();
}
