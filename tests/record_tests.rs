use predicates::str::contains;

mod common;
use common::{clock_full_day, init_db, pc, setup_test_db};

#[test]
fn test_record_lookup_by_user_and_date() {
    let db = setup_test_db("record_lookup");
    init_db(&db);
    clock_full_day(&db, "ada", "2025-06-02", "08:30", "17:00");

    pc().args(["--db", &db, "record", "2025-06-02", "--user", "ada"])
        .assert()
        .success()
        .stdout(contains("2025-06-02"))
        .stdout(contains("08:30"))
        .stdout(contains("17:00"));

    pc().args(["--db", &db, "record", "2025-06-03", "--user", "ada"])
        .assert()
        .failure()
        .stderr(contains("Not found"));
}

#[test]
fn test_list_period_filters() {
    let db = setup_test_db("record_periods");
    init_db(&db);
    clock_full_day(&db, "ada", "2025-05-30", "08:30", "17:00");
    clock_full_day(&db, "ada", "2025-06-02", "08:30", "17:00");
    clock_full_day(&db, "bob", "2025-06-02", "09:30", "17:00");

    // Month filter keeps June only.
    pc().args(["--db", &db, "list", "--period", "2025-06"])
        .assert()
        .success()
        .stdout(contains("2025-06-02"))
        .stdout(contains("2025-05-30").count(0));

    // User filter on top of the archive.
    pc().args(["--db", &db, "list", "--period", "all", "--user", "bob"])
        .assert()
        .success()
        .stdout(contains("bob"))
        .stdout(contains("ada").count(0));
}

#[test]
fn test_list_json_output() {
    let db = setup_test_db("record_json");
    init_db(&db);
    clock_full_day(&db, "ada", "2025-06-02", "08:00", "16:00");

    pc().args(["--db", &db, "list", "--period", "2025-06", "--json"])
        .assert()
        .success()
        .stdout(contains("\"work_minutes\": 480"))
        .stdout(contains("\"attendance_pct\": 100"));
}

#[test]
fn test_rebuild_reproduces_daily_records() {
    let db = setup_test_db("record_rebuild");
    init_db(&db);
    clock_full_day(&db, "ada", "2025-06-02", "08:30", "17:00");

    pc().args(["--db", &db, "rebuild"])
        .assert()
        .success()
        .stdout(contains("Rebuilt 1 daily records"));

    // The regenerated record matches the incremental one.
    pc().args(["--db", &db, "record", "2025-06-02", "--user", "ada"])
        .assert()
        .success()
        .stdout(contains("08:30"))
        .stdout(contains("100%"));

    // Rebuild is idempotent.
    pc().args(["--db", &db, "rebuild"])
        .assert()
        .success()
        .stdout(contains("Rebuilt 1 daily records"));
}

#[test]
fn test_audit_log_records_operations() {
    let db = setup_test_db("record_audit");
    init_db(&db);
    clock_full_day(&db, "ada", "2025-06-02", "08:30", "17:00");

    pc().args(["--db", &db, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("clock_in"))
        .stdout(contains("clock_out"))
        .stdout(contains("ada"));
}
