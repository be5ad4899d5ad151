use predicates::str::contains;

mod common;
use common::{init_db, pc, setup_test_db};

// The live board projects from *today's* sessions, so these tests clock on
// the default date (today) with explicit times.

#[test]
fn test_status_follows_clock_and_break_transitions() {
    let db = setup_test_db("status_transitions");
    init_db(&db);

    pc().args(["--db", &db, "clock", "in", "--user", "ada", "--at", "08:00"])
        .assert()
        .success();

    pc().args(["--db", &db, "status", "--user", "ada"])
        .assert()
        .success()
        .stdout(contains("IN"));

    pc().args(["--db", &db, "break", "start", "--user", "ada", "--at", "08:10"])
        .assert()
        .success();

    pc().args(["--db", &db, "status", "--user", "ada"])
        .assert()
        .success()
        .stdout(contains("BREAK"));

    pc().args(["--db", &db, "break", "end", "--user", "ada", "--at", "08:20"])
        .assert()
        .success();

    pc().args(["--db", &db, "clock", "out", "--user", "ada", "--at", "08:30"])
        .assert()
        .success();

    pc().args(["--db", &db, "status", "--user", "ada"])
        .assert()
        .success()
        .stdout(contains("OUT"));
}

#[test]
fn test_status_lists_every_tracked_user() {
    let db = setup_test_db("status_all_users");
    init_db(&db);

    pc().args(["--db", &db, "clock", "in", "--user", "ada", "--at", "08:00"])
        .assert()
        .success();
    pc().args(["--db", &db, "clock", "in", "--user", "bob", "--at", "08:05"])
        .assert()
        .success();

    pc().args(["--db", &db, "status"])
        .assert()
        .success()
        .stdout(contains("ada"))
        .stdout(contains("bob"));
}

#[test]
fn test_status_empty_board() {
    let db = setup_test_db("status_empty");
    init_db(&db);

    pc().args(["--db", &db, "status"])
        .assert()
        .success()
        .stdout(contains("No live status entries"));
}
