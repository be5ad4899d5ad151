//! Running-total projection at a fixed instant, driven through the library
//! API so the clock can be pinned.

use chrono::NaiveDateTime;
use punchcard::core::breaks::BreakLogic;
use punchcard::core::clock::ClockLogic;
use punchcard::core::live;
use punchcard::db::pool::DbPool;
use punchcard::models::caller::{Caller, Role};
use punchcard::models::live_status::LiveState;
use punchcard::utils::time::parse_datetime;

mod common;
use common::setup_test_db;

fn dt(s: &str) -> NaiveDateTime {
    parse_datetime(s).unwrap()
}

#[test]
fn open_break_accrues_pause_not_work() {
    let db = setup_test_db("live_open_break");
    let mut pool = DbPool::new(&db).unwrap();
    let ada = Caller::new("ada", Role::Employee);

    let start = dt("2025-06-02 09:00");
    ClockLogic::clock_in(&mut pool, &ada, start.date(), start, "cli").unwrap();
    BreakLogic::start(&mut pool, &ada, start.date(), dt("2025-06-02 09:30"), "coffee").unwrap();

    // Half an hour into the break: the open span belongs to pause time.
    let status = live::project_at(&pool.conn, "ada", dt("2025-06-02 10:00")).unwrap();
    assert_eq!(status.state, LiveState::Break);
    assert_eq!(status.work_minutes, 30);
    assert_eq!(status.break_minutes, 30);
}

#[test]
fn closed_break_counts_once_after_resume() {
    let db = setup_test_db("live_closed_break");
    let mut pool = DbPool::new(&db).unwrap();
    let ada = Caller::new("ada", Role::Employee);

    let start = dt("2025-06-02 09:00");
    ClockLogic::clock_in(&mut pool, &ada, start.date(), start, "cli").unwrap();
    BreakLogic::start(&mut pool, &ada, start.date(), dt("2025-06-02 09:30"), "coffee").unwrap();
    BreakLogic::end(&mut pool, &ada, start.date(), dt("2025-06-02 09:45")).unwrap();

    let status = live::project_at(&pool.conn, "ada", dt("2025-06-02 10:00")).unwrap();
    assert_eq!(status.state, LiveState::In);
    assert_eq!(status.work_minutes, 45);
    assert_eq!(status.break_minutes, 15);
}
