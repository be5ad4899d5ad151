pub mod break_interval;
pub mod caller;
pub mod daily_record;
pub mod leave;
pub mod live_status;
pub mod session;
