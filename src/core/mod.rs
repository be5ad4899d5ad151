pub mod breaks;
pub mod clock;
pub mod daily;
pub mod leave;
pub mod live;
pub mod metrics;
pub mod rebuild;
