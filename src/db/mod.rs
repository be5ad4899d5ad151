pub mod audit;
pub mod breaks;
pub mod daily;
pub mod initialize;
pub mod leave;
pub mod live;
pub mod migrate;
pub mod pool;
pub mod sessions;
