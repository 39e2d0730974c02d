pub mod chirp;
pub mod metrics;
pub mod user;
