// logscrub/src/commands/mod.rs
pub mod invoke;
pub mod scrub;
pub mod search;
