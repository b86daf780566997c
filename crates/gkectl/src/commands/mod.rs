//! Command implementations

pub mod cluster;
pub mod progress;
pub mod upgrade;
pub mod version;
