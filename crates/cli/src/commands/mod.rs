//! Subcommand implementations.

pub mod create;
pub mod dashboard;
pub mod profile;
pub mod proof;
pub mod review;
pub mod tasks;
pub mod users;
