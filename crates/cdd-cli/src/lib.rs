//! Command implementations and logging setup for the `cdd` binary

pub mod commands;
pub mod logging;
