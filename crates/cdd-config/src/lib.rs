//! Configuration for cdd
//!
//! This crate handles:
//! - Global configuration (`~/.config/cdd/config.toml`)
//! - Log verbosity resolution from the environment

mod error;
mod global;
mod level;

pub use error::*;
pub use global::*;
pub use level::*;
