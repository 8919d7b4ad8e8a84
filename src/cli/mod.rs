//! Command-line interface and configuration.
//!
//! - [`args`]: clap argument parsing and run-mode selection
//! - [`config`]: TOML settings with a discovery hierarchy

pub mod args;
pub mod config;

pub use args::{Args, Commands, RunMode};
pub use config::{ConfigDiscovery, Settings};
