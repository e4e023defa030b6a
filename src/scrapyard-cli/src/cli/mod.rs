//! CLI argument definitions for scrapyard
//!
//! This module contains all clap-derived structs and enums for CLI parsing.

mod core;
mod format;

pub use core::{Cli, Commands, DataArgs};
pub use format::{BucketArg, OutputFormat};
