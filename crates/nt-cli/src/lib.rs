//! Nudgy timer CLI library.
//!
//! This crate provides the command-line interface over the event tracker.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, WindowArgs};
pub use config::Config;
