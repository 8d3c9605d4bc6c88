//! CLI module for focus180.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `display`: Output formatting and display logic

pub mod commands;
pub mod display;

pub use commands::{
    Cli, Commands, HistoryArgs, PlanArgs, PlanCommandArgs, RunArgs, TodayArgs,
};
pub use display::{Display, RECORDING_WARNING};
