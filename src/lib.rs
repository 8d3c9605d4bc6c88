//! focus180 library
//!
//! This library provides the core functionality for the focus180 CLI.
//! It includes:
//! - Plan generation: training calendar, daily ramp and segment splitting
//! - Session timer engine with observer signals
//! - Persistence of completed work segments to a JSON-lines log
//! - CLI command parsing and display utilities
//! - Type definitions for configuration and state

pub mod cli;
pub mod config;
pub mod plan;
pub mod session;
pub mod storage;
pub mod types;

// Re-export commonly used types for convenience
pub use plan::{assemble_plan, build_segments, compute_daily_targets, PlanError};
pub use session::{SessionControl, TimerEngine, TimerOptions};
pub use types::{
    DayPlan, PlanConfig, Segment, SegmentKind, TimerPhase, TimerState, WeekdaySelector,
};
