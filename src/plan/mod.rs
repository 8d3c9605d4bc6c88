//! Focus plan generation.
//!
//! The pipeline runs top-down:
//!
//! ```text
//! PlanConfig ──▶ calendar ──▶ ramp ──▶ segments ──▶ Vec<DayPlan>
//!                (dates)     (targets)  (per day)
//! ```
//!
//! [`assemble_plan`] validates the configuration and drives all three steps.

mod assembler;
mod calendar;
mod error;
mod ramp;
mod segments;

pub use assembler::{
    assemble_plan, day_by_index, day_for_date, days_remaining, next_day_on_or_after,
    validate_config, PlanSummary,
};
pub use calendar::{enumerate_training_dates, MAX_CALENDAR_DAYS};
pub use error::PlanError;
pub use ramp::{compute_daily_targets, compute_daily_targets_for};
pub use segments::{
    build_segments, total_break_minutes, total_minutes, total_work_minutes, BREAK_MINUTES,
    MAX_DAY_MINUTES, MAX_WORK_MINUTES, MIN_WORK_MINUTES, SPLIT_THRESHOLD_MINUTES,
};
