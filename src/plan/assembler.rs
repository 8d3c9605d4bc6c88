//! Plan assembly and plan queries.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::types::{DayPlan, PlanConfig, MAX_TARGET_DAILY_MINUTES};

use super::calendar::enumerate_training_dates;
use super::error::PlanError;
use super::ramp::compute_daily_targets_for;
use super::segments::{build_segments, total_work_minutes};

/// Checks the minute fields of a configuration.
///
/// Date-related checks happen during enumeration.
pub fn validate_config(config: &PlanConfig) -> Result<(), PlanError> {
    let target = config.target_daily_minutes;
    if target == 0 {
        return Err(PlanError::validation(
            "target daily minutes must be greater than 0",
        ));
    }
    if target > MAX_TARGET_DAILY_MINUTES {
        return Err(PlanError::validation(format!(
            "target daily minutes cannot exceed {MAX_TARGET_DAILY_MINUTES} (8 hours)"
        )));
    }
    if let Some(starting) = config.starting_daily_minutes {
        if starting > target {
            return Err(PlanError::validation(
                "starting daily minutes cannot exceed target daily minutes",
            ));
        }
    }
    Ok(())
}

/// Generates the complete list of day plans for `config`.
///
/// # Errors
///
/// Returns [`PlanError`] if the configuration is invalid or no training date
/// matches; no partial plan is ever returned.
pub fn assemble_plan(config: &PlanConfig) -> Result<Vec<DayPlan>, PlanError> {
    validate_config(config)?;

    let dates = enumerate_training_dates(config)?;
    let targets = compute_daily_targets_for(config.target_daily_minutes, &dates);

    let plan: Vec<DayPlan> = dates
        .into_iter()
        .zip(targets)
        .enumerate()
        .map(|(i, (date, daily_target_minutes))| DayPlan {
            index: i as u32 + 1,
            date,
            daily_target_minutes,
            segments: build_segments(i64::from(daily_target_minutes)),
        })
        .collect();

    info!(
        days = plan.len(),
        target = config.target_daily_minutes,
        "assembled focus plan"
    );
    Ok(plan)
}

/// Returns the day scheduled on `date`, if any.
pub fn day_for_date(plan: &[DayPlan], date: NaiveDate) -> Option<&DayPlan> {
    plan.iter().find(|day| day.date == date)
}

/// Returns the first day scheduled on or after `date`.
pub fn next_day_on_or_after(plan: &[DayPlan], date: NaiveDate) -> Option<&DayPlan> {
    plan.iter().find(|day| day.date >= date)
}

/// Returns the day with the given 1-based index.
pub fn day_by_index(plan: &[DayPlan], index: u32) -> Option<&DayPlan> {
    plan.iter().find(|day| day.index == index)
}

/// Number of training days scheduled strictly after `date`.
pub fn days_remaining(plan: &[DayPlan], date: NaiveDate) -> usize {
    plan.iter().filter(|day| day.date > date).count()
}

/// Overview of a generated plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    /// Number of training days
    pub total_days: usize,
    /// First training date
    pub first_date: NaiveDate,
    /// Last training date
    pub last_date: NaiveDate,
    /// Daily target reached on the last day
    pub target_daily_minutes: u32,
    /// Sum of work minutes over the whole plan
    pub total_work_minutes: u32,
}

impl PlanSummary {
    /// Summarizes `plan`; `None` for an empty plan.
    pub fn from_plan(plan: &[DayPlan]) -> Option<Self> {
        let first = plan.first()?;
        let last = plan.last()?;
        Some(Self {
            total_days: plan.len(),
            first_date: first.date,
            last_date: last.date,
            target_daily_minutes: last.daily_target_minutes,
            total_work_minutes: plan.iter().map(|d| total_work_minutes(&d.segments)).sum(),
        })
    }
}
