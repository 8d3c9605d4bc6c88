//! Training date enumeration.

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::types::PlanConfig;

use super::error::PlanError;

/// Maximum number of calendar days walked before giving up.
pub const MAX_CALENDAR_DAYS: u32 = 1000;

/// Enumerates the dates on which training happens.
///
/// Walks forward one day at a time from `start_date`, keeping dates whose
/// weekday is selected, until `training_days_count` dates were found or the
/// walk reaches `end_date` (inclusive). Without either bound the walk covers
/// [`MAX_CALENDAR_DAYS`] days.
///
/// # Errors
///
/// - [`PlanError::Validation`] if no weekday is selected, `end_date` is not
///   after `start_date`, `training_days_count` is 0, or a requested bound
///   lies beyond [`MAX_CALENDAR_DAYS`].
/// - [`PlanError::NoTrainingDays`] if no date matched.
pub fn enumerate_training_dates(config: &PlanConfig) -> Result<Vec<NaiveDate>, PlanError> {
    let selector = config.training_days_per_week;
    if selector.is_empty() {
        return Err(PlanError::validation(
            "at least one training day per week must be selected",
        ));
    }

    if let Some(end) = config.end_date {
        if end <= config.start_date {
            return Err(PlanError::validation("end date must be after start date"));
        }
    }

    let wanted = match config.training_days_count {
        Some(0) => {
            return Err(PlanError::validation(
                "training days count must be at least 1",
            ))
        }
        Some(n) => Some(n as usize),
        None => None,
    };

    let mut dates = Vec::new();
    let mut current = config.start_date;
    let mut reached_bound = false;

    for _ in 0..MAX_CALENDAR_DAYS {
        if selector.contains(current.weekday()) {
            dates.push(current);
            if wanted.is_some_and(|n| dates.len() >= n) {
                reached_bound = true;
                break;
            }
        }

        if config.end_date.is_some_and(|end| current >= end) {
            reached_bound = true;
            break;
        }

        current = match current.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    let bounded = wanted.is_some() || config.end_date.is_some();
    if bounded && !reached_bound {
        return Err(PlanError::validation(format!(
            "plan would span more than {MAX_CALENDAR_DAYS} calendar days"
        )));
    }

    if dates.is_empty() {
        return Err(PlanError::NoTrainingDays(
            "no training days found in the specified date range with the selected days of week"
                .to_string(),
        ));
    }

    debug!(
        count = dates.len(),
        first = %config.start_date,
        "enumerated training dates"
    );
    Ok(dates)
}
