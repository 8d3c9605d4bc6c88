//! Core data types for 180 Focus.
//!
//! This module defines the data structures used for:
//! - Weekday selection and plan configuration
//! - Work/break segments and day plans
//! - Timer session state

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

// ============================================================================
// WeekdaySelector
// ============================================================================

/// All weekdays in display order, Monday first.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Returns the three-letter label of a weekday (`Mon` … `Sun`).
pub fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

fn parse_weekday_label(label: &str) -> Option<Weekday> {
    match label.trim().to_ascii_lowercase().as_str() {
        "mon" | "monday" => Some(Weekday::Mon),
        "tue" | "tues" | "tuesday" => Some(Weekday::Tue),
        "wed" | "wednesday" => Some(Weekday::Wed),
        "thu" | "thurs" | "thursday" => Some(Weekday::Thu),
        "fri" | "friday" => Some(Weekday::Fri),
        "sat" | "saturday" => Some(Weekday::Sat),
        "sun" | "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Set of weekdays on which training happens.
///
/// Stored as a bitmask indexed by `Weekday::num_days_from_monday`. An empty
/// selector can exist (e.g. from a hand-written plan file) but is rejected
/// when a plan is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct WeekdaySelector(u8);

impl WeekdaySelector {
    /// Creates an empty selector.
    pub fn empty() -> Self {
        Self(0)
    }

    /// Monday through Friday.
    pub fn weekdays() -> Self {
        Self::from_days(&WEEKDAYS[..5])
    }

    /// Saturday and Sunday.
    pub fn weekends() -> Self {
        Self::from_days(&WEEKDAYS[5..])
    }

    /// Every day of the week.
    pub fn daily() -> Self {
        Self::from_days(&WEEKDAYS)
    }

    /// Creates a selector from a list of weekdays (duplicates are ignored).
    pub fn from_days(days: &[Weekday]) -> Self {
        days.iter().fold(Self::empty(), |sel, day| sel.with(*day))
    }

    /// Returns a copy of this selector that also contains `day`.
    #[must_use]
    pub fn with(self, day: Weekday) -> Self {
        Self(self.0 | (1 << day.num_days_from_monday()))
    }

    /// Returns true if `day` is selected.
    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }

    /// Returns true if no weekday is selected.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Number of selected weekdays.
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates the selected weekdays, Monday first.
    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        WEEKDAYS.iter().copied().filter(|day| self.contains(*day))
    }
}

impl fmt::Display for WeekdaySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::daily() {
            return f.write_str("every day");
        }
        if *self == Self::weekdays() {
            return f.write_str("Monday - Friday");
        }
        let labels: Vec<&str> = self.iter().map(weekday_label).collect();
        f.write_str(&labels.join(", "))
    }
}

impl FromStr for WeekdaySelector {
    type Err = String;

    /// Parses `Mon,Wed,Fri` style lists and the shorthands
    /// `weekdays`, `weekends` and `daily`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekdays" => return Ok(Self::weekdays()),
            "weekends" => return Ok(Self::weekends()),
            "daily" | "all" => return Ok(Self::daily()),
            _ => {}
        }

        let mut selector = Self::empty();
        for part in s.split(',').filter(|p| !p.trim().is_empty()) {
            let day = parse_weekday_label(part)
                .ok_or_else(|| format!("unknown weekday '{}'", part.trim()))?;
            selector = selector.with(day);
        }
        if selector.is_empty() {
            return Err("at least one training day must be selected".to_string());
        }
        Ok(selector)
    }
}

impl TryFrom<Vec<String>> for WeekdaySelector {
    type Error = String;

    fn try_from(labels: Vec<String>) -> Result<Self, Self::Error> {
        labels.iter().try_fold(Self::empty(), |sel, label| {
            parse_weekday_label(label)
                .map(|day| sel.with(day))
                .ok_or_else(|| format!("unknown weekday '{}'", label))
        })
    }
}

impl From<WeekdaySelector> for Vec<String> {
    fn from(selector: WeekdaySelector) -> Self {
        selector
            .iter()
            .map(|day| weekday_label(day).to_string())
            .collect()
    }
}

// ============================================================================
// PlanConfig
// ============================================================================

/// Upper bound for the daily focus target (8 hours).
pub const MAX_TARGET_DAILY_MINUTES: u32 = 480;

/// Caller-supplied configuration of a training plan.
///
/// Field names serialize in camelCase, matching the plan file format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanConfig {
    /// First calendar day of the plan
    pub start_date: NaiveDate,
    /// Daily work minutes reached on the final training day (1-480)
    pub target_daily_minutes: u32,
    /// Weekdays on which training happens
    pub training_days_per_week: WeekdaySelector,
    /// Intended starting level (0-target)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_daily_minutes: Option<u32>,
    /// Last calendar day of the plan (inclusive, after `start_date`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Number of training days to schedule (>= 1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_days_count: Option<u32>,
}

impl PlanConfig {
    /// Creates an unbounded configuration; chain `with_*` to bound it.
    pub fn new(
        start_date: NaiveDate,
        target_daily_minutes: u32,
        training_days_per_week: WeekdaySelector,
    ) -> Self {
        Self {
            start_date,
            target_daily_minutes,
            training_days_per_week,
            starting_daily_minutes: None,
            end_date: None,
            training_days_count: None,
        }
    }

    /// Sets the inclusive end date.
    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Sets the number of training days.
    pub fn with_training_days_count(mut self, count: u32) -> Self {
        self.training_days_count = Some(count);
        self
    }

    /// Sets the starting daily minutes.
    pub fn with_starting_daily_minutes(mut self, minutes: u32) -> Self {
        self.starting_daily_minutes = Some(minutes);
        self
    }
}

// ============================================================================
// Segment
// ============================================================================

/// Kind of a plan segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    /// Focused work
    Work,
    /// Rest between work blocks
    Break,
}

impl SegmentKind {
    /// Returns the string representation of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentKind::Work => "work",
            SegmentKind::Break => "break",
        }
    }
}

/// One atomic work or break interval within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    /// Work or break
    #[serde(rename = "type")]
    pub kind: SegmentKind,
    /// Duration in whole minutes (> 0)
    pub minutes: u32,
}

impl Segment {
    /// Creates a work segment.
    pub fn work(minutes: u32) -> Self {
        Self {
            kind: SegmentKind::Work,
            minutes,
        }
    }

    /// Creates a break segment.
    pub fn rest(minutes: u32) -> Self {
        Self {
            kind: SegmentKind::Break,
            minutes,
        }
    }

    /// Returns true for work segments.
    pub fn is_work(&self) -> bool {
        self.kind == SegmentKind::Work
    }

    /// Duration in seconds.
    pub fn seconds(&self) -> u32 {
        self.minutes * 60
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.as_str(), self.minutes)
    }
}

// ============================================================================
// DayPlan
// ============================================================================

/// The schedule of a single training date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    /// 1-based ordinal within the plan
    pub index: u32,
    /// Calendar date
    pub date: NaiveDate,
    /// Work minutes to accumulate on this date (breaks excluded)
    pub daily_target_minutes: u32,
    /// Ordered work/break segments
    pub segments: Vec<Segment>,
}

impl DayPlan {
    /// Identifier used when recording sessions for this day.
    pub fn day_id(&self) -> String {
        format!("day-{}-{}", self.index, self.date)
    }
}

// ============================================================================
// TimerPhase
// ============================================================================

/// Represents the current phase of a session timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    /// Constructed, not yet started
    #[default]
    Idle,
    /// Counting down
    Running,
    /// Countdown suspended
    Paused,
    /// All segments traversed
    Finished,
}

impl TimerPhase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerPhase::Idle => "idle",
            TimerPhase::Running => "running",
            TimerPhase::Paused => "paused",
            TimerPhase::Finished => "finished",
        }
    }

    /// Returns true while a segment is in flight (running or paused).
    pub fn is_in_session(&self) -> bool {
        matches!(self, TimerPhase::Running | TimerPhase::Paused)
    }
}

// ============================================================================
// TimerState
// ============================================================================

/// Start of the work segment currently in flight.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WorkStart {
    pub(crate) index: usize,
    pub(crate) started_at: DateTime<Utc>,
    pub(crate) started_instant: Instant,
}

/// Snapshot of a session timer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerState {
    /// Current phase
    pub phase: TimerPhase,
    /// Index of the segment being played
    pub current_index: usize,
    /// Seconds left in the current segment
    pub remaining_seconds: u32,
    /// Indices of completed (or skipped) segments
    pub completed_segments: BTreeSet<usize>,
    /// Set when recording a completed work segment failed
    #[serde(default)]
    pub recording_failed: bool,
    #[serde(skip)]
    pub(crate) work_started: Option<WorkStart>,
}

impl TimerState {
    /// Creates an idle state positioned on the first segment.
    pub fn new(first_segment: Option<&Segment>) -> Self {
        Self {
            phase: TimerPhase::Idle,
            current_index: 0,
            remaining_seconds: first_segment.map_or(0, Segment::seconds),
            completed_segments: BTreeSet::new(),
            recording_failed: false,
            work_started: None,
        }
    }

    /// Decrements the countdown by one second.
    ///
    /// Returns true if the current segment has completed (reached 0).
    pub fn tick(&mut self) -> bool {
        if self.remaining_seconds > 0 {
            self.remaining_seconds -= 1;
        }
        self.remaining_seconds == 0
    }

    /// Returns true if the timer is counting down.
    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    /// Returns true if the timer is paused.
    pub fn is_paused(&self) -> bool {
        self.phase == TimerPhase::Paused
    }

    /// Returns true once every segment has been traversed.
    pub fn is_finished(&self) -> bool {
        self.phase == TimerPhase::Finished
    }

    /// Returns true if segment `index` has been completed or skipped.
    pub fn is_completed(&self, index: usize) -> bool {
        self.completed_segments.contains(&index)
    }
}

impl PartialEq for TimerState {
    fn eq(&self, other: &Self) -> bool {
        self.phase == other.phase
            && self.current_index == other.current_index
            && self.remaining_seconds == other.remaining_seconds
            && self.completed_segments == other.completed_segments
            && self.recording_failed == other.recording_failed
    }
}

// ============================================================================
// Tests
// ============================================================================
