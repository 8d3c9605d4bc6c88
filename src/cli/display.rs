//! Display utilities for the focus180 CLI.
//!
//! This module provides formatted output for:
//! - Plans, single days and segment breakdowns
//! - Live session events
//! - Session history
//! - Error messages

use std::io::{self, Write};

use chrono::Datelike;

use crate::plan::{total_break_minutes, total_work_minutes, PlanSummary};
use crate::session::{RunOutcome, SessionProgress, TimerEvent};
use crate::storage::DayHistory;
use crate::types::{weekday_label, DayPlan, PlanConfig, Segment, TimerState};

/// Shown when at least one completed work segment could not be stored.
pub const RECORDING_WARNING: &str =
    "Warning: Some work sessions may not have been logged properly.";

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows the whole plan as a table.
    pub fn show_plan(config: &PlanConfig, plan: &[DayPlan]) {
        println!(
            "Focus plan: {} min/day on {}",
            config.target_daily_minutes, config.training_days_per_week
        );
        if let Some(summary) = PlanSummary::from_plan(plan) {
            println!(
                "{} training days, {} to {} ({} of focus in total)",
                summary.total_days,
                summary.first_date,
                summary.last_date,
                Self::format_minutes(summary.total_work_minutes)
            );
        }
        println!("─────────────────────────────────────────────────────────────");
        println!("{:>4}  {:<10}  {:<3}  {:>7}  Segments", "Day", "Date", "", "Focus");
        for day in plan {
            println!(
                "{:>4}  {}  {:<3}  {:>7}  {}",
                day.index,
                day.date,
                weekday_label(day.date.weekday()),
                Self::format_minutes(day.daily_target_minutes),
                Self::segment_pattern(&day.segments)
            );
        }
    }

    /// Shows how `minutes` splits into segments.
    pub fn show_segments(minutes: i64, segments: &[Segment]) {
        if segments.is_empty() {
            println!("{minutes} min: no segments");
            return;
        }
        println!(
            "{} min: {}",
            minutes,
            Self::segment_pattern(segments)
        );
        for (i, segment) in segments.iter().enumerate() {
            println!("  {:>2}. {:<5} {:>3} min", i + 1, segment.kind.as_str(), segment.minutes);
        }
        println!(
            "  work {} min, breaks {} min",
            total_work_minutes(segments),
            total_break_minutes(segments)
        );
    }

    /// Shows one training day.
    pub fn show_day(day: &DayPlan, days_remaining: usize) {
        println!(
            "Day {} · {} ({})",
            day.index,
            day.date,
            weekday_label(day.date.weekday())
        );
        println!("Focus: {}", Self::format_minutes(day.daily_target_minutes));
        println!("Segments: {}", Self::segment_pattern(&day.segments));
        println!("Training days remaining after this one: {days_remaining}");
    }

    /// Shows a note when `today` is not a training day.
    pub fn show_rest_day(next: Option<&DayPlan>) {
        println!("No training scheduled today.");
        match next {
            Some(day) => println!(
                "Next: day {} on {} ({})",
                day.index,
                day.date,
                Self::format_minutes(day.daily_target_minutes)
            ),
            None => println!("The plan has no training days left."),
        }
    }

    /// Shows a note for a training day whose ramp target is zero.
    pub fn show_no_work_day(day: &DayPlan) {
        println!(
            "Day {} · {} has no focus work scheduled. Nothing to run.",
            day.index, day.date
        );
    }

    /// Shows the header of an interactive session.
    pub fn show_session_header(day: &DayPlan, auto_started: bool) {
        println!(
            "Day {} · {} · {}",
            day.index,
            day.date,
            Self::format_minutes(day.daily_target_minutes)
        );
        println!("Segments: {}", Self::segment_pattern(&day.segments));
        if auto_started {
            println!("Controls: p pause · r resume · s skip · x reset · q quit");
        } else {
            println!("Controls: start · p pause · r resume · s skip · x reset · q quit");
        }
    }

    /// Shows one session event.
    pub fn show_event(event: &TimerEvent, segments: &[Segment]) {
        match event {
            TimerEvent::Tick {
                index,
                remaining_seconds,
            } => {
                print!("\r{}", Self::format_tick(*index, *remaining_seconds, segments));
                let _ = io::stdout().flush();
            }
            other => {
                if let Some(line) = Self::format_event(other, segments) {
                    println!("\r{line:<48}");
                }
            }
        }
    }

    /// Shows how the session ended.
    pub fn show_session_end(outcome: RunOutcome, state: &TimerState, progress: &SessionProgress) {
        println!();
        match outcome {
            RunOutcome::Completed => println!("* Day complete"),
            RunOutcome::Abandoned => println!("[] Session ended early"),
        }
        println!("{}", Self::format_progress(progress));
        if state.recording_failed {
            eprintln!("{RECORDING_WARNING}");
        }
    }

    /// Shows recorded history.
    pub fn show_history(days: &[DayHistory]) {
        if days.is_empty() {
            println!("No sessions recorded yet.");
            return;
        }
        println!("{:<24}  {:>8}  {:>9}  {:>9}", "Day", "Segments", "Planned", "Actual");
        for day in days {
            println!(
                "{:<24}  {:>8}  {:>9}  {:>9}",
                day.day_id,
                day.work_segments,
                Self::format_minutes(day.planned_minutes),
                Self::format_minutes(u32::try_from(day.actual_minutes()).unwrap_or(u32::MAX))
            );
        }
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }

    /// Formats remaining seconds as (minutes, seconds).
    fn format_time(total_seconds: u32) -> (u32, u32) {
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;
        (minutes, seconds)
    }

    /// Formats minutes as `45m` or `2h 05m`.
    pub fn format_minutes(minutes: u32) -> String {
        if minutes < 60 {
            format!("{minutes}m")
        } else {
            format!("{}h {:02}m", minutes / 60, minutes % 60)
        }
    }

    /// Formats segments compactly, e.g. `25/5/21/5/15`.
    pub fn segment_pattern(segments: &[Segment]) -> String {
        segments
            .iter()
            .map(|s| s.minutes.to_string())
            .collect::<Vec<_>>()
            .join("/")
    }

    fn work_ordinal(index: usize, segments: &[Segment]) -> (usize, usize) {
        let total = segments.iter().filter(|s| s.is_work()).count();
        let nth = segments
            .iter()
            .take(index + 1)
            .filter(|s| s.is_work())
            .count();
        (nth, total)
    }

    fn format_tick(index: usize, remaining_seconds: u32, segments: &[Segment]) -> String {
        let (minutes, seconds) = Self::format_time(remaining_seconds);
        let label = match segments.get(index) {
            Some(segment) if segment.is_work() => {
                let (nth, total) = Self::work_ordinal(index, segments);
                format!("work {nth}/{total}")
            }
            Some(_) => "break".to_string(),
            None => "done".to_string(),
        };
        format!("  [{label}] {minutes:02}:{seconds:02} remaining")
    }

    fn format_event(event: &TimerEvent, segments: &[Segment]) -> Option<String> {
        match event {
            TimerEvent::WorkSegmentStarted(started) => {
                let (nth, total) = Self::work_ordinal(started.index, segments);
                Some(format!(
                    "> Work {nth}/{total} started ({} min)",
                    started.segment.minutes
                ))
            }
            TimerEvent::SegmentCompleted(completed) => {
                let (minutes, seconds) =
                    Self::format_time(u32::try_from(completed.actual_seconds).unwrap_or(u32::MAX));
                Some(format!(
                    "* Work segment done ({} min planned, {minutes}:{seconds:02} actual)",
                    completed.planned_minutes
                ))
            }
            TimerEvent::Control { control, applied } => Some(if *applied {
                format!("  {control}")
            } else {
                format!("  cannot {control} now")
            }),
            TimerEvent::Finished => Some("* All segments finished".to_string()),
            TimerEvent::Tick { .. } => None,
        }
    }

    fn format_progress(progress: &SessionProgress) -> String {
        format!(
            "Focus completed: {} of {} ({:.0}%)",
            Self::format_minutes(progress.completed_work_minutes),
            Self::format_minutes(progress.total_work_minutes),
            progress.percent
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
