//! Command definitions for the focus180 CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::config::{load_plan_file, ConfigError, PlanFile};
use crate::plan::MAX_DAY_MINUTES;
use crate::types::{WeekdaySelector, MAX_TARGET_DAILY_MINUTES};

// ============================================================================
// CLI Structure
// ============================================================================

/// focus180 - build up to long daily focus, one training day at a time
#[derive(Parser, Debug)]
#[command(
    name = "focus180",
    version,
    about = "Progressive focus-training planner and session timer",
    long_about = "Generates a day-by-day plan that ramps daily focus time up to a target,\n\
                  splits each day into work and break segments, and runs the day's session timer.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print the full training plan
    Plan(PlanCommandArgs),

    /// Show how a number of daily minutes splits into segments
    Segments {
        /// Daily focus minutes (at most one day)
        #[arg(
            allow_negative_numbers = true,
            value_parser = clap::value_parser!(i64).range(..=i64::from(MAX_DAY_MINUTES))
        )]
        minutes: i64,
    },

    /// Show the training day scheduled for today
    Today(TodayArgs),

    /// Run a day's focus session interactively
    Run(RunArgs),

    /// Summarize recorded sessions
    History(HistoryArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Plan Arguments
// ============================================================================

/// Plan configuration flags shared by `plan`, `today` and `run`.
///
/// Flags override values from `--config`.
#[derive(Args, Debug, Clone, Default)]
pub struct PlanArgs {
    /// JSON plan file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// First calendar day of the plan (YYYY-MM-DD, default: today)
    #[arg(short, long, value_name = "DATE")]
    pub start: Option<NaiveDate>,

    /// Daily focus minutes reached on the last training day (1-480)
    #[arg(
        short,
        long,
        value_name = "MINUTES",
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_TARGET_DAILY_MINUTES))
    )]
    pub target: Option<u32>,

    /// Training weekdays, e.g. "Mon,Wed,Fri", "weekdays", "daily"
    #[arg(short, long, value_name = "DAYS")]
    pub days: Option<WeekdaySelector>,

    /// Last calendar day of the plan (inclusive)
    #[arg(short, long, value_name = "DATE")]
    pub end: Option<NaiveDate>,

    /// Number of training days
    #[arg(
        short = 'n',
        long,
        value_name = "DAYS",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub count: Option<u32>,

    /// Starting daily focus minutes (0-target)
    #[arg(long, value_name = "MINUTES")]
    pub starting: Option<u32>,
}

impl PlanArgs {
    /// Loads `--config` (if any) and applies the flags on top.
    ///
    /// An explicit `--end` or `--count` replaces both bounds from the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan file cannot be loaded.
    pub fn load(&self) -> Result<PlanFile, ConfigError> {
        let mut file = match &self.config {
            Some(path) => load_plan_file(path)?,
            None => PlanFile::default(),
        };

        if self.start.is_some() {
            file.start_date = self.start;
        }
        if self.target.is_some() {
            file.target_daily_minutes = self.target;
        }
        if self.days.is_some() {
            file.training_days_per_week = self.days;
        }
        if self.starting.is_some() {
            file.starting_daily_minutes = self.starting;
        }
        if self.end.is_some() || self.count.is_some() {
            file.end_date = self.end;
            file.training_days_count = self.count;
        }
        Ok(file)
    }
}

/// Arguments for the plan command
#[derive(Args, Debug, Clone)]
pub struct PlanCommandArgs {
    #[command(flatten)]
    pub plan: PlanArgs,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the today command
#[derive(Args, Debug, Clone)]
pub struct TodayArgs {
    #[command(flatten)]
    pub plan: PlanArgs,

    /// Look up this date instead of today
    #[arg(long, value_name = "DATE")]
    pub date: Option<NaiveDate>,
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub plan: PlanArgs,

    /// Run the training day scheduled on this date (default: today)
    #[arg(long, value_name = "DATE", conflicts_with = "day")]
    pub date: Option<NaiveDate>,

    /// Run the training day with this 1-based index
    #[arg(long, value_name = "INDEX", value_parser = clap::value_parser!(u32).range(1..))]
    pub day: Option<u32>,

    /// Start immediately when the day begins with a work segment
    #[arg(short, long)]
    pub auto_start: bool,

    /// Session log file (default: ~/.focus180/sessions.jsonl)
    #[arg(short, long, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// User id attached to session records
    #[arg(long, value_name = "ID")]
    pub user: Option<String>,

    /// Plan id attached to session records (default: derived from the plan)
    #[arg(long, value_name = "ID")]
    pub plan_id: Option<String>,
}

/// Arguments for the history command
#[derive(Args, Debug, Clone)]
pub struct HistoryArgs {
    /// Session log file (default: ~/.focus180/sessions.jsonl)
    #[arg(short, long, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Print the history as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// Tests
// ============================================================================
