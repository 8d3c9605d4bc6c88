//! Plan files and session settings.
//!
//! A plan file is a JSON object using the same camelCase keys as
//! [`PlanConfig`], with every field optional:
//!
//! ```json
//! {
//!   "startDate": "2025-01-06",
//!   "targetDailyMinutes": 180,
//!   "trainingDaysPerWeek": ["Mon", "Wed", "Fri"],
//!   "trainingDaysCount": 30
//! }
//! ```
//!
//! Command-line flags override file values; anything still missing falls
//! back to the defaults below.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::types::{PlanConfig, WeekdaySelector};

/// Default daily focus target in minutes.
pub const DEFAULT_TARGET_DAILY_MINUTES: u32 = 180;

/// Default plan length in training days when no bound is given.
pub const DEFAULT_TRAINING_DAYS: u32 = 30;

/// Default user id attached to session records.
pub const DEFAULT_USER_ID: &str = "local";

/// Directory under the home directory holding session data.
pub const DATA_DIR_NAME: &str = ".focus180";

/// File name of the session log.
pub const SESSION_LOG_FILE: &str = "sessions.jsonl";

// ============================================================================
// ConfigError
// ============================================================================

/// Errors raised while loading configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The plan file could not be read.
    #[error("cannot read plan file {}: {message}", path.display())]
    Read { path: PathBuf, message: String },

    /// The plan file is not valid JSON for a plan.
    #[error("invalid plan file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// No home directory to place the session log in.
    #[error("cannot determine home directory for the session log")]
    NoHomeDir,
}

impl ConfigError {
    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Read { .. } => "check the --config path",
            Self::Parse { .. } => {
                "plan files use camelCase keys such as startDate and targetDailyMinutes"
            }
            Self::NoHomeDir => "pass --log <path> explicitly",
        }
    }
}

// ============================================================================
// PlanFile
// ============================================================================

/// Partially specified plan, as loaded from a file or assembled from flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlanFile {
    pub start_date: Option<NaiveDate>,
    pub target_daily_minutes: Option<u32>,
    pub training_days_per_week: Option<WeekdaySelector>,
    pub starting_daily_minutes: Option<u32>,
    pub end_date: Option<NaiveDate>,
    pub training_days_count: Option<u32>,
    pub plan_id: Option<String>,
    pub user_id: Option<String>,
}

impl PlanFile {
    /// Fills missing fields with defaults.
    ///
    /// The plan starts on `today` unless a start date is set, and is bounded
    /// to [`DEFAULT_TRAINING_DAYS`] unless an end date or count is set.
    pub fn into_config(self, today: NaiveDate) -> PlanConfig {
        let mut config = PlanConfig::new(
            self.start_date.unwrap_or(today),
            self.target_daily_minutes
                .unwrap_or(DEFAULT_TARGET_DAILY_MINUTES),
            self.training_days_per_week
                .unwrap_or_else(WeekdaySelector::weekdays),
        );
        config.starting_daily_minutes = self.starting_daily_minutes;
        config.end_date = self.end_date;
        config.training_days_count = self.training_days_count;

        if config.end_date.is_none() && config.training_days_count.is_none() {
            config.training_days_count = Some(DEFAULT_TRAINING_DAYS);
        }
        config
    }
}

/// Loads a plan file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_plan_file(path: &Path) -> Result<PlanFile, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let file = serde_json::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    tracing::debug!(path = %path.display(), "plan file loaded");
    Ok(file)
}

// ============================================================================
// SessionSettings
// ============================================================================

/// Identity and storage location for recorded sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub user_id: String,
    pub plan_id: String,
    pub log_path: PathBuf,
}

impl SessionSettings {
    /// Resolves settings for `plan`.
    ///
    /// Without an explicit plan id, one is derived from the plan itself (see
    /// [`derive_plan_id`]) so every day of the same plan records under it.
    ///
    /// # Errors
    ///
    /// Returns an error if no log path is given and there is no home
    /// directory.
    pub fn resolve(
        user_id: Option<String>,
        plan_id: Option<String>,
        log_path: Option<PathBuf>,
        plan: &PlanConfig,
    ) -> Result<Self, ConfigError> {
        let log_path = match log_path {
            Some(path) => path,
            None => default_log_path()?,
        };
        Ok(Self {
            user_id: user_id.unwrap_or_else(|| DEFAULT_USER_ID.to_string()),
            plan_id: plan_id.unwrap_or_else(|| derive_plan_id(plan)),
            log_path,
        })
    }
}

/// Name-based UUID of a plan configuration.
///
/// Equal configurations give equal ids. A plan without a start date starts
/// on the day it is loaded, so it gets a new id each day.
pub fn derive_plan_id(plan: &PlanConfig) -> String {
    let name = serde_json::to_vec(plan).unwrap_or_else(|_| format!("{plan:?}").into_bytes());
    Uuid::new_v5(&Uuid::NAMESPACE_OID, &name).to_string()
}

/// Returns `~/.focus180/sessions.jsonl`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_log_path() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(DATA_DIR_NAME).join(SESSION_LOG_FILE))
        .ok_or(ConfigError::NoHomeDir)
}

#[cfg(test)]
mod tests {
    use chrono::Weekday;
    use tempfile::TempDir;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    mod plan_file_tests {
        use super::*;

        #[test]
        fn test_empty_file_uses_defaults() {
            let config = PlanFile::default().into_config(date(2025, 1, 6));

            assert_eq!(config.start_date, date(2025, 1, 6));
            assert_eq!(config.target_daily_minutes, 180);
            assert_eq!(config.training_days_per_week, WeekdaySelector::weekdays());
            assert_eq!(config.training_days_count, Some(30));
            assert_eq!(config.end_date, None);
        }

        #[test]
        fn test_end_date_suppresses_default_count() {
            let file = PlanFile {
                end_date: Some(date(2025, 2, 1)),
                ..PlanFile::default()
            };
            let config = file.into_config(date(2025, 1, 6));

            assert_eq!(config.end_date, Some(date(2025, 2, 1)));
            assert_eq!(config.training_days_count, None);
        }

        #[test]
        fn test_load_camel_case_file() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("plan.json");
            fs::write(
                &path,
                r#"{
                    "startDate": "2025-03-03",
                    "targetDailyMinutes": 120,
                    "trainingDaysPerWeek": ["Mon", "Thu"],
                    "startingDailyMinutes": 10,
                    "trainingDaysCount": 8,
                    "planId": "spring"
                }"#,
            )
            .unwrap();

            let file = load_plan_file(&path).unwrap();
            assert_eq!(file.plan_id.as_deref(), Some("spring"));

            let config = file.into_config(date(2025, 1, 1));
            assert_eq!(config.start_date, date(2025, 3, 3));
            assert_eq!(config.target_daily_minutes, 120);
            assert!(config.training_days_per_week.contains(Weekday::Thu));
            assert_eq!(config.training_days_per_week.len(), 2);
            assert_eq!(config.starting_daily_minutes, Some(10));
            assert_eq!(config.training_days_count, Some(8));
        }

        #[test]
        fn test_missing_file() {
            let dir = TempDir::new().unwrap();
            let err = load_plan_file(&dir.path().join("nope.json")).unwrap_err();
            assert!(matches!(err, ConfigError::Read { .. }));
            assert!(err.suggestion().contains("--config"));
        }

        #[test]
        fn test_invalid_file() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("plan.json");
            fs::write(&path, r#"{"targetDailyMinutes": "lots"}"#).unwrap();

            let err = load_plan_file(&path).unwrap_err();
            assert!(matches!(err, ConfigError::Parse { .. }));
            assert!(err.to_string().contains("plan.json"));
        }

        #[test]
        fn test_invalid_weekday_in_file() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("plan.json");
            fs::write(&path, r#"{"trainingDaysPerWeek": ["Funday"]}"#).unwrap();

            assert!(matches!(
                load_plan_file(&path),
                Err(ConfigError::Parse { .. })
            ));
        }
    }

    mod settings_tests {
        use super::*;

        fn plan() -> PlanConfig {
            PlanFile {
                start_date: Some(date(2025, 1, 6)),
                ..PlanFile::default()
            }
            .into_config(date(2025, 1, 6))
        }

        #[test]
        fn test_explicit_settings() {
            let settings = SessionSettings::resolve(
                Some("alice".to_string()),
                Some("plan-7".to_string()),
                Some(PathBuf::from("/tmp/log.jsonl")),
                &plan(),
            )
            .unwrap();

            assert_eq!(settings.user_id, "alice");
            assert_eq!(settings.plan_id, "plan-7");
            assert_eq!(settings.log_path, PathBuf::from("/tmp/log.jsonl"));
        }

        #[test]
        fn test_derived_plan_id_is_stable_per_plan() {
            let log = Some(PathBuf::from("a"));
            let a = SessionSettings::resolve(None, None, log.clone(), &plan()).unwrap();
            let b = SessionSettings::resolve(None, None, log.clone(), &plan()).unwrap();

            assert_eq!(a.user_id, DEFAULT_USER_ID);
            assert_eq!(a.plan_id, b.plan_id);
            assert_eq!(a.plan_id, derive_plan_id(&plan()));
            assert!(Uuid::parse_str(&a.plan_id).is_ok());

            let mut longer = plan();
            longer.training_days_count = Some(60);
            let c = SessionSettings::resolve(None, None, log, &longer).unwrap();
            assert_ne!(a.plan_id, c.plan_id);
        }

        #[test]
        fn test_default_log_path_shape() {
            if let Ok(path) = default_log_path() {
                assert!(path.ends_with(".focus180/sessions.jsonl"));
            }
        }
    }
}
