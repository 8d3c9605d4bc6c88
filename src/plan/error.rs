//! Plan generation error types.
//!
//! Generation is all-or-nothing: any of these errors means no day plans
//! were produced.

use thiserror::Error;

/// Errors that can occur while generating a training plan.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// The configuration is malformed.
    #[error("invalid plan configuration: {0}")]
    Validation(String),

    /// The configuration is well-formed but matches no training date.
    #[error("no training days: {0}")]
    NoTrainingDays(String),
}

impl PlanError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Returns true for every configuration error.
    ///
    /// `NoTrainingDays` is a specialization of a validation failure, so this
    /// holds for both variants.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NoTrainingDays(_))
    }

    /// Returns true if no date matched the weekday selection.
    #[must_use]
    pub fn is_no_training_days(&self) -> bool {
        matches!(self, Self::NoTrainingDays(_))
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Validation(_) => "check the target minutes, dates and training days",
            Self::NoTrainingDays(_) => {
                "select more training days or move the end date further out"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlanError::Validation("End date must be after start date".to_string());
        assert!(err.to_string().contains("invalid plan configuration"));
        assert!(err.to_string().contains("End date"));

        let err = PlanError::NoTrainingDays("nothing matched".to_string());
        assert!(err.to_string().contains("nothing matched"));
    }

    #[test]
    fn test_no_training_days_is_validation() {
        assert!(PlanError::Validation("x".into()).is_validation());
        assert!(PlanError::NoTrainingDays("x".into()).is_validation());
        assert!(PlanError::NoTrainingDays("x".into()).is_no_training_days());
        assert!(!PlanError::Validation("x".into()).is_no_training_days());
    }

    #[test]
    fn test_suggestion() {
        assert!(PlanError::Validation("x".into()).suggestion().contains("target"));
        assert!(PlanError::NoTrainingDays("x".into())
            .suggestion()
            .contains("training days"));
    }
}
