//! Persistence of completed work segments.
//!
//! [`SegmentRecorder`] is a [`SessionObserver`] that turns every completed
//! work segment into a [`WorkSegmentRecord`] and hands it to a
//! [`PersistenceGateway`]. Failures go to an [`ErrorReporter`] and are
//! returned to the engine, which flags them and moves on.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{DayPlan, SegmentKind};

use super::error::RecordError;
use super::observer::{SegmentCompleted, SessionObserver, WorkSegmentStarted};

// ============================================================================
// Records
// ============================================================================

/// One persisted work segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkSegmentRecord {
    pub user_id: String,
    pub plan_id: String,
    pub day_id: String,
    pub segment_index: usize,
    pub segment_type: SegmentKind,
    pub planned_minutes: u32,
    pub actual_seconds: u64,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

/// Identifies whose session, and which day of which plan, is being recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub user_id: String,
    pub plan_id: String,
    pub day_id: String,
}

impl SessionContext {
    /// Creates a context for `day` of plan `plan_id`.
    pub fn for_day(user_id: impl Into<String>, plan_id: impl Into<String>, day: &DayPlan) -> Self {
        Self {
            user_id: user_id.into(),
            plan_id: plan_id.into(),
            day_id: day.day_id(),
        }
    }

    fn record(&self, event: &SegmentCompleted) -> WorkSegmentRecord {
        WorkSegmentRecord {
            user_id: self.user_id.clone(),
            plan_id: self.plan_id.clone(),
            day_id: self.day_id.clone(),
            segment_index: event.index,
            segment_type: event.segment.kind,
            planned_minutes: event.planned_minutes,
            actual_seconds: event.actual_seconds,
            started_at: event.started_at,
            ended_at: event.ended_at,
        }
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Storage backend for completed work segments.
pub trait PersistenceGateway: Send + Sync {
    /// Stores one record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record could not be stored.
    fn record_completed_work_segment(&self, record: &WorkSegmentRecord)
        -> Result<(), RecordError>;
}

/// Sink for recording failures.
pub trait ErrorReporter: Send + Sync {
    /// Reports a failure to store `record`.
    fn report(&self, error: &RecordError, record: &WorkSegmentRecord);
}

/// Reports failures as `tracing` errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingErrorReporter;

impl ErrorReporter for TracingErrorReporter {
    fn report(&self, error: &RecordError, record: &WorkSegmentRecord) {
        tracing::error!(
            day_id = %record.day_id,
            segment_index = record.segment_index,
            error = %error,
            "failed to record work segment"
        );
    }
}

// ============================================================================
// SegmentRecorder
// ============================================================================

/// Observer persisting completed work segments.
///
/// An optional inner observer receives every signal first, so a display
/// channel and persistence can share one engine.
pub struct SegmentRecorder {
    context: SessionContext,
    gateway: Arc<dyn PersistenceGateway>,
    reporter: Arc<dyn ErrorReporter>,
    inner: Option<Box<dyn SessionObserver>>,
}

impl SegmentRecorder {
    pub fn new(
        context: SessionContext,
        gateway: Arc<dyn PersistenceGateway>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self {
            context,
            gateway,
            reporter,
            inner: None,
        }
    }

    /// Forwards every signal to `inner` as well.
    #[must_use]
    pub fn with_inner(mut self, inner: Box<dyn SessionObserver>) -> Self {
        self.inner = Some(inner);
        self
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }
}

impl SessionObserver for SegmentRecorder {
    fn on_work_segment_start(&mut self, event: &WorkSegmentStarted) {
        if let Some(inner) = self.inner.as_mut() {
            inner.on_work_segment_start(event);
        }
    }

    fn on_segment_complete(&mut self, event: &SegmentCompleted) -> Result<(), RecordError> {
        let inner_result = match self.inner.as_mut() {
            Some(inner) => inner.on_segment_complete(event),
            None => Ok(()),
        };

        if !event.segment.is_work() {
            return inner_result;
        }

        let record = self.context.record(event);
        if let Err(e) = self.gateway.record_completed_work_segment(&record) {
            self.reporter.report(&e, &record);
            return Err(e);
        }
        tracing::debug!(
            day_id = %record.day_id,
            segment_index = record.segment_index,
            actual_seconds = record.actual_seconds,
            "work segment recorded"
        );
        inner_result
    }
}

// ============================================================================
// Mocks
// ============================================================================

/// In-memory gateway for testing.
#[derive(Debug, Default)]
pub struct MockGateway {
    records: Mutex<Vec<WorkSegmentRecord>>,
    should_fail: AtomicBool,
}

impl MockGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn records(&self) -> Vec<WorkSegmentRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn record_count(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl PersistenceGateway for MockGateway {
    fn record_completed_work_segment(
        &self,
        record: &WorkSegmentRecord,
    ) -> Result<(), RecordError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(RecordError::Rejected("Mock failure".to_string()));
        }
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }
}

/// Reporter collecting failures for testing.
#[derive(Debug, Default)]
pub struct MockErrorReporter {
    reports: Mutex<Vec<(RecordError, WorkSegmentRecord)>>,
}

impl MockErrorReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn report_count(&self) -> usize {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn reports(&self) -> Vec<(RecordError, WorkSegmentRecord)> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ErrorReporter for MockErrorReporter {
    fn report(&self, error: &RecordError, record: &WorkSegmentRecord) {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((error.clone(), record.clone()));
    }
}
