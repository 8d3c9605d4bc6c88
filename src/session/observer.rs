//! Observer contract for session signals.
//!
//! The engine calls observers synchronously, inside its own transition, in
//! the order segments are traversed: every signal for segment `i` is
//! delivered before any signal for segment `i + 1`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;

use crate::types::Segment;

use super::error::RecordError;

// ============================================================================
// Signals
// ============================================================================

/// A work segment began counting down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkSegmentStarted {
    /// Segment index within the day
    pub index: usize,
    /// The segment itself
    pub segment: Segment,
    /// Wall-clock start
    pub started_at: DateTime<Utc>,
}

/// A work segment counted down to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentCompleted {
    /// Segment index within the day
    pub index: usize,
    /// The segment itself
    pub segment: Segment,
    /// Planned length in minutes
    pub planned_minutes: u32,
    /// Monotonic seconds between start and completion, pauses included
    pub actual_seconds: u64,
    /// Wall-clock start
    pub started_at: DateTime<Utc>,
    /// Wall-clock completion
    pub ended_at: DateTime<Utc>,
}

// ============================================================================
// SessionObserver
// ============================================================================

/// Receiver of engine signals.
pub trait SessionObserver: Send {
    /// Called when a work segment starts.
    fn on_work_segment_start(&mut self, event: &WorkSegmentStarted) {
        let _ = event;
    }

    /// Called when a work segment completes (never for skips or breaks).
    ///
    /// # Errors
    ///
    /// An error is logged by the engine and flagged on its state; it never
    /// rolls back or blocks the transition.
    fn on_segment_complete(&mut self, event: &SegmentCompleted) -> Result<(), RecordError> {
        let _ = event;
        Ok(())
    }
}

/// Observer that ignores every signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}

// ============================================================================
// TimerEvent / ChannelObserver
// ============================================================================

/// Events published to a session's display or other listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// A work segment started
    WorkSegmentStarted(WorkSegmentStarted),
    /// A work segment completed
    SegmentCompleted(SegmentCompleted),
    /// Countdown advanced
    Tick {
        /// Current segment index
        index: usize,
        /// Remaining seconds in that segment
        remaining_seconds: u32,
    },
    /// A control was handled
    Control {
        /// Control label
        control: &'static str,
        /// Whether it caused a transition
        applied: bool,
    },
    /// All segments traversed
    Finished,
}

/// Observer that forwards signals over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<TimerEvent>,
}

impl ChannelObserver {
    /// Creates an observer sending to `tx`.
    pub fn new(tx: mpsc::UnboundedSender<TimerEvent>) -> Self {
        Self { tx }
    }

    fn forward(&self, event: TimerEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!("timer event receiver dropped");
        }
    }
}

impl SessionObserver for ChannelObserver {
    fn on_work_segment_start(&mut self, event: &WorkSegmentStarted) {
        self.forward(TimerEvent::WorkSegmentStarted(event.clone()));
    }

    fn on_segment_complete(&mut self, event: &SegmentCompleted) -> Result<(), RecordError> {
        self.forward(TimerEvent::SegmentCompleted(event.clone()));
        Ok(())
    }
}
