//! Timer engine for a focus session.
//!
//! This module plays back one day's segment sequence:
//! - State transitions (Idle → Running ⇄ Paused → Finished)
//! - Countdown by explicit ticks or by monotonic clock catch-up
//! - Work-segment signals delivered to a [`SessionObserver`]
//! - Skip and reset without completion signals

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::plan::total_work_minutes;
use crate::types::{Segment, TimerPhase, TimerState, WorkStart};

use super::clock::{Clock, SystemClock};
use super::observer::{SegmentCompleted, SessionObserver, WorkSegmentStarted};

// ============================================================================
// Options / Controls
// ============================================================================

/// Construction options for a [`TimerEngine`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerOptions {
    /// Start immediately if the first segment is a work segment
    pub auto_start_first_work_segment: bool,
}

/// User-facing controls of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionControl {
    /// Begin the first segment
    Start,
    /// Suspend the countdown
    Pause,
    /// Continue a paused countdown
    Resume,
    /// Abandon the current segment and move on
    Skip,
    /// Return to the initial state
    Reset,
}

impl SessionControl {
    /// Returns the string representation of the control.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionControl::Start => "start",
            SessionControl::Pause => "pause",
            SessionControl::Resume => "resume",
            SessionControl::Skip => "skip",
            SessionControl::Reset => "reset",
        }
    }
}

// ============================================================================
// SessionProgress
// ============================================================================

/// Work completed so far in a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionProgress {
    /// Work minutes of completed (or skipped) work segments
    pub completed_work_minutes: u32,
    /// Work minutes of the whole day
    pub total_work_minutes: u32,
    /// `completed / total` as a percentage, 0 for an empty day
    pub percent: f64,
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Single-session state machine over a day's segments.
///
/// Invalid controls (e.g. `pause` while idle) are no-ops and return `false`.
///
/// Drive the countdown with either [`tick`](Self::tick) (one call per elapsed
/// second) or [`sync`](Self::sync) (reads the injected clock), not both.
pub struct TimerEngine {
    segments: Vec<Segment>,
    state: TimerState,
    observer: Box<dyn SessionObserver>,
    clock: Arc<dyn Clock>,
    last_sync: Option<Instant>,
    carry: Duration,
    /// How far behind the clock the tick being applied lies during a sync.
    lag: Duration,
}

impl TimerEngine {
    /// Creates an engine for `segments`.
    ///
    /// With `auto_start_first_work_segment` set and a work segment first,
    /// the engine is started right away.
    pub fn new(
        segments: Vec<Segment>,
        options: TimerOptions,
        observer: Box<dyn SessionObserver>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let state = TimerState::new(segments.first());
        let mut engine = Self {
            segments,
            state,
            observer,
            clock,
            last_sync: None,
            carry: Duration::ZERO,
            lag: Duration::ZERO,
        };

        if options.auto_start_first_work_segment
            && engine.segments.first().is_some_and(Segment::is_work)
        {
            engine.start();
        }
        engine
    }

    /// Creates an engine reading the system clock.
    pub fn with_system_clock(
        segments: Vec<Segment>,
        options: TimerOptions,
        observer: Box<dyn SessionObserver>,
    ) -> Self {
        Self::new(segments, options, observer, Arc::new(SystemClock))
    }

    /// Returns the segments being played.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns a reference to the current timer state.
    pub fn state(&self) -> &TimerState {
        &self.state
    }

    /// Returns the segment under the cursor, `None` once finished.
    pub fn current_segment(&self) -> Option<&Segment> {
        if self.state.is_finished() {
            return None;
        }
        self.segments.get(self.state.current_index)
    }

    /// Starts the first segment. Only valid while idle.
    pub fn start(&mut self) -> bool {
        if self.state.phase != TimerPhase::Idle || self.segments.is_empty() {
            return false;
        }

        self.state.phase = TimerPhase::Running;
        self.state.current_index = 0;
        self.state.remaining_seconds = self.segments[0].seconds();
        self.last_sync = Some(self.clock.now());
        self.carry = Duration::ZERO;
        debug!(segments = self.segments.len(), "session started");

        if self.segments[0].is_work() {
            self.begin_work(0);
        }
        true
    }

    /// Pauses the countdown. Only valid while running.
    ///
    /// Call [`sync`](Self::sync) first when clock-driven so the time elapsed
    /// so far is credited.
    pub fn pause(&mut self) -> bool {
        if !self.state.is_running() {
            return false;
        }
        self.state.phase = TimerPhase::Paused;
        self.last_sync = None;
        debug!(
            index = self.state.current_index,
            remaining = self.state.remaining_seconds,
            "session paused"
        );
        true
    }

    /// Resumes a paused countdown on the same segment.
    pub fn resume(&mut self) -> bool {
        if !self.state.is_paused() {
            return false;
        }
        self.state.phase = TimerPhase::Running;
        self.last_sync = Some(self.clock.now());
        debug!(index = self.state.current_index, "session resumed");
        true
    }

    /// Abandons the current segment and advances to the next one.
    ///
    /// The segment is marked completed but no completion signal is sent. The
    /// running/paused phase carries over to the next segment.
    pub fn skip_segment(&mut self) -> bool {
        if !self.state.phase.is_in_session() {
            return false;
        }
        debug!(index = self.state.current_index, "segment skipped");
        self.finish_current(false);
        true
    }

    /// Returns to the initial idle state, discarding all progress.
    pub fn reset(&mut self) -> bool {
        self.state = TimerState::new(self.segments.first());
        self.last_sync = None;
        self.carry = Duration::ZERO;
        debug!("session reset");
        true
    }

    /// Applies a user control.
    pub fn apply(&mut self, control: SessionControl) -> bool {
        match control {
            SessionControl::Start => self.start(),
            SessionControl::Pause => self.pause(),
            SessionControl::Resume => self.resume(),
            SessionControl::Skip => self.skip_segment(),
            SessionControl::Reset => self.reset(),
        }
    }

    /// Counts down one second. Ignored unless running.
    ///
    /// Returns true if the tick was applied.
    pub fn tick(&mut self) -> bool {
        if !self.state.is_running() {
            return false;
        }
        if self.state.tick() {
            self.finish_current(true);
        }
        true
    }

    /// Credits the monotonic time elapsed since the last sync.
    ///
    /// Whole seconds are applied as ticks, so segment boundaries behave
    /// exactly as with [`tick`](Self::tick); the sub-second remainder is
    /// carried to the next sync. Segments started or completed during a
    /// catch-up are stamped with the boundary time, not the sync time.
    /// Returns the number of ticks applied.
    pub fn sync(&mut self) -> u64 {
        if !self.state.is_running() {
            return 0;
        }

        let now = self.clock.now();
        let anchor = self.last_sync.unwrap_or(now);
        let elapsed = now.saturating_duration_since(anchor) + self.carry;
        let whole = elapsed.as_secs();
        self.carry = elapsed - Duration::from_secs(whole);
        self.last_sync = Some(now);

        let mut applied = 0;
        while applied < whole {
            self.lag = elapsed - Duration::from_secs(applied + 1);
            if !self.tick() {
                break;
            }
            applied += 1;
        }
        self.lag = Duration::ZERO;
        if !self.state.is_running() {
            self.carry = Duration::ZERO;
        }
        applied
    }

    /// Returns completed and total work minutes.
    pub fn progress(&self) -> SessionProgress {
        let total = total_work_minutes(&self.segments);
        let completed = self
            .state
            .completed_segments
            .iter()
            .filter_map(|i| self.segments.get(*i))
            .filter(|s| s.is_work())
            .map(|s| s.minutes)
            .sum();
        let percent = if total == 0 {
            0.0
        } else {
            f64::from(completed) / f64::from(total) * 100.0
        };

        SessionProgress {
            completed_work_minutes: completed,
            total_work_minutes: total,
            percent,
        }
    }

    /// Monotonic and wall time of the transition being applied.
    fn moment(&self) -> (Instant, DateTime<Utc>) {
        let now = self.clock.now();
        let wall = self.clock.wall();
        if self.lag.is_zero() {
            return (now, wall);
        }
        let lag = TimeDelta::from_std(self.lag).unwrap_or(TimeDelta::zero());
        (now.checked_sub(self.lag).unwrap_or(now), wall - lag)
    }

    fn begin_work(&mut self, index: usize) {
        let (started_instant, started_at) = self.moment();
        self.state.work_started = Some(WorkStart {
            index,
            started_at,
            started_instant,
        });

        let event = WorkSegmentStarted {
            index,
            segment: self.segments[index],
            started_at,
        };
        self.observer.on_work_segment_start(&event);
    }

    /// Marks the current segment completed, signals natural work
    /// completions, then advances or finishes.
    fn finish_current(&mut self, natural: bool) {
        let index = self.state.current_index;
        let segment = self.segments[index];
        self.state.completed_segments.insert(index);
        let work_start = self
            .state
            .work_started
            .take()
            .filter(|start| start.index == index);

        if natural && segment.is_work() {
            match work_start {
                Some(start) => self.signal_completed(index, segment, start),
                None => warn!(index, "work segment completed without a recorded start"),
            }
        }

        let next = index + 1;
        if next < self.segments.len() {
            self.state.current_index = next;
            self.state.remaining_seconds = self.segments[next].seconds();
            if self.segments[next].is_work() {
                self.begin_work(next);
            }
        } else {
            self.state.phase = TimerPhase::Finished;
            self.state.remaining_seconds = 0;
            self.last_sync = None;
            debug!("session finished");
        }
    }

    fn signal_completed(&mut self, index: usize, segment: Segment, start: WorkStart) {
        let (now, ended_at) = self.moment();
        let actual_seconds = now
            .saturating_duration_since(start.started_instant)
            .as_secs();

        let event = SegmentCompleted {
            index,
            segment,
            planned_minutes: segment.minutes,
            actual_seconds,
            started_at: start.started_at,
            ended_at,
        };

        if let Err(e) = self.observer.on_segment_complete(&event) {
            warn!(index, error = %e, "failed to record completed work segment");
            self.state.recording_failed = true;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
