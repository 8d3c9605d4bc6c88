//! Focus session playback.
//!
//! [`TimerEngine`] walks one day's segments. Observers receive its signals
//! synchronously; [`SegmentRecorder`] persists completed work segments, and
//! [`run_session`] drives the engine from a tokio task.

mod clock;
mod error;
mod observer;
mod recorder;
mod runner;
mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::RecordError;
pub use observer::{
    ChannelObserver, NoopObserver, SegmentCompleted, SessionObserver, TimerEvent,
    WorkSegmentStarted,
};
pub use recorder::{
    ErrorReporter, MockErrorReporter, MockGateway, PersistenceGateway, SegmentRecorder,
    SessionContext, TracingErrorReporter, WorkSegmentRecord,
};
pub use runner::{run_session, RunOutcome, SessionCommand};
pub use timer::{SessionControl, SessionProgress, TimerEngine, TimerOptions};
