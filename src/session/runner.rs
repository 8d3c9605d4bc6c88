//! Async driver for a [`TimerEngine`].
//!
//! A one-second ticker syncs the engine against its clock while user
//! controls arrive over a channel. Both run on the same task, so the
//! engine never sees concurrent transitions.

use std::future::Future;
use std::str::FromStr;

use tokio::sync::mpsc;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info};

use super::observer::TimerEvent;
use super::timer::{SessionControl, TimerEngine};

// ============================================================================
// SessionCommand
// ============================================================================

/// A line of user input: an engine control, or leaving the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Control(SessionControl),
    Quit,
}

impl FromStr for SessionCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let command = match s.trim().to_ascii_lowercase().as_str() {
            "start" | "g" => Self::Control(SessionControl::Start),
            "p" | "pause" => Self::Control(SessionControl::Pause),
            "r" | "resume" => Self::Control(SessionControl::Resume),
            "s" | "skip" => Self::Control(SessionControl::Skip),
            "x" | "reset" => Self::Control(SessionControl::Reset),
            "q" | "quit" | "exit" => Self::Quit,
            other => return Err(format!("unknown command '{other}' (p/r/s/x/q)")),
        };
        Ok(command)
    }
}

/// How a session loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every segment was traversed
    Completed,
    /// The user quit, input closed, or shutdown was requested
    Abandoned,
}

// ============================================================================
// run_session
// ============================================================================

/// Drives `engine` until it finishes or the session is abandoned.
///
/// An engine with no segments has nothing to play and completes at once.
///
/// Emits a [`TimerEvent::Tick`] after each sync while running, a
/// [`TimerEvent::Control`] per handled control and [`TimerEvent::Finished`]
/// at the end of the day. A dropped event receiver is ignored.
pub async fn run_session<F>(
    engine: &mut TimerEngine,
    mut commands: mpsc::UnboundedReceiver<SessionCommand>,
    events: mpsc::UnboundedSender<TimerEvent>,
    shutdown: F,
) -> RunOutcome
where
    F: Future<Output = ()>,
{
    let mut ticker = interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    info!(segments = engine.segments().len(), "session loop started");

    loop {
        if engine.state().is_finished() || engine.segments().is_empty() {
            let _ = events.send(TimerEvent::Finished);
            info!("session completed");
            return RunOutcome::Completed;
        }

        tokio::select! {
            _ = ticker.tick() => {
                engine.sync();
                if engine.state().is_running() {
                    let state = engine.state();
                    let _ = events.send(TimerEvent::Tick {
                        index: state.current_index,
                        remaining_seconds: state.remaining_seconds,
                    });
                }
            }
            command = commands.recv() => {
                match command {
                    Some(SessionCommand::Control(control)) => {
                        engine.sync();
                        let applied = engine.apply(control);
                        debug!(control = control.as_str(), applied, "control handled");
                        let _ = events.send(TimerEvent::Control {
                            control: control.as_str(),
                            applied,
                        });
                    }
                    Some(SessionCommand::Quit) => {
                        info!("session quit by user");
                        return RunOutcome::Abandoned;
                    }
                    None => {
                        info!("control input closed");
                        return RunOutcome::Abandoned;
                    }
                }
            }
            () = &mut shutdown => {
                engine.sync();
                info!("session interrupted");
                return RunOutcome::Abandoned;
            }
        }
    }
}
