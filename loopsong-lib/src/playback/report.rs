//! Progress reports emitted by the scheduler.

use super::scheduler::Phase;

/// Snapshot passed to the report callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Report {
    /// Emitted at the start of every tick.
    Tick { time_left: f64, phase: Phase },
    /// Looping stopped; the stream now plays once to its end.
    WindDown { position: f64 },
    /// The stop time moved. Negative `seconds` shortened the run.
    StopMoved { seconds: f64 },
    /// A single-pass stream ended before the scheduled stop.
    StreamEnded { time_left: f64 },
}
