//! Playback timing: loop windows, end policies and the tick scheduler.

pub mod output;
pub mod policy;
pub mod report;
pub mod scheduler;
pub mod stream;
pub mod window;

pub use policy::EndPolicy;
pub use report::Report;
pub use scheduler::{Outcome, Phase, ScheduleConfig, ScheduleState, Scheduler};
pub use stream::{Mixer, PlayMode, Stream};
pub use window::{PlaybackWindow, StartMode};
