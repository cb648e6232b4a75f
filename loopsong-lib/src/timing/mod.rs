//! Time expressions and the adjustable wall clock used by the scheduler.

pub mod clock;
pub mod duration;

pub use clock::{Clock, SystemTime, TimeSource};
pub use duration::parse_duration;
