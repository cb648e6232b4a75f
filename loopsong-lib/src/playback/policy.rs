//! What to do with the loop as the scheduled stop approaches.

use std::fmt;

/// End-of-run behaviour, fixed for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndPolicy {
    /// Stop looping once a full loop-to-end pass no longer fits and let the
    /// track finish, ending early rather than late.
    ShortFinish,
    /// Keep the schedule exactly; the fade alone ends the run.
    #[default]
    MediumFade,
    /// Extend the run so the track finishes one more pass through its tail
    /// instead of fading out mid-loop.
    LongFinish,
    /// Fallback: stop looping once a single loop pass no longer fits.
    ///
    /// Not selectable from the command line.
    Unspecified,
}

impl fmt::Display for EndPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ShortFinish => "short",
            Self::MediumFade => "medium",
            Self::LongFinish => "long",
            Self::Unspecified => "unspecified",
        };
        f.write_str(label)
    }
}
