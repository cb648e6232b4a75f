//! rodio-backed output: device, mixer and a loopable in-memory track.
//!
//! Acquire in order [`OutputDevice`], [`OutputMixer`], [`TrackStream`] and
//! keep them in that order on the stack; dropping releases them in reverse.

mod device;
mod track;

pub use device::{OutputDevice, OutputMixer};
pub use track::{LoopSource, TrackStream};
