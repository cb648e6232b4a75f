//! Capabilities the scheduler needs from the audio backend.

use crate::error::StreamControlError;

/// Whether the stream repeats its loop window or plays through once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayMode {
    Loop,
    Once,
}

/// Gain stage the stream plays through.
pub trait Mixer {
    /// Set the output gain, `0.0..=1.0`.
    fn set_gain(&self, gain: f32);
}

/// A seekable, loopable audio stream.
pub trait Stream {
    type Mixer: Mixer;

    /// Total length in seconds.
    fn length(&self) -> f64;

    /// Current play position in seconds.
    fn position(&self) -> f64;

    fn seek(&mut self, seconds: f64) -> Result<(), StreamControlError>;

    fn set_loop_window(&mut self, start: f64, end: f64) -> Result<(), StreamControlError>;

    fn set_play_mode(&mut self, mode: PlayMode) -> Result<(), StreamControlError>;

    /// False once a single-pass stream has reached its end.
    fn is_playing(&self) -> bool;

    /// Start feeding the stream into `mixer`.
    fn attach(&mut self, mixer: &Self::Mixer) -> Result<(), StreamControlError>;
}
