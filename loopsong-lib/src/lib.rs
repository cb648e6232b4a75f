//! # Loopsong Library
//!
//! Timing controller for playing a single track for at least a requested
//! duration. The track can loop a sub-range, wind down at the end of a loop
//! pass, and fade to silence before the scheduled stop.
//!
//! The controller in [`playback::scheduler`] only talks to the
//! [`playback::stream::Stream`] and [`playback::stream::Mixer`] capabilities;
//! [`playback::output`] provides the rodio-backed implementation used by the
//! command line player.

pub mod config;
pub mod error;
pub mod playback;
pub mod timing;
