//! Tick loop that drives a stream from its loop to the scheduled stop.
//!
//! Each tick the scheduler checks whether the end policy wants the loop to
//! stop, then decides the fade gain and how long to sleep. Ticks are one
//! second apart until the fade starts, a tenth of a second apart during the
//! fade, and the last sleep lands exactly on the stop time.

use log::{info, warn};

use crate::error::{PlaybackError, StreamControlError};
use crate::timing::{Clock, TimeSource};

use super::policy::EndPolicy;
use super::report::Report;
use super::stream::{Mixer, PlayMode, Stream};
use super::window::{PlaybackWindow, StartMode};

/// Sleep between ticks before the fade starts.
const COARSE_TICK_SECS: f64 = 1.0;
/// Sleep between gain updates during the fade.
const FADE_TICK_SECS: f64 = 0.1;

/// Where the stream is in its loop lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Looping,
    /// Long finish only: the stop time has been pushed out and the loop runs
    /// until the next pass can reach the end of the track.
    Extending,
    /// Single pass to the natural end of the track.
    Once,
}

/// Mutable per-run state, updated once per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleState {
    pub phase: Phase,
    pub real_stop: f64,
}

/// Inputs fixed for a playback run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleConfig {
    pub window: PlaybackWindow,
    /// Minimum play time in seconds.
    pub target: f64,
    /// Length of the closing fade in seconds.
    pub fade: f64,
    pub policy: EndPolicy,
}

/// Summary of a completed run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
    pub requested: f64,
    pub elapsed: f64,
    /// Final stop time minus the originally scheduled one.
    pub stop_adjustment: f64,
    /// The stream ran out before the scheduled stop.
    pub stream_ended: bool,
}

/// Drives one playback run.
#[derive(Debug, Clone)]
pub struct Scheduler {
    config: ScheduleConfig,
}

impl Scheduler {
    pub fn new(config: ScheduleConfig) -> Self {
        Self { config }
    }

    /// Set up `stream`, attach it to `mixer` and tick until the stop time.
    ///
    /// # Arguments
    ///
    /// * `stream` - Stream to control; must not be attached yet.
    /// * `mixer` - Gain stage the stream is attached to.
    /// * `clock` - Time source for every query and sleep.
    /// * `report` - Callback receiving progress and transition reports.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial loop setup or the attach is rejected.
    /// Rejections inside the tick loop are logged and retried.
    pub fn run<S, T>(
        &self,
        stream: &mut S,
        mixer: &S::Mixer,
        clock: &mut Clock<T>,
        report: &mut dyn FnMut(Report),
    ) -> Result<Outcome, PlaybackError>
    where
        S: Stream,
        T: TimeSource,
    {
        let ScheduleConfig { window, target, .. } = self.config;

        let phase = self.prepare(stream)?;
        if let Some(seek) = window.seek_point() {
            match stream.seek(seek) {
                Ok(()) => info!("seek: {:.2}s", seek),
                Err(err) => warn!("failed to seek: {}", err),
            }
        }

        let started = clock.now();
        let scheduled_stop = started + target;
        let mut state = ScheduleState {
            phase,
            real_stop: scheduled_stop,
        };
        stream.attach(mixer)?;

        let mut stream_ended = false;
        let mut now = clock.now();
        while now < state.real_stop {
            report(Report::Tick {
                time_left: state.real_stop - now,
                phase: state.phase,
            });
            self.apply_policy(&mut state, stream, now, report);

            let time_left = state.real_stop - now;
            if time_left > self.config.fade {
                if !stream.is_playing() {
                    report(Report::StreamEnded { time_left });
                    info!("stream finished with {:.2}s left", time_left);
                    stream_ended = true;
                    break;
                }
                clock.sleep(COARSE_TICK_SECS.min(time_left));
            } else if time_left > FADE_TICK_SECS {
                mixer.set_gain(fade_gain(time_left, self.config.fade));
                clock.sleep(FADE_TICK_SECS);
            } else {
                mixer.set_gain(fade_gain(time_left, self.config.fade));
                clock.sleep(time_left);
            }
            now = clock.now();
        }

        Ok(Outcome {
            requested: target,
            elapsed: now - started,
            stop_adjustment: state.real_stop - scheduled_stop,
            stream_ended,
        })
    }

    /// Apply the start mode. Loop setup failures are fatal; a rejected
    /// single-pass mode is not, since a fresh stream already plays once.
    fn prepare<S: Stream>(&self, stream: &mut S) -> Result<Phase, StreamControlError> {
        match self.config.window.start_mode(self.config.target) {
            StartMode::Once => {
                match stream.set_play_mode(PlayMode::Once) {
                    Ok(()) => info!("play mode: once"),
                    Err(err) => warn!("failed to set play mode: {}", err),
                }
                Ok(Phase::Once)
            }
            StartMode::Looping { start, end } => {
                stream.set_loop_window(start, end)?;
                stream.set_play_mode(PlayMode::Loop)?;
                info!("play mode: loop {:.2}s..{:.2}s", start, end);
                Ok(Phase::Looping)
            }
        }
    }

    fn apply_policy<S: Stream>(
        &self,
        state: &mut ScheduleState,
        stream: &mut S,
        now: f64,
        report: &mut dyn FnMut(Report),
    ) {
        let window = &self.config.window;
        let time_left = state.real_stop - now;

        match (self.config.policy, state.phase) {
            (EndPolicy::ShortFinish, Phase::Looping) if time_left < window.loop_to_end => {
                if self.wind_down(stream, report) {
                    state.phase = Phase::Once;
                    let natural_end = now + (window.stream_length - stream.position());
                    let real_stop = state.real_stop.min(natural_end);
                    let removed = state.real_stop - real_stop;
                    state.real_stop = real_stop;
                    report(Report::StopMoved { seconds: -removed });
                    info!("finishing early: removed {:.2}s", removed);
                }
            }
            (EndPolicy::LongFinish, Phase::Looping) if time_left < window.loop_to_end => {
                let tail = now + window.loop_to_end + (window.end - stream.position());
                let real_stop = state.real_stop.max(tail);
                let added = real_stop - state.real_stop;
                state.real_stop = real_stop;
                state.phase = Phase::Extending;
                report(Report::StopMoved { seconds: added });
                info!("extending: added {:.2}s", added);
            }
            (EndPolicy::LongFinish, Phase::Extending) if time_left < window.loop_to_end => {
                if self.wind_down(stream, report) {
                    state.phase = Phase::Once;
                }
            }
            (EndPolicy::Unspecified, Phase::Looping) if time_left < window.loop_length => {
                if self.wind_down(stream, report) {
                    state.phase = Phase::Once;
                }
            }
            _ => {}
        }
    }

    /// Switch the stream to a single pass to its natural end.
    fn wind_down<S: Stream>(&self, stream: &mut S, report: &mut dyn FnMut(Report)) -> bool {
        let length = self.config.window.stream_length;
        let applied = stream
            .set_loop_window(0.0, length)
            .and_then(|_| stream.set_play_mode(PlayMode::Once));

        match applied {
            Ok(()) => {
                let position = stream.position();
                report(Report::WindDown { position });
                info!("play mode: once from {:.2}s", position);
                true
            }
            Err(err) => {
                warn!("failed to leave loop: {}", err);
                false
            }
        }
    }
}

/// Linear fade gain for `time_left` seconds before the stop.
pub fn fade_gain(time_left: f64, fade: f64) -> f32 {
    if fade <= 0.0 {
        return 0.0;
    }
    (time_left / fade).clamp(0.0, 1.0) as f32
}
