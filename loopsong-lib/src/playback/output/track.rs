//! Whole-track buffer with a shared transport the audio thread reads.
//!
//! The control thread moves the cursor, loop bounds and play mode through
//! atomics; [`LoopSource`] picks the changes up at the next frame.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use rodio::{Decoder, Source};

use crate::error::{DeviceSetupError, StreamControlError};
use crate::playback::stream::{PlayMode, Stream};

use super::OutputMixer;

/// Cursor and loop state shared between the control and audio threads.
#[derive(Debug)]
struct Transport {
    /// Next frame to play.
    cursor: AtomicU64,
    loop_start: AtomicU64,
    loop_end: AtomicU64,
    looping: AtomicBool,
    finished: AtomicBool,
}

impl Transport {
    fn new(frames: u64) -> Self {
        Self {
            cursor: AtomicU64::new(0),
            loop_start: AtomicU64::new(0),
            loop_end: AtomicU64::new(frames),
            looping: AtomicBool::new(false),
            finished: AtomicBool::new(false),
        }
    }

    /// Claim the next frame, wrapping at the loop end while looping.
    fn advance(&self, frames: u64) -> Option<u64> {
        loop {
            let observed = self.cursor.load(Ordering::Acquire);
            let mut frame = observed;
            if self.looping.load(Ordering::Acquire) {
                let start = self.loop_start.load(Ordering::Acquire);
                let end = self.loop_end.load(Ordering::Acquire).min(frames);
                if frame >= end && end > start {
                    frame = start;
                }
            }

            if frame >= frames {
                self.finished.store(true, Ordering::Release);
                return None;
            }

            // A seek from the control thread wins over this advance.
            if self
                .cursor
                .compare_exchange(observed, frame + 1, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return Some(frame);
            }
        }
    }
}

/// `rodio` source playing a [`TrackStream`] buffer through its transport.
pub struct LoopSource {
    samples: Arc<[f32]>,
    channels: u16,
    sample_rate: u32,
    frames: u64,
    transport: Arc<Transport>,
    frame: usize,
    channel: usize,
}

impl Iterator for LoopSource {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.channel == 0 {
            self.frame = self.transport.advance(self.frames)? as usize;
        }
        let sample = self.samples[self.frame * self.channels as usize + self.channel];
        self.channel = (self.channel + 1) % self.channels as usize;
        Some(sample)
    }
}

impl Source for LoopSource {
    fn current_span_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

/// A decoded track that can loop a window and seek while playing.
///
/// The whole track is decoded up front and held as interleaved `f32`
/// samples, roughly 21 MB per minute of 44.1 kHz stereo audio.
pub struct TrackStream {
    path: PathBuf,
    samples: Arc<[f32]>,
    channels: u16,
    sample_rate: u32,
    frames: u64,
    transport: Arc<Transport>,
    attached: bool,
}

impl TrackStream {
    /// Decode `path` into memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or decoded, or holds no
    /// audio frames.
    pub fn load(path: &Path) -> Result<Self, DeviceSetupError> {
        let file = File::open(path).map_err(|source| DeviceSetupError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let decoder =
            Decoder::new(BufReader::new(file)).map_err(|err| DeviceSetupError::Decode {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })?;

        let channels = decoder.channels();
        let sample_rate = decoder.sample_rate();
        let samples: Vec<f32> = decoder.collect();
        Self::from_samples(path, samples, channels, sample_rate)
    }

    /// Wrap already decoded interleaved samples.
    pub fn from_samples(
        path: &Path,
        samples: Vec<f32>,
        channels: u16,
        sample_rate: u32,
    ) -> Result<Self, DeviceSetupError> {
        if channels == 0 || sample_rate == 0 {
            return Err(DeviceSetupError::EmptyTrack(path.to_path_buf()));
        }
        let frames = (samples.len() / channels as usize) as u64;
        if frames == 0 {
            return Err(DeviceSetupError::EmptyTrack(path.to_path_buf()));
        }

        let mut samples = samples;
        samples.truncate(frames as usize * channels as usize);
        debug!(
            "loaded {}: {} frames, {} channel(s) at {} Hz",
            path.display(),
            frames,
            channels,
            sample_rate
        );

        Ok(Self {
            path: path.to_path_buf(),
            samples: samples.into(),
            channels,
            sample_rate,
            frames,
            transport: Arc::new(Transport::new(frames)),
            attached: false,
        })
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Build a source reading this track's buffer and transport.
    pub fn source(&self) -> LoopSource {
        LoopSource {
            samples: self.samples.clone(),
            channels: self.channels,
            sample_rate: self.sample_rate,
            frames: self.frames,
            transport: self.transport.clone(),
            frame: 0,
            channel: 0,
        }
    }

    fn to_frame(&self, seconds: f64) -> u64 {
        ((seconds * self.sample_rate as f64).round() as u64).min(self.frames)
    }
}

impl Stream for TrackStream {
    type Mixer = OutputMixer;

    fn length(&self) -> f64 {
        self.frames as f64 / self.sample_rate as f64
    }

    fn position(&self) -> f64 {
        let cursor = self.transport.cursor.load(Ordering::Acquire).min(self.frames);
        cursor as f64 / self.sample_rate as f64
    }

    fn seek(&mut self, seconds: f64) -> Result<(), StreamControlError> {
        let length = self.length();
        if !seconds.is_finite() || seconds < 0.0 || seconds > length {
            return Err(StreamControlError::Seek {
                position: seconds,
                length,
            });
        }
        self.transport
            .cursor
            .store(self.to_frame(seconds), Ordering::Release);
        Ok(())
    }

    fn set_loop_window(&mut self, start: f64, end: f64) -> Result<(), StreamControlError> {
        // An end past the track wraps at the last frame.
        let valid = start.is_finite() && end.is_finite() && start >= 0.0 && start < end;
        let (start_frame, end_frame) = (self.to_frame(start), self.to_frame(end));
        if !valid || start_frame >= end_frame {
            return Err(StreamControlError::LoopWindow {
                start,
                end,
                length: self.length(),
            });
        }

        self.transport
            .loop_start
            .store(start_frame, Ordering::Release);
        self.transport.loop_end.store(end_frame, Ordering::Release);
        Ok(())
    }

    fn set_play_mode(&mut self, mode: PlayMode) -> Result<(), StreamControlError> {
        self.transport
            .looping
            .store(mode == PlayMode::Loop, Ordering::Release);
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.attached && !self.transport.finished.load(Ordering::Acquire)
    }

    fn attach(&mut self, mixer: &OutputMixer) -> Result<(), StreamControlError> {
        if self.attached {
            return Err(StreamControlError::AlreadyAttached);
        }
        mixer.play(self.source());
        self.attached = true;
        Ok(())
    }
}

impl Drop for TrackStream {
    fn drop(&mut self) {
        debug!("released stream {}", self.path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One-second stereo ramp at 10 Hz so frames are easy to follow.
    fn track() -> TrackStream {
        let samples: Vec<f32> = (0..10).flat_map(|frame| [frame as f32, -(frame as f32)]).collect();
        TrackStream::from_samples(Path::new("ramp.wav"), samples, 2, 10).expect("track")
    }

    fn frames(source: &mut LoopSource, count: usize) -> Vec<f32> {
        source.by_ref().take(count * 2).step_by(2).collect()
    }

    #[test]
    fn plays_once_to_the_end() {
        let stream = track();
        let mut source = stream.source();
        assert_eq!(frames(&mut source, 12), (0..10).map(|f| f as f32).collect::<Vec<_>>());
        assert!(stream.transport.finished.load(Ordering::Acquire));
        assert_eq!(stream.position(), 1.0);
    }

    #[test]
    fn interleaves_channels() {
        let stream = track();
        assert_eq!((stream.channels(), stream.sample_rate()), (2, 10));
        let source = stream.source();
        let first: Vec<f32> = source.take(4).collect();
        assert_eq!(first, vec![0.0, -0.0, 1.0, -1.0]);
    }

    #[test]
    fn loops_inside_window() {
        let mut stream = track();
        stream.set_loop_window(0.2, 0.5).expect("loop window");
        stream.set_play_mode(PlayMode::Loop).expect("mode");
        let mut source = stream.source();

        assert_eq!(
            frames(&mut source, 9),
            vec![0.0, 1.0, 2.0, 3.0, 4.0, 2.0, 3.0, 4.0, 2.0]
        );
    }

    #[test]
    fn leaving_loop_plays_through_to_end() {
        let mut stream = track();
        stream.set_loop_window(0.2, 0.5).expect("loop window");
        stream.set_play_mode(PlayMode::Loop).expect("mode");
        let mut source = stream.source();
        frames(&mut source, 6);

        stream.set_loop_window(0.0, stream.length()).expect("full window");
        stream.set_play_mode(PlayMode::Once).expect("mode");
        assert_eq!(
            frames(&mut source, 10),
            vec![3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]
        );
        assert!(!stream.transport.looping.load(Ordering::Acquire));
    }

    #[test]
    fn seek_moves_cursor() {
        let mut stream = track();
        stream.seek(0.7).expect("seek");
        assert_eq!(stream.position(), 0.7);
        let mut source = stream.source();
        assert_eq!(frames(&mut source, 5), vec![7.0, 8.0, 9.0]);
    }

    #[test]
    fn rejects_invalid_requests() {
        let mut stream = track();
        assert!(stream.seek(2.0).is_err());
        assert!(stream.seek(-0.1).is_err());
        assert!(stream.set_loop_window(0.5, 0.2).is_err());
        assert!(stream.set_loop_window(1.2, 3.0).is_err());
        assert!(stream.set_loop_window(f64::NAN, 0.5).is_err());
        assert!(stream.set_loop_window(0.0, 1.0).is_ok());
    }

    #[test]
    fn loop_end_past_track_wraps_at_last_frame() {
        let mut stream = track();
        stream.set_loop_window(0.2, 1.05).expect("loop window");
        stream.set_play_mode(PlayMode::Loop).expect("mode");
        let mut source = stream.source();

        assert_eq!(
            frames(&mut source, 12),
            vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 2.0, 3.0]
        );
        assert!(!stream.transport.finished.load(Ordering::Acquire));
    }

    #[test]
    fn empty_buffer_is_rejected() {
        let result = TrackStream::from_samples(Path::new("empty.wav"), Vec::new(), 2, 44_100);
        assert!(matches!(result, Err(DeviceSetupError::EmptyTrack(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = TrackStream::load(Path::new("/nonexistent/loopsong/track.ogg"));
        assert!(matches!(result, Err(DeviceSetupError::Io { .. })));
    }

    #[test]
    fn not_playing_until_attached() {
        let stream = track();
        assert!(!stream.is_playing());
        assert_eq!(stream.length(), 1.0);
    }
}
