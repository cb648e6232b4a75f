//! Effective loop window derived from the raw loop definition.

/// Resolved playback window for one stream, all values in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackWindow {
    pub start: f64,
    pub end: f64,
    pub seek: f64,
    pub stream_length: f64,
    /// `end - start`: one pass through the loop.
    pub loop_length: f64,
    /// `stream_length - start`: from loop start to the natural end of the track.
    pub loop_to_end: f64,
}

/// How the stream is set up before it is attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StartMode {
    /// A single pass already covers the requested time.
    Once,
    /// Loop between `start` and `end`.
    Looping { start: f64, end: f64 },
}

impl PlaybackWindow {
    /// Resolve raw loop settings against the stream length.
    ///
    /// Negative raw values are the "unset" sentinel: an unset start is the
    /// beginning of the track, an unset end is its natural end, and an unset
    /// seek means no seek.
    pub fn compute(raw_start: f64, raw_end: f64, raw_seek: f64, stream_length: f64) -> Self {
        let start = raw_start.max(0.0).min(stream_length);
        let end = if raw_end < 0.0 { stream_length } else { raw_end };
        let seek = if raw_seek <= 0.0 {
            0.0
        } else if raw_seek > stream_length {
            stream_length
        } else {
            raw_seek
        };

        Self {
            start,
            end,
            seek,
            stream_length,
            loop_length: end - start,
            loop_to_end: stream_length - start,
        }
    }

    /// Choose between a single pass and looping for a run of `target` seconds.
    pub fn start_mode(&self, target: f64) -> StartMode {
        if self.end >= target {
            StartMode::Once
        } else {
            StartMode::Looping {
                start: self.start,
                end: self.end,
            }
        }
    }

    /// The position to seek to before playback, if any.
    ///
    /// Seeks onto either boundary of the stream are treated as no seek.
    pub fn seek_point(&self) -> Option<f64> {
        if self.seek > 0.0 && self.seek < self.stream_length {
            Some(self.seek)
        } else {
            None
        }
    }
}
