//! Output device and gain stage.

use std::thread;
use std::time::Duration;

use log::{debug, warn};
use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::error::DeviceSetupError;
use crate::playback::stream::Mixer;

const OUTPUT_STREAM_OPEN_RETRIES: usize = 20;
const OUTPUT_STREAM_OPEN_RETRY_MS: u64 = 100;

/// The default audio output, held open for the whole run.
pub struct OutputDevice {
    stream: OutputStream,
}

impl OutputDevice {
    /// Open the default output stream with bounded retry behavior.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceSetupError::Output`] after all retries fail.
    pub fn open() -> Result<Self, DeviceSetupError> {
        let mut last_error = String::new();
        for attempt in 1..=OUTPUT_STREAM_OPEN_RETRIES {
            match OutputStreamBuilder::open_default_stream() {
                Ok(mut stream) => {
                    stream.log_on_drop(false);
                    debug!("opened output device on attempt {}", attempt);
                    return Ok(Self { stream });
                }
                Err(err) => {
                    warn!(
                        "open_default_stream attempt {}/{} failed: {}",
                        attempt, OUTPUT_STREAM_OPEN_RETRIES, err
                    );
                    last_error = err.to_string();
                    if attempt < OUTPUT_STREAM_OPEN_RETRIES {
                        thread::sleep(Duration::from_millis(OUTPUT_STREAM_OPEN_RETRY_MS));
                    }
                }
            }
        }

        Err(DeviceSetupError::Output {
            attempts: OUTPUT_STREAM_OPEN_RETRIES,
            reason: last_error,
        })
    }

    pub(crate) fn mixer(&self) -> &rodio::mixer::Mixer {
        self.stream.mixer()
    }
}

impl Drop for OutputDevice {
    fn drop(&mut self) {
        debug!("released output device");
    }
}

/// Gain stage between the track and the device.
pub struct OutputMixer {
    sink: Sink,
}

impl OutputMixer {
    /// Connect a paused sink to the device mixer.
    pub fn connect(device: &OutputDevice) -> Self {
        let sink = Sink::connect_new(device.mixer());
        sink.pause();
        Self { sink }
    }

    pub(crate) fn play(&self, source: super::LoopSource) {
        self.sink.append(source);
        self.sink.play();
    }
}

impl Mixer for OutputMixer {
    fn set_gain(&self, gain: f32) {
        self.sink.set_volume(gain.clamp(0.0, 1.0));
    }
}

impl Drop for OutputMixer {
    fn drop(&mut self) {
        self.sink.stop();
        debug!("released mixer");
    }
}
