//! Error types shared by the loader, output and scheduler.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to produce a loop definition from a song description file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("song file name missing")]
    MissingSong,
    #[error("loop definition [{0}] not found")]
    MissingSection(String),
}

/// Failure while acquiring the output device, mixer or track stream.
#[derive(Debug, Error)]
pub enum DeviceSetupError {
    #[error("failed to open output stream after {attempts} attempts: {reason}")]
    Output { attempts: usize, reason: String },
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },
    #[error("{0} contains no audio")]
    EmptyTrack(PathBuf),
}

/// A control request rejected by the stream.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StreamControlError {
    #[error("invalid loop window {start:.3}..{end:.3} for a {length:.3}s stream")]
    LoopWindow { start: f64, end: f64, length: f64 },
    #[error("cannot seek to {position:.3}s in a {length:.3}s stream")]
    Seek { position: f64, length: f64 },
    #[error("stream is already attached to a mixer")]
    AlreadyAttached,
}

/// Failure that prevents a playback run from starting.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error(transparent)]
    Device(#[from] DeviceSetupError),
    #[error("stream setup rejected: {0}")]
    Setup(#[from] StreamControlError),
}
