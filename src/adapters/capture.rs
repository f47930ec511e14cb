//! Audio capture sources.
//!
//! The form treats a recording as opaque bytes in a PCM WAV container. On
//! the command line the "recorder" is a file written by whatever tool the
//! user records with. The file is parsed only to check its format; the bytes
//! are uploaded unchanged.

use std::collections::VecDeque;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavReader, WavSpec};
use thiserror::Error;
use tracing::debug;

use super::AudioCapture;

/// Errors from opening a capture source
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Failed to read recording {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Recording {path} is not a readable WAV file: {source}")]
    NotWav {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("Recording {path} is not PCM ({format:?} samples)")]
    NotPcm { path: PathBuf, format: SampleFormat },
}

/// Parse the WAV header of `bytes` and return its format
pub fn wav_spec(bytes: &[u8]) -> Result<WavSpec, hound::Error> {
    WavReader::new(Cursor::new(bytes)).map(|reader| reader.spec())
}

/// A recording loaded from a WAV file on disk; yields it once
#[derive(Debug)]
pub struct WavFileCapture {
    path: PathBuf,
    spec: WavSpec,
    pending: Option<Vec<u8>>,
}

impl WavFileCapture {
    /// Read a WAV file and require integer PCM samples
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CaptureError> {
        let path = path.as_ref().to_path_buf();
        let bytes = std::fs::read(&path).map_err(|source| CaptureError::Io {
            path: path.clone(),
            source,
        })?;

        let spec = match wav_spec(&bytes) {
            Ok(spec) => spec,
            Err(source) => return Err(CaptureError::NotWav { path, source }),
        };
        if spec.sample_format != SampleFormat::Int {
            return Err(CaptureError::NotPcm {
                path,
                format: spec.sample_format,
            });
        }

        debug!(
            path = %path.display(),
            bytes = bytes.len(),
            channels = spec.channels,
            sample_rate = spec.sample_rate,
            bits = spec.bits_per_sample,
            "Loaded recording"
        );
        Ok(Self {
            path,
            spec,
            pending: Some(bytes),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn spec(&self) -> WavSpec {
        self.spec
    }
}

impl AudioCapture for WavFileCapture {
    fn poll(&mut self) -> Option<Vec<u8>> {
        self.pending.take()
    }
}

/// In-memory capture, one queued recording per `push`
#[derive(Debug, Default)]
pub struct MemoryCapture {
    queue: VecDeque<Vec<u8>>,
}

impl MemoryCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a recording for the next poll
    pub fn push(&mut self, bytes: Vec<u8>) {
        self.queue.push_back(bytes);
    }
}

impl AudioCapture for MemoryCapture {
    fn poll(&mut self) -> Option<Vec<u8>> {
        self.queue.pop_front()
    }
}
