use std::sync::{Arc, Mutex};

use thiserror::Error;

use super::synth::AudioBuffer;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("no audio output device: {0}")]
    Device(String),
}

/// One fire-and-forget playback: source buffer through a gain stage to the output
#[derive(Debug, Clone, Copy)]
pub struct PlaybackRequest<'a> {
    pub key: &'a str,
    pub buffer: &'a AudioBuffer,
    /// Linear gain in [0, 1]
    pub gain: f32,
}

/// Audio output end of the playback chain
pub trait AudioSink {
    fn start(&self, request: PlaybackRequest<'_>);
}

/// Discards every request
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn start(&self, request: PlaybackRequest<'_>) {
        log::trace!("null sink dropped {}", request.key);
    }
}

/// A playback captured by [`MemorySink`]
#[derive(Debug, Clone, PartialEq)]
pub struct Played {
    pub key: String,
    pub gain: f32,
    pub frames: usize,
}

/// Records requests instead of playing them; clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    played: Arc<Mutex<Vec<Played>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> Vec<Played> {
        self.played
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }

    pub fn keys(&self) -> Vec<String> {
        self.played().into_iter().map(|p| p.key).collect()
    }

    pub fn clear(&self) {
        if let Ok(mut p) = self.played.lock() {
            p.clear();
        }
    }
}

impl AudioSink for MemorySink {
    fn start(&self, request: PlaybackRequest<'_>) {
        if let Ok(mut p) = self.played.lock() {
            p.push(Played {
                key: request.key.to_string(),
                gain: request.gain,
                frames: request.buffer.len(),
            });
        }
    }
}

#[cfg(feature = "audio")]
pub use rodio_sink::RodioSink;

#[cfg(feature = "audio")]
mod rodio_sink {
    use rodio::{buffer::SamplesBuffer, OutputStream, OutputStreamHandle, Source};

    use super::{AudioSink, PlaybackRequest, SinkError};

    /// Plays buffers on the default output device
    pub struct RodioSink {
        // dropping the stream stops all audio
        _stream: OutputStream,
        handle: OutputStreamHandle,
    }

    impl RodioSink {
        pub fn open_default() -> Result<Self, SinkError> {
            let (stream, handle) =
                OutputStream::try_default().map_err(|e| SinkError::Device(e.to_string()))?;
            Ok(Self {
                _stream: stream,
                handle,
            })
        }
    }

    impl AudioSink for RodioSink {
        fn start(&self, request: PlaybackRequest<'_>) {
            let source = SamplesBuffer::new(
                1,
                request.buffer.sample_rate(),
                request.buffer.samples().to_vec(),
            )
            .amplify(request.gain);

            if let Err(e) = self.handle.play_raw(source) {
                log::warn!("failed to play {}: {e}", request.key);
            }
        }
    }
}
