//! Tone playback using rodio.
//!
//! `RodioAudioBackend` opens one output stream per loaded tone. The tone is
//! decoded (or synthesized) once and buffered, so every `play_from_start`
//! only appends a clone of the buffer to a fresh sink.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::source::{Buffered, SineWave};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tracing::{debug, warn};

use super::error::SoundError;
use super::source::ToneSource;
use super::{AudioBackend, ToneHandle};

/// Amplitude applied to the synthesized beep.
const TONE_VOLUME: f32 = 0.25;

type ToneBuffer = Buffered<Box<dyn Source<Item = f32> + Send>>;

/// Audio backend that plays tones through the default output device.
#[derive(Debug, Default, Clone, Copy)]
pub struct RodioAudioBackend;

impl RodioAudioBackend {
    /// Creates a new backend. No device is opened until a tone is loaded.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl AudioBackend for RodioAudioBackend {
    fn load_tone(&self, source: &ToneSource) -> Result<Box<dyn ToneHandle>, SoundError> {
        Ok(Box::new(RodioToneHandle::open(source)?))
    }
}

/// A loaded tone bound to an open output stream.
pub struct RodioToneHandle {
    /// The audio output stream (must be kept alive for playback).
    output: Option<(OutputStream, OutputStreamHandle)>,
    /// Decoded tone, cloned for every playback.
    tone: ToneBuffer,
    /// Sink of the playback in progress.
    sink: Option<Sink>,
    name: String,
}

impl RodioToneHandle {
    /// Loads `source` and opens the default output device.
    ///
    /// A tone file that cannot be read or decoded falls back to the
    /// built-in beep.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no output device is
    /// available.
    pub fn open(source: &ToneSource) -> Result<Self, SoundError> {
        let (tone, name) = match decode(source) {
            Ok(tone) => (tone, source.name()),
            Err(e) if e.should_fallback_to_builtin() => {
                warn!(
                    "Failed to load tone '{}': {}, falling back to builtin beep",
                    source.name(),
                    e
                );
                let fallback = ToneSource::default();
                (decode(&fallback)?, fallback.name())
            }
            Err(e) => return Err(e),
        };

        let output = OutputStream::try_default()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        debug!("Audio output stream initialized for tone '{}'", name);

        Ok(Self {
            output: Some(output),
            tone,
            sink: None,
            name,
        })
    }
}

impl ToneHandle for RodioToneHandle {
    fn play_from_start(&mut self) -> Result<(), SoundError> {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }

        let (_, stream_handle) = self
            .output
            .as_ref()
            .ok_or_else(|| SoundError::PlaybackError("tone handle was released".to_string()))?;

        let sink =
            Sink::try_new(stream_handle).map_err(|e| SoundError::StreamError(e.to_string()))?;
        sink.append(self.tone.clone());
        self.sink = Some(sink);

        debug!("Tone '{}' playback started", self.name);
        Ok(())
    }

    fn release(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        if self.output.take().is_some() {
            debug!("Audio output stream for tone '{}' released", self.name);
        }
    }

    fn is_released(&self) -> bool {
        self.output.is_none()
    }
}

impl Drop for RodioToneHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for RodioToneHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioToneHandle")
            .field("name", &self.name)
            .field("released", &self.output.is_none())
            .finish_non_exhaustive()
    }
}

/// Decodes or synthesizes the samples of `source`.
fn decode(source: &ToneSource) -> Result<ToneBuffer, SoundError> {
    match source {
        ToneSource::Builtin {
            frequency_hz,
            duration_ms,
        } => Ok(synthesize(*frequency_hz, *duration_ms)),
        ToneSource::File { path } => decode_file(path),
    }
}

fn synthesize(frequency_hz: u32, duration_ms: u64) -> ToneBuffer {
    let beep = SineWave::new(frequency_hz as f32)
        .take_duration(Duration::from_millis(duration_ms))
        .amplify(TONE_VOLUME);
    let boxed: Box<dyn Source<Item = f32> + Send> = Box::new(beep);
    boxed.buffered()
}

fn decode_file(path: &Path) -> Result<ToneBuffer, SoundError> {
    let file = File::open(path)
        .map_err(|e| SoundError::FileNotFound(format!("{}: {}", path.display(), e)))?;

    let decoder =
        Decoder::new(BufReader::new(file)).map_err(|e| SoundError::DecodeError(e.to_string()))?;
    let boxed: Box<dyn Source<Item = f32> + Send> = Box::new(decoder.convert_samples::<f32>());
    Ok(boxed.buffered())
}
