//! Speech synthesizer abstraction
//!
//! Provides a unified interface for text-to-speech across platforms.
//! The speller hands it one utterance per character.

use crate::voice::VoiceDescriptor;
use crate::{Result, SpellError};
use log::info;

/// Default speaking rate, as a multiple of the platform's normal rate
pub const DEFAULT_RATE: f32 = 0.8;

/// Default pitch, as a multiple of the platform's normal pitch
pub const DEFAULT_PITCH: f32 = 1.0;

/// One request to vocalize a single character
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    /// Text to speak (one character)
    pub text: String,
    /// Voice to use; `None` lets the platform choose
    pub voice: Option<VoiceDescriptor>,
    /// Locale tag passed along with the request, may be empty
    pub locale: String,
    /// Pitch multiplier (1.0 is normal)
    pub pitch: f32,
    /// Rate multiplier (1.0 is normal)
    pub rate: f32,
}

impl Utterance {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice: None,
            locale: String::new(),
            pitch: DEFAULT_PITCH,
            rate: DEFAULT_RATE,
        }
    }
}

/// Platform speech capability
///
/// All backends implement this. Speaking is fire-and-forget: `speak` queues
/// the utterance and returns without waiting for audio.
pub trait Synth: Send {
    /// Voices the platform currently offers
    fn voices(&mut self) -> Result<Vec<VoiceDescriptor>>;

    /// Vocalize one utterance
    fn speak(&mut self, utterance: &Utterance) -> Result<()>;

    /// Cancel/silence current speech
    fn cancel(&mut self) -> Result<()>;
}

/// Create the platform speech synthesizer
///
/// Uses the `tts` crate, which talks to Speech Dispatcher on Linux,
/// AVFoundation on macOS and WinRT/SAPI on Windows. Fails with
/// [`SpellError::Unsupported`] when the platform has no speech synthesis.
pub fn create_synth() -> Result<Box<dyn Synth>> {
    let platform = std::env::consts::OS;
    info!("Creating speech synthesizer for platform: {}", platform);

    use super::backends::native::NativeSynth;

    match NativeSynth::new() {
        Ok(synth) => {
            info!("Initialized native TTS backend");
            Ok(Box::new(synth))
        }
        Err(e) => {
            info!("Native TTS backend unavailable on '{}': {}", platform, e);
            Err(SpellError::Unsupported)
        }
    }
}
