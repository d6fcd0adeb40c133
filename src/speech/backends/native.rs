//! Native Rust TTS backend using the tts crate
//!
//! This backend uses the `tts` crate which provides a unified interface to:
//! - Speech Dispatcher on Linux (via native bindings)
//! - AVFoundation on macOS/iOS (via native bindings)
//! - WinRT/SAPI on Windows

use crate::locale;
use crate::speech::{Synth, Utterance};
use crate::voice::{VoiceDescriptor, VoiceGender};
use crate::{Result, SpellError};
use log::{debug, error, warn};
use tts::Tts as TtsCrate;

/// Native TTS backend using the tts crate
pub struct NativeSynth {
    /// The tts crate's TTS instance
    tts: TtsCrate,

    /// Platform voices from the last `voices()` call
    platform_voices: Vec<tts::Voice>,

    /// Voice the engine started with, restored when no voice applies
    default_voice: Option<tts::Voice>,

    /// Id of the voice we last set on the engine; `None` while the default is active
    current_voice: Option<String>,

    /// Last applied rate and pitch multipliers
    rate: Option<f32>,
    pitch: Option<f32>,
}

impl NativeSynth {
    /// Create a new native TTS synthesizer
    ///
    /// Initializes the platform-appropriate TTS backend
    pub fn new() -> Result<Self> {
        debug!("Creating native TTS backend");

        let tts = TtsCrate::default()
            .map_err(|e| SpellError::Speech(format!("Failed to initialize TTS: {}", e)))?;

        let default_voice = if tts.supported_features().get_voice {
            match tts.voice() {
                Ok(voice) => voice,
                Err(e) => {
                    warn!("Could not read the default voice: {}", e);
                    None
                }
            }
        } else {
            None
        };

        debug!("Native TTS backend created successfully");

        Ok(Self {
            tts,
            platform_voices: Vec::new(),
            default_voice,
            current_voice: None,
            rate: None,
            pitch: None,
        })
    }

    fn describe(voice: &tts::Voice) -> VoiceDescriptor {
        VoiceDescriptor {
            id: voice.id(),
            name: voice.name(),
            locale: voice.language().to_string(),
            gender: voice.gender().map(|g| match g {
                tts::Gender::Male => VoiceGender::Man,
                tts::Gender::Female => VoiceGender::Woman,
            }),
        }
    }

    fn apply_voice(&mut self, utterance: &Utterance) -> Result<()> {
        if !self.tts.supported_features().voice {
            return Ok(());
        }
        if self.platform_voices.is_empty() {
            self.voices()?;
        }

        let platform: Vec<(String, String)> = self
            .platform_voices
            .iter()
            .map(|v| (v.id(), v.language().to_string()))
            .collect();

        match voice_change(&platform, self.current_voice.as_deref(), utterance) {
            VoiceChange::Keep => Ok(()),
            VoiceChange::Select(index) => {
                let Some(voice) = self.platform_voices.get(index).cloned() else {
                    return Ok(());
                };
                debug!("Selecting voice: {}", voice.name());
                self.tts
                    .set_voice(&voice)
                    .map_err(|e| SpellError::Speech(format!("Failed to set voice: {}", e)))?;
                self.current_voice = Some(voice.id());
                Ok(())
            }
            VoiceChange::Restore => {
                match self.default_voice.clone() {
                    Some(voice) => {
                        debug!("Restoring default voice: {}", voice.name());
                        self.tts.set_voice(&voice).map_err(|e| {
                            SpellError::Speech(format!("Failed to restore voice: {}", e))
                        })?;
                    }
                    None => warn!("Default voice unknown, keeping the last voice"),
                }
                self.current_voice = None;
                Ok(())
            }
        }
    }

    /// Scale a multiplier onto the platform's range around its normal value
    fn scale(normal: f32, min: f32, max: f32, factor: f32) -> f32 {
        (normal * factor).clamp(min, max)
    }

    fn apply_rate(&mut self, factor: f32) -> Result<()> {
        let tts = &mut self.tts;
        apply_cached(&mut self.rate, factor, |factor| {
            if !tts.supported_features().rate {
                warn!("Rate control not supported on this platform");
                return Ok(());
            }
            let rate = Self::scale(tts.normal_rate(), tts.min_rate(), tts.max_rate(), factor);
            tts.set_rate(rate)
                .map_err(|e| SpellError::Speech(format!("Failed to set rate: {}", e)))?;
            Ok(())
        })
    }

    fn apply_pitch(&mut self, factor: f32) -> Result<()> {
        let tts = &mut self.tts;
        apply_cached(&mut self.pitch, factor, |factor| {
            if !tts.supported_features().pitch {
                warn!("Pitch control not supported on this platform");
                return Ok(());
            }
            let pitch = Self::scale(tts.normal_pitch(), tts.min_pitch(), tts.max_pitch(), factor);
            tts.set_pitch(pitch)
                .map_err(|e| SpellError::Speech(format!("Failed to set pitch: {}", e)))?;
            Ok(())
        })
    }
}

/// Apply a multiplier through `set` unless it is already in effect
///
/// The cache only changes once `set` succeeds.
fn apply_cached(
    cached: &mut Option<f32>,
    factor: f32,
    set: impl FnOnce(f32) -> Result<()>,
) -> Result<()> {
    if *cached == Some(factor) {
        return Ok(());
    }
    set(factor)?;
    *cached = Some(factor);
    Ok(())
}

/// What to do with the engine's voice before speaking
#[derive(Debug, PartialEq, Eq)]
enum VoiceChange {
    /// The right voice is already set
    Keep,
    /// Switch to the platform voice at this index
    Select(usize),
    /// Nothing matches: go back to the engine's default voice
    Restore,
}

/// Decide the engine voice for an utterance
///
/// `platform` holds `(id, language)` for each platform voice. The chosen voice
/// wins, then the first platform voice for the utterance locale. When neither
/// exists the platform default is used.
fn voice_change(
    platform: &[(String, String)],
    current: Option<&str>,
    utterance: &Utterance,
) -> VoiceChange {
    let found = match &utterance.voice {
        Some(wanted) => platform.iter().position(|(id, _)| *id == wanted.id),
        None if !utterance.locale.is_empty() => platform
            .iter()
            .position(|(_, language)| locale::same_locale(language, &utterance.locale)),
        None => None,
    };

    match found {
        Some(index) if current == Some(platform[index].0.as_str()) => VoiceChange::Keep,
        Some(index) => VoiceChange::Select(index),
        None if current.is_some() => VoiceChange::Restore,
        None => VoiceChange::Keep,
    }
}

impl Synth for NativeSynth {
    fn voices(&mut self) -> Result<Vec<VoiceDescriptor>> {
        if !self.tts.supported_features().voice {
            debug!("Voice listing not supported on this platform");
            return Ok(Vec::new());
        }

        self.platform_voices = self
            .tts
            .voices()
            .map_err(|e| SpellError::Speech(format!("Failed to get voices: {}", e)))?;

        Ok(self.platform_voices.iter().map(Self::describe).collect())
    }

    fn speak(&mut self, utterance: &Utterance) -> Result<()> {
        if utterance.text.is_empty() {
            return Ok(());
        }

        self.apply_voice(utterance)?;
        self.apply_rate(utterance.rate)?;
        self.apply_pitch(utterance.pitch)?;

        debug!("Speaking letter: {}", utterance.text);
        self.tts.speak(utterance.text.as_str(), false).map_err(|e| {
            error!("Failed to speak: {}", e);
            SpellError::Speech(format!("Speak failed: {}", e))
        })?;

        Ok(())
    }

    fn cancel(&mut self) -> Result<()> {
        debug!("Canceling speech");
        if !self.tts.supported_features().stop {
            return Ok(());
        }
        self.tts.stop().map_err(|e| {
            error!("Failed to cancel speech: {}", e);
            SpellError::Speech(format!("Cancel failed: {}", e))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_synth() {
        // May fail without speech-dispatcher or audio (e.g. in CI)
        match NativeSynth::new() {
            Ok(_) => println!("Native TTS backend initialized successfully"),
            Err(e) => println!("TTS initialization failed (may be expected in CI): {}", e),
        }
    }

    #[test]
    fn test_scale() {
        assert_eq!(NativeSynth::scale(1.0, 0.5, 2.0, 0.8), 0.8);
        assert_eq!(NativeSynth::scale(100.0, 0.0, 200.0, 0.8), 80.0);
        assert_eq!(NativeSynth::scale(1.0, 0.5, 2.0, 0.1), 0.5);
        assert_eq!(NativeSynth::scale(1.0, 0.5, 2.0, 5.0), 2.0);
    }

    #[test]
    fn test_cache_updates_only_after_success() {
        let mut cached = None;
        let failed = apply_cached(&mut cached, 0.8, |_| {
            Err(SpellError::Speech("engine busy".to_string()))
        });
        assert!(failed.is_err());
        assert_eq!(cached, None);

        let mut calls = 0;
        apply_cached(&mut cached, 0.8, |_| {
            calls += 1;
            Ok(())
        })
        .unwrap();
        apply_cached(&mut cached, 0.8, |_| {
            calls += 1;
            Ok(())
        })
        .unwrap();
        assert_eq!(calls, 1);
        assert_eq!(cached, Some(0.8));
    }

    fn platform() -> Vec<(String, String)> {
        [("daniel", "en-GB"), ("samantha", "en-US"), ("thomas", "fr-FR")]
            .iter()
            .map(|(id, language)| (id.to_string(), language.to_string()))
            .collect()
    }

    fn utterance(voice: Option<&str>, locale: &str) -> Utterance {
        let mut utterance = Utterance::new("a");
        utterance.voice = voice.map(|id| VoiceDescriptor::new(id, locale));
        utterance.locale = locale.to_string();
        utterance
    }

    #[test]
    fn test_chosen_voice_is_selected() {
        let voices = platform();
        assert_eq!(
            voice_change(&voices, None, &utterance(Some("samantha"), "en-US")),
            VoiceChange::Select(1)
        );
        assert_eq!(
            voice_change(&voices, Some("samantha"), &utterance(Some("samantha"), "en-US")),
            VoiceChange::Keep
        );
    }

    #[test]
    fn test_locale_picks_first_platform_voice() {
        assert_eq!(
            voice_change(&platform(), Some("daniel"), &utterance(None, "fr_fr")),
            VoiceChange::Select(2)
        );
    }

    #[test]
    fn test_no_match_restores_default_voice() {
        let voices = platform();
        // A previous word left a voice on the engine
        assert_eq!(
            voice_change(&voices, Some("daniel"), &utterance(None, "ja-JP")),
            VoiceChange::Restore
        );
        assert_eq!(
            voice_change(&voices, Some("daniel"), &utterance(None, "")),
            VoiceChange::Restore
        );
        assert_eq!(
            voice_change(&voices, Some("daniel"), &utterance(Some("kyoko"), "ja-JP")),
            VoiceChange::Restore
        );
        // Already on the default
        assert_eq!(
            voice_change(&voices, None, &utterance(None, "ja-JP")),
            VoiceChange::Keep
        );
    }

    #[test]
    fn test_voices_have_locales() {
        if let Ok(mut synth) = NativeSynth::new() {
            if let Ok(voices) = synth.voices() {
                println!("Platform offers {} voices", voices.len());
            }
        }
    }
}
