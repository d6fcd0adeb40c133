//! Speller state
//!
//! [`Speller`] is the central data structure behind the front end. It holds
//! the user's preferences, the voice catalog, the pending utterance queue and
//! the speech backend, and implements every action the front end offers.

pub mod config;

use crate::playback::{self, PlaybackScheduler, PlaybackSettings};
use crate::speech::Synth;
use crate::text::{self, SpellingMode};
use crate::voice::{VoiceCatalog, VoiceDescriptor, VoiceGender};
use crate::{locale, Result, SpellError};
use config::{Config, Theme};
use log::{debug, error, info, warn};
use std::time::{Duration, Instant};

/// User-selectable settings
///
/// Only the theme survives a restart.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Preferences {
    pub gender: VoiceGender,
    /// Selected locale tag; empty means no locale filter
    pub locale: String,
    pub mode: SpellingMode,
    pub theme: Theme,
}

/// Spells words aloud, one character at a time
pub struct Speller {
    /// Configuration loaded from ~/.spell-it.cfg
    pub config: Config,

    prefs: Preferences,

    /// Pacing and voice parameters from config
    settings: PlaybackSettings,

    /// Voices reported by the platform
    catalog: VoiceCatalog,

    /// Utterances waiting for their deadline
    scheduler: PlaybackScheduler,

    /// Speech backend; `None` when the platform has no speech synthesis
    synth: Option<Box<dyn Synth>>,
}

impl Speller {
    /// Create a speller using the platform speech backend
    ///
    /// A missing backend is not fatal here; spelling reports it later.
    pub fn new(config: Config) -> Self {
        let synth = match crate::speech::create_synth() {
            Ok(synth) => Some(synth),
            Err(e) => {
                warn!("Speech unavailable: {}", e);
                None
            }
        };
        Self::with_synth(config, synth)
    }

    /// Create a speller with an explicit speech backend
    pub fn with_synth(config: Config, synth: Option<Box<dyn Synth>>) -> Self {
        let prefs = Preferences {
            gender: config.voice(),
            locale: config.locale(),
            mode: config.mode(),
            theme: config.theme(),
        };
        let settings = config.playback();
        info!(
            "Speller initialized: voice={} mode={} locale={:?} theme={}",
            prefs.gender, prefs.mode, prefs.locale, prefs.theme
        );

        let mut speller = Self {
            config,
            prefs,
            settings,
            catalog: VoiceCatalog::new(),
            scheduler: PlaybackScheduler::new(),
            synth,
        };

        if speller.synth.is_some() {
            if let Err(e) = speller.refresh_voices() {
                warn!("Could not load voices: {}", e);
            }
        }
        speller
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    pub fn catalog(&self) -> &VoiceCatalog {
        &self.catalog
    }

    pub fn speech_supported(&self) -> bool {
        self.synth.is_some()
    }

    /// Reload voices from the platform
    ///
    /// Picks a default locale when none is selected yet. Returns true if the
    /// voice list changed.
    pub fn refresh_voices(&mut self) -> Result<bool> {
        let synth = self.synth.as_deref_mut().ok_or(SpellError::Unsupported)?;
        let changed = self.catalog.refresh(synth)?;

        if self.prefs.locale.is_empty() {
            if let Some(chosen) = locale::default_locale(&self.catalog.locales()) {
                info!("Defaulting locale to {}", chosen);
                self.prefs.locale = chosen;
            }
        }
        Ok(changed)
    }

    /// Locales offered by the voices, with display labels
    pub fn locale_options(&self) -> Vec<(String, String)> {
        self.catalog
            .locales()
            .into_iter()
            .map(|l| {
                let label = locale::format_label(&l);
                (l, label)
            })
            .collect()
    }

    /// Voice that would be used for the current preferences
    pub fn selected_voice(&self) -> Option<&VoiceDescriptor> {
        self.catalog.select(self.prefs.gender, &self.prefs.locale)
    }

    pub fn set_gender(&mut self, gender: VoiceGender) {
        debug!("Voice gender set to {}", gender);
        self.prefs.gender = gender;
    }

    /// Select a locale; an empty string clears the filter
    pub fn set_locale(&mut self, locale: &str) {
        debug!("Locale set to {:?}", locale);
        self.prefs.locale = locale.trim().to_string();
    }

    pub fn set_mode(&mut self, mode: SpellingMode) {
        debug!("Spelling mode set to {}", mode);
        self.prefs.mode = mode;
    }

    /// Switch between light and dark and persist the choice
    pub fn toggle_theme(&mut self) -> Result<Theme> {
        let theme = self.prefs.theme.toggled();
        self.prefs.theme = theme;
        self.config.set_theme(theme)?;
        info!("Theme switched to {}", theme);
        Ok(theme)
    }

    /// Spell a word typed by the user
    ///
    /// Stops any word still being spelled, then queues one utterance per
    /// character starting at `now`. Returns the number of utterances queued.
    pub fn spell(&mut self, raw: &str, now: Instant) -> Result<usize> {
        let word = text::sanitize(raw);
        if word.is_empty() {
            return Ok(0);
        }

        if self.synth.is_none() {
            return Err(SpellError::Unsupported);
        }

        self.stop()?;

        let word = text::apply_mode(&word, self.prefs.mode);
        if word.is_empty() {
            debug!("Nothing left to spell in {} mode", self.prefs.mode);
            return Ok(0);
        }

        if self.catalog.is_empty() {
            if let Err(e) = self.refresh_voices() {
                warn!("Could not load voices: {}", e);
            }
        }

        let voice = self.selected_voice();
        info!(
            "Spelling {:?} with voice {} ({})",
            word,
            voice.map(|v| v.name.as_str()).unwrap_or("none"),
            self.prefs.gender
        );

        let locale = if self.prefs.locale.is_empty() {
            voice.map(|v| v.locale.clone()).unwrap_or_default()
        } else {
            self.prefs.locale.clone()
        };

        let planned = playback::plan(&word, voice, &locale, &self.settings);
        let handles = self.scheduler.schedule(planned, now);
        Ok(handles.len())
    }

    /// Cancel every pending utterance and any speech in progress
    pub fn stop(&mut self) -> Result<()> {
        self.scheduler.cancel_all();
        if let Some(synth) = self.synth.as_deref_mut() {
            synth.cancel()?;
        }
        Ok(())
    }

    /// Send every due utterance to the synthesizer
    ///
    /// A failure on one character is logged and does not affect the rest.
    /// Returns the number of utterances dispatched.
    pub fn tick(&mut self, now: Instant) -> usize {
        let due = self.scheduler.take_due(now);
        let Some(synth) = self.synth.as_deref_mut() else {
            return 0;
        };

        let mut spoken = 0;
        for utterance in &due {
            match synth.speak(utterance) {
                Ok(()) => spoken += 1,
                Err(e) => error!("Failed to speak {:?}: {}", utterance.text, e),
            }
        }
        spoken
    }

    /// Time until the next utterance is due, if any are pending
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.scheduler.time_until_next(now)
    }

    /// Is anything still waiting to be spoken?
    pub fn is_playing(&self) -> bool {
        !self.scheduler.is_idle()
    }
}
