//! Voice catalog and voice selection

pub mod select;

pub use select::{name_suggests, select_voice};

use crate::locale;
use crate::speech::Synth;
use crate::Result;
use log::{debug, info};
use std::fmt;
use std::str::FromStr;

/// Which kind of voice the user asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoiceGender {
    #[default]
    Man,
    Woman,
}

impl VoiceGender {
    pub fn opposite(self) -> Self {
        match self {
            VoiceGender::Man => VoiceGender::Woman,
            VoiceGender::Woman => VoiceGender::Man,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceGender::Man => "man",
            VoiceGender::Woman => "woman",
        }
    }
}

impl fmt::Display for VoiceGender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoiceGender {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "man" | "male" => Ok(VoiceGender::Man),
            "woman" | "female" => Ok(VoiceGender::Woman),
            other => Err(format!("unknown voice '{}'", other)),
        }
    }
}

/// Platform metadata for one synthetic voice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceDescriptor {
    /// Backend identifier used to select the voice again
    pub id: String,
    /// Display name, e.g. "Microsoft Zira Desktop"
    pub name: String,
    /// Locale tag as reported by the platform
    pub locale: String,
    /// Gender, when the platform reports one
    pub gender: Option<VoiceGender>,
}

impl VoiceDescriptor {
    pub fn new(name: impl Into<String>, locale: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            locale: locale.into(),
            gender: None,
        }
    }

    pub fn with_gender(mut self, gender: VoiceGender) -> Self {
        self.gender = Some(gender);
        self
    }
}

/// Voices currently offered by the platform
///
/// Read-only to the speller; replaced wholesale on refresh.
#[derive(Debug, Default)]
pub struct VoiceCatalog {
    voices: Vec<VoiceDescriptor>,
}

impl VoiceCatalog {
    pub fn new() -> Self {
        Self { voices: Vec::new() }
    }

    pub fn from_voices(voices: Vec<VoiceDescriptor>) -> Self {
        Self { voices }
    }

    /// Reload the voice list from the speech backend
    ///
    /// Returns true if the list changed.
    pub fn refresh(&mut self, synth: &mut dyn Synth) -> Result<bool> {
        let voices = synth.voices()?;
        let changed = voices != self.voices;
        if changed {
            info!("Voice catalog refreshed: {} voices", voices.len());
        } else {
            debug!("Voice catalog unchanged ({} voices)", voices.len());
        }
        self.voices = voices;
        Ok(changed)
    }

    pub fn voices(&self) -> &[VoiceDescriptor] {
        &self.voices
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    /// Distinct locales across all voices, sorted
    pub fn locales(&self) -> Vec<String> {
        locale::unique_sorted(self.voices.iter().map(|v| v.locale.as_str()))
    }

    /// Best voice for the given preferences, if any is acceptable
    pub fn select(&self, gender: VoiceGender, locale: &str) -> Option<&VoiceDescriptor> {
        select_voice(&self.voices, gender, locale)
    }
}
