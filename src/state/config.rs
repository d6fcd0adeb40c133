//! Configuration management

use crate::playback::PlaybackSettings;
use crate::text::SpellingMode;
use crate::voice::VoiceGender;
use crate::{Result, SpellError};
use ini::Ini;
use log::{debug, info, warn};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Config key holding the persisted theme
pub const THEME_KEY: &str = "theme";

/// Colour theme for the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{}'", other)),
        }
    }
}

/// Application configuration
///
/// Holds speech defaults, the static server settings and the persisted
/// theme preference.
pub struct Config {
    /// INI configuration storage
    ini: Ini,

    /// Config file path (~/.spell-it.cfg by default)
    path: PathBuf,
}

impl Config {
    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from a specific file, creating it if missing
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        debug!("Loading config from {:?}", path);

        let ini = if path.exists() {
            Ini::load_from_file(&path)
                .map_err(|e| SpellError::IniParse(format!("Failed to load config: {}", e)))?
        } else {
            info!("Config file not found, creating default");
            let default = Self::default_config();
            default
                .write_to_file(&path)
                .map_err(|e| SpellError::IniParse(format!("Failed to write config: {}", e)))?;
            default
        };

        Ok(Self { ini, path })
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        debug!("Saving config to {:?}", self.path);
        self.ini
            .write_to_file(&self.path)
            .map_err(|e| SpellError::Config(format!("Failed to save config: {}", e)))
    }

    /// Get config file path (~/.spell-it.cfg)
    fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".spell-it.cfg")
    }

    /// Expose the config file path for display
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create default configuration
    fn default_config() -> Ini {
        let mut ini = Ini::new();

        ini.with_section(Some("speech"))
            .set("voice", "man")
            .set("mode", "full")
            .set("locale", "")
            .set("rate", "0.8")
            .set("pitch", "1.0")
            .set("letter_interval_ms", "700")
            .set("space_interval_ms", "1200")
            .set("speak_whitespace", "false");

        ini.with_section(Some("preferences")).set(THEME_KEY, "light");

        ini.with_section(Some("server"))
            .set("host", "127.0.0.1")
            .set("port", "3000")
            .set("root", "dist")
            .set("base", "/");

        ini
    }

    /// Get a boolean value from config
    pub fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Get a string value from config
    pub fn get_string(&self, section: &str, key: &str, default: &str) -> String {
        self.ini
            .get_from(Some(section), key)
            .unwrap_or(default)
            .to_string()
    }

    /// Get an unsigned integer value from config
    pub fn get_u64(&self, section: &str, key: &str, default: u64) -> u64 {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Get a float value from config
    pub fn get_float(&self, section: &str, key: &str, default: f32) -> f32 {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.trim().parse().ok())
            .filter(|v: &f32| v.is_finite() && *v > 0.0)
            .unwrap_or(default)
    }

    /// Set a value in config
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        self.ini.with_section(Some(section)).set(key, value);
    }

    // Speech settings

    /// Voice gender used at start-up
    pub fn voice(&self) -> VoiceGender {
        self.get_string("speech", "voice", "man").parse().unwrap_or_default()
    }

    /// Spelling mode used at start-up
    pub fn mode(&self) -> SpellingMode {
        self.get_string("speech", "mode", "full").parse().unwrap_or_default()
    }

    /// Locale used at start-up; empty means pick one from the voices
    pub fn locale(&self) -> String {
        self.get_string("speech", "locale", "").trim().to_string()
    }

    /// Pacing and voice parameters for playback
    pub fn playback(&self) -> PlaybackSettings {
        let defaults = PlaybackSettings::default();
        PlaybackSettings {
            letter_interval: Duration::from_millis(self.get_u64(
                "speech",
                "letter_interval_ms",
                defaults.letter_interval.as_millis() as u64,
            )),
            space_interval: Duration::from_millis(self.get_u64(
                "speech",
                "space_interval_ms",
                defaults.space_interval.as_millis() as u64,
            )),
            speak_whitespace: self.get_bool("speech", "speak_whitespace", defaults.speak_whitespace),
            rate: self.get_float("speech", "rate", defaults.rate),
            pitch: self.get_float("speech", "pitch", defaults.pitch),
        }
    }

    // Persisted preferences

    /// Saved theme; anything unrecognised reads as light
    pub fn theme(&self) -> Theme {
        let raw = self.get_string("preferences", THEME_KEY, "light");
        raw.parse().unwrap_or_else(|_| {
            warn!("Ignoring unknown theme '{}'", raw);
            Theme::Light
        })
    }

    /// Store the theme and write the config file
    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.set("preferences", THEME_KEY, theme.as_str());
        self.save()
    }

    // Static server settings

    pub fn server_host(&self) -> String {
        self.get_string("server", "host", "127.0.0.1")
    }

    pub fn server_port(&self) -> u16 {
        self.ini
            .get_from(Some("server"), "port")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(3000)
    }

    pub fn server_root(&self) -> PathBuf {
        PathBuf::from(self.get_string("server", "root", "dist"))
    }

    /// URL prefix the site is published under, e.g. "/spell-it/"
    pub fn server_base(&self) -> String {
        self.get_string("server", "base", "/")
    }
}
