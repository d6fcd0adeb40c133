//! Front end command parsing
//!
//! Each line typed at the prompt is either a word to spell or a command
//! starting with `:`. A leading `::` spells text that starts with a colon.

use crate::text::SpellingMode;
use crate::voice::VoiceGender;

/// Action requested by one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Spell the given text
    Spell(String),
    Stop,
    Voice(VoiceGender),
    Mode(SpellingMode),
    /// Select a locale; empty clears the selection
    Locale(String),
    ListLocales,
    ListVoices,
    ToggleTheme,
    Help,
    Quit,
    /// Blank line
    Nothing,
    Unknown(String),
}

/// Help text listing every command
pub const HELP: &str = "\
Type a word and press Enter to hear it spelled.
  :stop          stop spelling
  :man, :woman   choose the voice
  :full          spell every character
  :minimal       spell only letters, digits and spaces
  :lang <tag>    choose a locale (no tag clears it)
  :langs         list available locales
  :voices        reload and list voices
  :theme         switch between light and dark
  :help          show this help
  :quit          exit
  ::<text>       spell text that starts with a colon (::) spells :))";

impl Command {
    /// Interpret one line of input
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Command::Nothing;
        }

        if let Some(literal) = trimmed.strip_prefix("::") {
            return Command::Spell(format!(":{}", literal));
        }

        let Some(rest) = trimmed.strip_prefix(':') else {
            return Command::Spell(line.to_string());
        };

        let mut parts = rest.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or_default().to_ascii_lowercase();
        let arg = parts.next().unwrap_or_default().trim();

        match name.as_str() {
            "stop" | "s" => Command::Stop,
            "man" => Command::Voice(VoiceGender::Man),
            "woman" => Command::Voice(VoiceGender::Woman),
            "full" => Command::Mode(SpellingMode::Full),
            "minimal" | "min" => Command::Mode(SpellingMode::Minimal),
            "lang" | "locale" => Command::Locale(arg.to_string()),
            "langs" | "locales" => Command::ListLocales,
            "voices" => Command::ListVoices,
            "theme" => Command::ToggleTheme,
            "help" | "h" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            _ => Command::Unknown(trimmed.to_string()),
        }
    }
}

/// Collects raw stdin bytes and hands back complete lines
///
/// Bytes are decoded only once a whole line has arrived, so a multi-byte
/// character split across two reads stays intact.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add bytes and return every line they complete, without line endings
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(bytes);

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.pending.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw);
            lines.push(line.trim_end_matches(['\r', '\n']).to_string());
        }
        lines
    }

    /// Bytes still waiting for a newline
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
