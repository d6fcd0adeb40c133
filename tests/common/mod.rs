//! Shared test helpers

#![allow(dead_code)]

use spell_it::speech::{Synth, Utterance};
use spell_it::state::config::Config;
use spell_it::voice::VoiceDescriptor;
use spell_it::{Result, SpellError};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Synth that records what it was asked to say
#[derive(Clone, Default)]
pub struct RecordingSynth {
    pub spoken: Arc<Mutex<Vec<Utterance>>>,
    pub cancels: Arc<AtomicUsize>,
    pub voices: Vec<VoiceDescriptor>,
    /// Characters that fail to speak
    pub fail_on: Vec<String>,
}

impl RecordingSynth {
    pub fn with_voices(voices: Vec<VoiceDescriptor>) -> Self {
        Self {
            voices,
            ..Default::default()
        }
    }

    /// Text of every utterance spoken so far
    pub fn texts(&self) -> Vec<String> {
        self.spoken
            .lock()
            .unwrap()
            .iter()
            .map(|u| u.text.clone())
            .collect()
    }

    pub fn utterances(&self) -> Vec<Utterance> {
        self.spoken.lock().unwrap().clone()
    }

    pub fn cancel_count(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }
}

impl Synth for RecordingSynth {
    fn voices(&mut self) -> Result<Vec<VoiceDescriptor>> {
        Ok(self.voices.clone())
    }

    fn speak(&mut self, utterance: &Utterance) -> Result<()> {
        if self.fail_on.contains(&utterance.text) {
            return Err(SpellError::Speech(format!("cannot say {}", utterance.text)));
        }
        self.spoken.lock().unwrap().push(utterance.clone());
        Ok(())
    }

    fn cancel(&mut self) -> Result<()> {
        self.cancels.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Fresh config file inside `dir`
pub fn config_in(dir: &Path) -> Config {
    Config::load_from(dir.join("spell-it.cfg")).expect("Failed to create config")
}
