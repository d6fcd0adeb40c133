//! Per-character playback scheduling
//!
//! A word is spelled as a series of utterances, one per character, each due
//! at a fixed offset from the start. The event loop asks the scheduler for
//! due utterances and hands them to the synthesizer; stop clears the queue.

use crate::speech::synth::{DEFAULT_PITCH, DEFAULT_RATE};
use crate::speech::Utterance;
use crate::voice::VoiceDescriptor;
use log::debug;
use std::time::{Duration, Instant};

/// Pacing and voice parameters for a spelled word
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSettings {
    /// Gap after each spoken character
    pub letter_interval: Duration,
    /// Gap for a whitespace character
    pub space_interval: Duration,
    /// Send whitespace characters to the synthesizer too
    pub speak_whitespace: bool,
    pub rate: f32,
    pub pitch: f32,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            letter_interval: Duration::from_millis(700),
            space_interval: Duration::from_millis(1200),
            speak_whitespace: false,
            rate: DEFAULT_RATE,
            pitch: DEFAULT_PITCH,
        }
    }
}

/// An utterance and its offset from the start of playback
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledUtterance {
    pub delay: Duration,
    pub utterance: Utterance,
}

/// Split text into per-character utterances with cumulative delays
pub fn plan(
    text: &str,
    voice: Option<&VoiceDescriptor>,
    locale: &str,
    settings: &PlaybackSettings,
) -> Vec<ScheduledUtterance> {
    let mut delay = Duration::ZERO;
    let mut out = Vec::with_capacity(text.len());

    for ch in text.chars() {
        let whitespace = ch.is_whitespace();

        if !whitespace || settings.speak_whitespace {
            out.push(ScheduledUtterance {
                delay,
                utterance: Utterance {
                    text: ch.to_string(),
                    voice: voice.cloned(),
                    locale: locale.to_string(),
                    pitch: settings.pitch,
                    rate: settings.rate,
                },
            });
        }

        delay += if whitespace {
            settings.space_interval
        } else {
            settings.letter_interval
        };
    }

    out
}

/// Handle for one pending utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

struct Pending {
    handle: TimerHandle,
    due: Instant,
    utterance: Utterance,
}

/// Queue of utterances waiting for their deadline
pub struct PlaybackScheduler {
    pending: Vec<Pending>,
    next_handle: u64,
}

impl PlaybackScheduler {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_handle: 0,
        }
    }

    /// Queue a planned word, with delays measured from `start`
    pub fn schedule(&mut self, plan: Vec<ScheduledUtterance>, start: Instant) -> Vec<TimerHandle> {
        let mut handles = Vec::with_capacity(plan.len());
        for item in plan {
            let handle = TimerHandle(self.next_handle);
            self.next_handle += 1;
            self.pending.push(Pending {
                handle,
                due: start + item.delay,
                utterance: item.utterance,
            });
            handles.push(handle);
        }
        debug!("Scheduled {} utterances ({} pending)", handles.len(), self.pending.len());
        handles
    }

    /// Cancel one pending utterance; returns false if it already ran
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.handle != handle);
        self.pending.len() != before
    }

    /// Drop every pending utterance
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        if dropped > 0 {
            debug!("Cancelled {} pending utterances", dropped);
        }
        dropped
    }

    /// Remove and return every utterance due at `now`, earliest first
    pub fn take_due(&mut self, now: Instant) -> Vec<Utterance> {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if now >= self.pending[i].due {
                due.push(self.pending.remove(i));
            } else {
                i += 1;
            }
        }

        due.sort_by_key(|p| (p.due, p.handle));
        due.into_iter().map(|p| p.utterance).collect()
    }

    /// Time until the next utterance is due
    ///
    /// `None` when nothing is pending; used as the poll timeout.
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.pending
            .iter()
            .map(|p| p.due)
            .min()
            .map(|next| next.saturating_duration_since(now))
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Default for PlaybackScheduler {
    fn default() -> Self {
        Self::new()
    }
}
