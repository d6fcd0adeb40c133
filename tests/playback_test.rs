//! Spelling and playback tests
//!
//! Drive the speller with a recording synthesizer and explicit clock
//! values, checking what reaches the platform and when.

mod common;

use common::{config_in, RecordingSynth};
use spell_it::state::Speller;
use spell_it::text::SpellingMode;
use spell_it::voice::{VoiceDescriptor, VoiceGender};
use spell_it::SpellError;
use std::time::{Duration, Instant};

fn later(start: Instant, ms: u64) -> Instant {
    start + Duration::from_millis(ms)
}

fn speller_with(synth: &RecordingSynth, dir: &tempfile::TempDir) -> Speller {
    Speller::with_synth(config_in(dir.path()), Some(Box::new(synth.clone())))
}

#[test]
fn test_minimal_mode_example() {
    let dir = tempfile::tempdir().unwrap();
    let synth = RecordingSynth::default();
    let mut speller = speller_with(&synth, &dir);
    speller.set_mode(SpellingMode::Minimal);

    let start = Instant::now();
    assert_eq!(speller.spell(" Hello! ", start).unwrap(), 5);
    speller.tick(later(start, 10_000));

    assert_eq!(synth.texts(), vec!["h", "e", "l", "l", "o"]);
    assert!(!speller.is_playing());
}

#[test]
fn test_letters_follow_schedule() {
    let dir = tempfile::tempdir().unwrap();
    let synth = RecordingSynth::default();
    let mut speller = speller_with(&synth, &dir);

    let start = Instant::now();
    speller.spell("Hi!", start).unwrap();

    assert_eq!(speller.tick(start), 1);
    assert_eq!(synth.texts(), vec!["H"]);

    assert_eq!(speller.tick(later(start, 699)), 0);
    assert_eq!(speller.time_until_next(later(start, 699)), Some(Duration::from_millis(1)));

    assert_eq!(speller.tick(later(start, 700)), 1);
    assert_eq!(speller.tick(later(start, 1400)), 1);
    assert_eq!(synth.texts(), vec!["H", "i", "!"]);
    assert_eq!(speller.time_until_next(later(start, 1400)), None);
}

#[test]
fn test_spaces_pause_without_speaking() {
    let dir = tempfile::tempdir().unwrap();
    let synth = RecordingSynth::default();
    let mut speller = speller_with(&synth, &dir);

    let start = Instant::now();
    assert_eq!(speller.spell("a b", start).unwrap(), 2);
    speller.tick(start);

    // "b" is due after one letter gap plus one space gap
    assert_eq!(speller.time_until_next(start), Some(Duration::from_millis(1900)));
    speller.tick(later(start, 1900));
    assert_eq!(synth.texts(), vec!["a", "b"]);
}

#[test]
fn test_stop_cancels_everything() {
    let dir = tempfile::tempdir().unwrap();
    let synth = RecordingSynth::default();
    let mut speller = speller_with(&synth, &dir);

    let start = Instant::now();
    speller.spell("abcdef", start).unwrap();
    speller.tick(start);
    let cancels_before = synth.cancel_count();

    speller.stop().unwrap();
    assert!(!speller.is_playing());
    assert_eq!(synth.cancel_count(), cancels_before + 1);

    assert_eq!(speller.tick(later(start, 60_000)), 0);
    assert_eq!(synth.texts(), vec!["a"]);
}

#[test]
fn test_replay_replaces_previous_word() {
    let dir = tempfile::tempdir().unwrap();
    let synth = RecordingSynth::default();
    let mut speller = speller_with(&synth, &dir);

    let start = Instant::now();
    speller.spell("ab", start).unwrap();
    speller.tick(start);

    let restart = later(start, 100);
    speller.spell("cd", restart).unwrap();
    speller.tick(later(restart, 10_000));

    assert_eq!(synth.texts(), vec!["a", "c", "d"]);
}

#[test]
fn test_failed_letter_does_not_stop_others() {
    let dir = tempfile::tempdir().unwrap();
    let synth = RecordingSynth {
        fail_on: vec!["b".to_string()],
        ..Default::default()
    };
    let mut speller = speller_with(&synth, &dir);

    let start = Instant::now();
    speller.spell("abc", start).unwrap();
    assert_eq!(speller.tick(later(start, 10_000)), 2);
    assert_eq!(synth.texts(), vec!["a", "c"]);
}

#[test]
fn test_unsupported_speech() {
    let dir = tempfile::tempdir().unwrap();
    let mut speller = Speller::with_synth(config_in(dir.path()), None);

    assert!(!speller.speech_supported());
    assert!(matches!(
        speller.spell("hello", Instant::now()),
        Err(SpellError::Unsupported)
    ));
    // Blank input never reaches the speech check
    assert_eq!(speller.spell("   ", Instant::now()).unwrap(), 0);
    assert!(speller.stop().is_ok());
}

#[test]
fn test_blank_input_keeps_current_playback() {
    let dir = tempfile::tempdir().unwrap();
    let synth = RecordingSynth::default();
    let mut speller = speller_with(&synth, &dir);

    let start = Instant::now();
    speller.spell("ab", start).unwrap();
    assert_eq!(speller.spell("\t\n", start).unwrap(), 0);
    assert!(speller.is_playing());
}

#[test]
fn test_voice_and_locale_reach_platform() {
    let dir = tempfile::tempdir().unwrap();
    let synth = RecordingSynth::with_voices(vec![
        VoiceDescriptor::new("Daniel", "en-GB"),
        VoiceDescriptor::new("Samantha", "en-US"),
        VoiceDescriptor::new("Thomas", "fr-FR"),
    ]);
    let mut speller = speller_with(&synth, &dir);

    // British English is preferred when nothing was chosen
    assert_eq!(speller.preferences().locale, "en-GB");

    let start = Instant::now();
    speller.spell("a", start).unwrap();
    speller.tick(start);

    let spoken = synth.utterances();
    assert_eq!(spoken[0].voice.as_ref().unwrap().name, "Daniel");
    assert_eq!(spoken[0].locale, "en-GB");
    assert_eq!(spoken[0].rate, 0.8);

    // No British female voice: fall back to another English voice
    speller.set_gender(VoiceGender::Woman);
    speller.spell("b", start).unwrap();
    speller.tick(start);

    let spoken = synth.utterances();
    assert_eq!(spoken[1].voice.as_ref().unwrap().name, "Samantha");
    assert_eq!(spoken[1].locale, "en-GB");
}

#[test]
fn test_no_acceptable_voice_uses_platform_default() {
    let dir = tempfile::tempdir().unwrap();
    let synth = RecordingSynth::with_voices(vec![VoiceDescriptor::new("Zira", "en-US")]);
    let mut speller = speller_with(&synth, &dir);
    assert!(speller.selected_voice().is_none());

    let start = Instant::now();
    speller.spell("x", start).unwrap();
    speller.tick(start);

    let spoken = synth.utterances();
    assert!(spoken[0].voice.is_none());
    assert_eq!(spoken[0].locale, "en-US");
}

#[test]
fn test_locale_options_have_labels() {
    let dir = tempfile::tempdir().unwrap();
    let synth = RecordingSynth::with_voices(vec![
        VoiceDescriptor::new("Thomas", "fr-FR"),
        VoiceDescriptor::new("Daniel", "en-GB"),
    ]);
    let speller = speller_with(&synth, &dir);

    let options = speller.locale_options();
    assert_eq!(
        options,
        vec![
            ("en-GB".to_string(), "English (United Kingdom) — en-GB".to_string()),
            ("fr-FR".to_string(), "French (France) — fr-FR".to_string()),
        ]
    );
}

#[test]
fn test_cleared_locale_uses_voice_locale() {
    let dir = tempfile::tempdir().unwrap();
    let synth = RecordingSynth::with_voices(vec![
        VoiceDescriptor::new("Daniel", "en-GB"),
        VoiceDescriptor::new("Samantha", "en-US"),
        VoiceDescriptor::new("Thomas", "fr-FR"),
    ]);
    let mut speller = speller_with(&synth, &dir);
    assert_eq!(speller.preferences().locale, "en-GB");

    speller.set_locale("");
    speller.set_gender(VoiceGender::Woman);
    assert_eq!(speller.preferences().locale, "");

    let start = Instant::now();
    speller.spell("a", start).unwrap();
    speller.tick(start);

    let spoken = synth.utterances();
    assert_eq!(spoken[0].voice.as_ref().unwrap().name, "Samantha");
    assert_eq!(spoken[0].locale, "en-US");
}

#[test]
fn test_locale_without_voices_keeps_tag() {
    let dir = tempfile::tempdir().unwrap();
    let synth = RecordingSynth::with_voices(vec![
        VoiceDescriptor::new("Daniel", "en-GB"),
        VoiceDescriptor::new("Thomas", "fr-FR"),
    ]);
    let mut speller = speller_with(&synth, &dir);

    speller.set_locale(" ja-JP ");
    assert_eq!(speller.preferences().locale, "ja-JP");
    assert!(speller.selected_voice().is_none());

    let start = Instant::now();
    speller.spell("a", start).unwrap();
    speller.tick(start);

    let spoken = synth.utterances();
    assert!(spoken[0].voice.is_none());
    assert_eq!(spoken[0].locale, "ja-JP");
}
