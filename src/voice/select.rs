//! Voice selection heuristics
//!
//! Platforms rarely say whether a voice sounds male or female, so we guess
//! from well-known voice names. The selector works through progressively
//! looser candidate pools and never hands back a voice that looks like the
//! opposite of what was asked for.

use super::{VoiceDescriptor, VoiceGender};
use crate::locale;

/// Name fragments of common male voices
const MALE_MARKERS: [&str; 12] = [
    "male", "david", "alex", "daniel", "thomas", "james", "john", "mark", "richard", "michael",
    "paul", "steve",
];

/// Name fragments of common female voices
const FEMALE_MARKERS: [&str; 13] = [
    "female", "samantha", "karen", "susan", "victoria", "kate", "zira", "hazel", "linda", "lisa",
    "maria", "nancy", "sarah",
];

/// Does the name carry a marker for the given gender?
///
/// "male" never matches inside "female".
fn name_matches(name: &str, gender: VoiceGender) -> bool {
    let name = name.to_lowercase();
    match gender {
        VoiceGender::Man => {
            let name = name.replace("female", "");
            MALE_MARKERS.iter().any(|m| name.contains(m))
        }
        VoiceGender::Woman => FEMALE_MARKERS.iter().any(|m| name.contains(m)),
    }
}

/// Does this voice look like the given gender?
///
/// True when the platform reports that gender or the name carries one of its
/// markers. A voice can look like both.
pub fn name_suggests(voice: &VoiceDescriptor, gender: VoiceGender) -> bool {
    voice.gender == Some(gender) || name_matches(&voice.name, gender)
}

/// First acceptable voice in a pool, or `None`
///
/// Prefers a voice that matches the wanted gender and not the opposite one,
/// then any voice that at least does not match the opposite gender.
fn pick_from<'a>(pool: &[&'a VoiceDescriptor], gender: VoiceGender) -> Option<&'a VoiceDescriptor> {
    let opposite = gender.opposite();

    pool.iter()
        .find(|v| name_suggests(v, gender) && !name_suggests(v, opposite))
        .or_else(|| pool.iter().find(|v| !name_suggests(v, opposite)))
        .copied()
}

/// Pick a voice for the gender and locale
///
/// Candidates are tried in this order:
/// 1. voices whose locale matches exactly (all voices when `locale` is empty)
/// 2. voices of the same language family
///
/// Returns `None` when no acceptable voice exists; the caller should then let
/// the platform use its default voice for the locale.
pub fn select_voice<'a>(
    voices: &'a [VoiceDescriptor],
    gender: VoiceGender,
    locale: &str,
) -> Option<&'a VoiceDescriptor> {
    if voices.is_empty() {
        return None;
    }

    if locale.trim().is_empty() {
        let all: Vec<&VoiceDescriptor> = voices.iter().collect();
        return pick_from(&all, gender);
    }

    let exact: Vec<&VoiceDescriptor> = voices
        .iter()
        .filter(|v| locale::same_locale(&v.locale, locale))
        .collect();
    if let Some(voice) = pick_from(&exact, gender) {
        return Some(voice);
    }

    let family: Vec<&VoiceDescriptor> = voices
        .iter()
        .filter(|v| !locale::same_locale(&v.locale, locale) && locale::same_family(&v.locale, locale))
        .collect();
    pick_from(&family, gender)
}
