//! Locale tags: matching, display labels and the default choice
//!
//! Platforms report voice languages as BCP 47-ish tags (`en-US`, `en_GB`,
//! `pt-BR`). Labels look like `English (United States) — en-US`.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Locales tried in order when the user has not picked one
const PREFERRED_LOCALES: [&str; 2] = ["en-gb", "en-us"];

/// English display names for primary language subtags
static LANGUAGE_NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("ar", "Arabic");
    m.insert("bg", "Bulgarian");
    m.insert("bn", "Bangla");
    m.insert("ca", "Catalan");
    m.insert("cs", "Czech");
    m.insert("cy", "Welsh");
    m.insert("da", "Danish");
    m.insert("de", "German");
    m.insert("el", "Greek");
    m.insert("en", "English");
    m.insert("es", "Spanish");
    m.insert("et", "Estonian");
    m.insert("eu", "Basque");
    m.insert("fa", "Persian");
    m.insert("fi", "Finnish");
    m.insert("fil", "Filipino");
    m.insert("fr", "French");
    m.insert("ga", "Irish");
    m.insert("gl", "Galician");
    m.insert("gu", "Gujarati");
    m.insert("he", "Hebrew");
    m.insert("hi", "Hindi");
    m.insert("hr", "Croatian");
    m.insert("hu", "Hungarian");
    m.insert("id", "Indonesian");
    m.insert("is", "Icelandic");
    m.insert("it", "Italian");
    m.insert("ja", "Japanese");
    m.insert("kn", "Kannada");
    m.insert("ko", "Korean");
    m.insert("lt", "Lithuanian");
    m.insert("lv", "Latvian");
    m.insert("ml", "Malayalam");
    m.insert("mr", "Marathi");
    m.insert("ms", "Malay");
    m.insert("nb", "Norwegian Bokmål");
    m.insert("nl", "Dutch");
    m.insert("no", "Norwegian");
    m.insert("pl", "Polish");
    m.insert("pt", "Portuguese");
    m.insert("ro", "Romanian");
    m.insert("ru", "Russian");
    m.insert("sk", "Slovak");
    m.insert("sl", "Slovenian");
    m.insert("sr", "Serbian");
    m.insert("sv", "Swedish");
    m.insert("sw", "Swahili");
    m.insert("ta", "Tamil");
    m.insert("te", "Telugu");
    m.insert("th", "Thai");
    m.insert("tr", "Turkish");
    m.insert("uk", "Ukrainian");
    m.insert("ur", "Urdu");
    m.insert("vi", "Vietnamese");
    m.insert("yue", "Cantonese");
    m.insert("zh", "Chinese");
    m
});

/// English display names for region subtags
static REGION_NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("AE", "United Arab Emirates");
    m.insert("AR", "Argentina");
    m.insert("AT", "Austria");
    m.insert("AU", "Australia");
    m.insert("BE", "Belgium");
    m.insert("BG", "Bulgaria");
    m.insert("BR", "Brazil");
    m.insert("CA", "Canada");
    m.insert("CH", "Switzerland");
    m.insert("CL", "Chile");
    m.insert("CN", "China");
    m.insert("CO", "Colombia");
    m.insert("CZ", "Czechia");
    m.insert("DE", "Germany");
    m.insert("DK", "Denmark");
    m.insert("EG", "Egypt");
    m.insert("ES", "Spain");
    m.insert("FI", "Finland");
    m.insert("FR", "France");
    m.insert("GB", "United Kingdom");
    m.insert("GR", "Greece");
    m.insert("HK", "Hong Kong SAR China");
    m.insert("HU", "Hungary");
    m.insert("ID", "Indonesia");
    m.insert("IE", "Ireland");
    m.insert("IL", "Israel");
    m.insert("IN", "India");
    m.insert("IT", "Italy");
    m.insert("JP", "Japan");
    m.insert("KR", "South Korea");
    m.insert("MX", "Mexico");
    m.insert("MY", "Malaysia");
    m.insert("NG", "Nigeria");
    m.insert("NL", "Netherlands");
    m.insert("NO", "Norway");
    m.insert("NZ", "New Zealand");
    m.insert("PH", "Philippines");
    m.insert("PK", "Pakistan");
    m.insert("PL", "Poland");
    m.insert("PT", "Portugal");
    m.insert("RO", "Romania");
    m.insert("RU", "Russia");
    m.insert("SA", "Saudi Arabia");
    m.insert("SE", "Sweden");
    m.insert("SG", "Singapore");
    m.insert("SK", "Slovakia");
    m.insert("TH", "Thailand");
    m.insert("TR", "Turkey");
    m.insert("TW", "Taiwan");
    m.insert("UA", "Ukraine");
    m.insert("US", "United States");
    m.insert("VN", "Vietnam");
    m.insert("ZA", "South Africa");
    m.insert("419", "Latin America");
    m
});

/// Canonical form used for comparisons: lowercase, `-` separated
pub fn normalize(locale: &str) -> String {
    locale.trim().replace('_', "-").to_ascii_lowercase()
}

/// Do two tags name the same locale?
pub fn same_locale(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

/// Primary language subtag (`en` for `en-GB`)
pub fn language_of(locale: &str) -> String {
    normalize(locale)
        .split('-')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Do two tags share a primary language?
pub fn same_family(a: &str, b: &str) -> bool {
    let lang = language_of(a);
    !lang.is_empty() && lang == language_of(b)
}

/// Split a tag into language and optional region, rejecting malformed input
fn parse(locale: &str) -> Option<(String, Option<String>)> {
    let mut parts = locale.split(['-', '_']);
    let lang = parts.next()?;
    if !(2..=3).contains(&lang.len()) || !lang.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    let region = match parts.next() {
        None => None,
        Some(r) if r.len() == 2 && r.chars().all(|c| c.is_ascii_alphabetic()) => {
            Some(r.to_ascii_uppercase())
        }
        Some(r) if r.len() == 3 && r.chars().all(|c| c.is_ascii_digit()) => Some(r.to_string()),
        Some(_) => return None,
    };

    Some((lang.to_ascii_lowercase(), region))
}

/// Human-friendly label, e.g. `English (United States) — en-US`
///
/// Unknown codes are shown as-is; malformed tags come back unchanged.
pub fn format_label(locale: &str) -> String {
    let Some((lang, region)) = parse(locale) else {
        return locale.to_string();
    };

    let lang_name = LANGUAGE_NAMES
        .get(lang.as_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| capitalize(&lang));

    let pretty = match region {
        Some(region) => {
            let region_name = REGION_NAMES.get(region.as_str()).copied().unwrap_or(region.as_str());
            format!("{} ({})", lang_name, region_name)
        }
        None => lang_name,
    };

    format!("{} — {}", pretty, locale)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Sorted, de-duplicated list of non-empty locales
pub fn unique_sorted<'a, I>(locales: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out: Vec<String> = locales
        .into_iter()
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();
    out.sort();
    out.dedup();
    out
}

/// Pick the locale used when the user has not chosen one
///
/// British English first, then American English, then any English.
pub fn default_locale(available: &[String]) -> Option<String> {
    for preferred in PREFERRED_LOCALES {
        if let Some(found) = available.iter().find(|l| normalize(l) == preferred) {
            return Some(found.clone());
        }
    }

    available
        .iter()
        .find(|l| language_of(l) == "en")
        .cloned()
}
