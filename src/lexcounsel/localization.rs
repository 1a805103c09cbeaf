//! String tables for the user-facing prompts the orchestrator emits.
//!
//! Supported languages are English (default), German, and Slovak. Lookups
//! fall back to English for unknown languages and to the key itself for
//! unknown keys, so a missing translation never breaks a discussion.

use lazy_static::lazy_static;
use std::collections::HashMap;

pub const SUPPORTED_LANGUAGES: [&str; 3] = ["en", "de", "sk"];

lazy_static! {
    static ref EN: HashMap<&'static str, &'static str> = vec![
        (
            "user_timeout_seconds",
            "The user could not answer within {count} seconds.",
        ),
        (
            "user_timeout_minutes",
            "The user could not answer within {count} minutes.",
        ),
        (
            "followup_prompt",
            "Do you have any other questions? Type 'finish' to end the discussion.",
        ),
        (
            "judge_review_prompt",
            "Would you like the judge to review this advice? (yes/no)",
        ),
        ("no_response", "No response generated."),
    ]
    .into_iter()
    .collect();
    static ref DE: HashMap<&'static str, &'static str> = vec![
        (
            "user_timeout_seconds",
            "Der Nutzer konnte nicht innerhalb von {count} Sekunden antworten.",
        ),
        (
            "user_timeout_minutes",
            "Der Nutzer konnte nicht innerhalb von {count} Minuten antworten.",
        ),
        (
            "followup_prompt",
            "Haben Sie weitere Fragen? Geben Sie 'finish' ein, um die Besprechung zu beenden.",
        ),
        (
            "judge_review_prompt",
            "Soll der Richter (judge) diese Empfehlung pruefen? (ja/nein)",
        ),
        ("no_response", "Keine Antwort erzeugt."),
    ]
    .into_iter()
    .collect();
    static ref SK: HashMap<&'static str, &'static str> = vec![
        (
            "user_timeout_seconds",
            "Pouzivatel nedokazal odpovedat do {count} sekund.",
        ),
        (
            "user_timeout_minutes",
            "Pouzivatel nedokazal odpovedat do {count} minut.",
        ),
        (
            "followup_prompt",
            "Mate dalsie otazky? Napiste 'finish' pre ukoncenie diskusie.",
        ),
        (
            "judge_review_prompt",
            "Chcete, aby sudca (judge) posudil toto odporucanie? (ano/nie)",
        ),
        ("no_response", "Nebola vygenerovana ziadna odpoved."),
    ]
    .into_iter()
    .collect();
}

/// Collapse a free-form language hint into one of the supported codes.
pub fn normalize_language(language: Option<&str>) -> &'static str {
    let normalized = match language {
        Some(value) => value.trim().to_lowercase(),
        None => return "en",
    };
    if normalized.is_empty() {
        return "en";
    }
    if is_slovak_language(&normalized) {
        return "sk";
    }
    if normalized.starts_with("de") || normalized == "german" || normalized == "deutsch" {
        return "de";
    }
    "en"
}

/// True for the common spellings of Slovak language hints.
pub fn is_slovak_language(language: &str) -> bool {
    let normalized = language.trim().to_lowercase();
    normalized == "sk"
        || normalized == "slk"
        || normalized == "slovak"
        || normalized == "slovencina"
        || normalized == "slovenčina"
        || normalized.starts_with("sk-")
}

/// True for the common spellings of the Slovak jurisdiction.
pub fn is_slovakia(country: &str) -> bool {
    let normalized = country.trim().to_lowercase();
    normalized == "sk"
        || normalized == "svk"
        || normalized == "slovakia"
        || normalized == "slovak republic"
}

/// Look up `key` in the table for `language`, falling back to English and
/// finally to the key itself.
pub fn translate(key: &str, language: Option<&str>) -> String {
    let table: &HashMap<&str, &str> = match normalize_language(language) {
        "de" => &DE,
        "sk" => &SK,
        _ => &EN,
    };
    table
        .get(key)
        .or_else(|| EN.get(key))
        .copied()
        .unwrap_or(key)
        .to_string()
}

/// The canonical placeholder appended when the user does not answer in time.
///
/// Whole-minute timeouts render in minutes, everything else in seconds.
pub fn user_timeout_message(language: Option<&str>, timeout_secs: f64) -> String {
    let secs = timeout_secs.max(0.0);
    if secs >= 60.0 && (secs % 60.0).abs() < f64::EPSILON {
        let minutes = (secs / 60.0) as u64;
        translate("user_timeout_minutes", language).replace("{count}", &minutes.to_string())
    } else {
        let seconds = secs.round() as u64;
        translate("user_timeout_seconds", language).replace("{count}", &seconds.to_string())
    }
}
