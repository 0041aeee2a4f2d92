//! Safety filter for generated tip text
//!
//! Deny-list scan over the full generated text. Matching is substring-based
//! rather than tokenized, so a banned word inside a longer word also
//! triggers ("Manipulationsschutz" contains "manipulation"). Over-blocking
//! is intentional.

/// Multi-word phrases that must never reach the user (German, lowercase)
const BANNED_PHRASES: [&str; 8] = [
    "hauptschalter ausschalten",
    "stromzähler manipulieren",
    "sicherungen entfernen",
    "elektrische anlage öffnen",
    "kabel durchtrennen",
    "elektrische installation",
    "verkabelung ändern",
    "sicherung überbrücken",
];

/// Single words that must never reach the user (German, lowercase)
const BANNED_WORDS: [&str; 4] = ["hochspannung", "starkstrom", "manipulation", "überbrücken"];

/// Replacement text when unsafe content is detected
pub const SAFE_FALLBACK_TEXT: &str =
    "Keine genauen Angaben möglich; unsichere Empfehlung erkannt. Hier sind bewährte allgemeine Tipps.";

/// Outcome of screening a generated text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenOutcome {
    /// No banned term found; the text may be returned as-is
    Clean,
    /// A banned term was found; the whole text must be replaced
    Blocked,
}

/// Scan `text` for banned phrases and words, case-insensitively.
pub fn screen(text: &str) -> ScreenOutcome {
    let lower = text.to_lowercase();

    let phrase_hit = BANNED_PHRASES.iter().any(|p| lower.contains(p));
    let word_hit = BANNED_WORDS.iter().any(|w| lower.contains(w));

    if phrase_hit || word_hit {
        ScreenOutcome::Blocked
    } else {
        ScreenOutcome::Clean
    }
}

/// Apply the filter: blocked text collapses to the fixed fallback sentence.
///
/// Returns the surviving text and whether a substitution happened.
pub fn filter_text(text: String) -> (String, bool) {
    match screen(&text) {
        ScreenOutcome::Clean => (text, false),
        ScreenOutcome::Blocked => (SAFE_FALLBACK_TEXT.to_string(), true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_passes_through() {
        let text = "Schalten Sie Geräte nachts aus und nutzen Sie LED-Lampen.";
        assert_eq!(screen(text), ScreenOutcome::Clean);

        let (out, replaced) = filter_text(text.to_string());
        assert_eq!(out, text);
        assert!(!replaced);
    }

    #[test]
    fn test_banned_phrase_blocks() {
        let text = "Tipp: Sicherungen entfernen spart Strom.";
        assert_eq!(screen(text), ScreenOutcome::Blocked);
    }

    #[test]
    fn test_banned_word_blocks() {
        let text = "Arbeiten an Starkstrom sind effizient.";
        assert_eq!(screen(text), ScreenOutcome::Blocked);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(screen("Vorsicht vor HOCHSPANNUNG!"), ScreenOutcome::Blocked);
        assert_eq!(screen("ÜBERBRÜCKEN Sie nichts."), ScreenOutcome::Blocked);
    }

    #[test]
    fn test_substring_match_inside_longer_word() {
        // "Manipulationsschutz" contains "manipulation" - over-blocking on
        // purpose.
        assert_eq!(
            screen("Der Manipulationsschutz des Zählers ist wichtig."),
            ScreenOutcome::Blocked
        );
    }

    #[test]
    fn test_blocked_text_is_fully_replaced() {
        let (out, replaced) =
            filter_text("Erst Hauptschalter ausschalten, dann sparen.".to_string());
        assert_eq!(out, SAFE_FALLBACK_TEXT);
        assert!(replaced);
    }
}
