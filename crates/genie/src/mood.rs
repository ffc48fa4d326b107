//! Mood classification from reply text.

use ruchulu_core::reply::Mood;

/// Keyword rules in priority order; the first match wins.
const RULES: &[(&[&str], Mood)] = &[
    (&["ha!", "told you"], Mood::Sass),
    (&["brave", "challenge"], Mood::Delighted),
    (&["spice", "fire"], Mood::Eyerolled),
    (&["careful", "warning"], Mood::Warning),
];

/// Case-insensitive keyword scan; `Idle` when nothing matches.
pub fn classify(text: &str) -> Mood {
    let lower = text.to_lowercase();
    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, mood)| *mood)
        .unwrap_or(Mood::Idle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_rule() {
        assert_eq!(classify("HA! Knew it."), Mood::Sass);
        assert_eq!(classify("I told you so"), Mood::Sass);
        assert_eq!(classify("How brave of you."), Mood::Delighted);
        assert_eq!(classify("Accept the Challenge"), Mood::Delighted);
        assert_eq!(classify("Too much spice?"), Mood::Eyerolled);
        assert_eq!(classify("It's on FIRE"), Mood::Eyerolled);
        assert_eq!(classify("Careful now."), Mood::Warning);
        assert_eq!(classify("Consider this a warning"), Mood::Warning);
    }

    #[test]
    fn earlier_rule_wins() {
        assert_eq!(classify("Ha! Be careful."), Mood::Sass);
        assert_eq!(classify("Brave enough for the fire?"), Mood::Delighted);
        assert_eq!(classify("Warning: spice ahead"), Mood::Eyerolled);
    }

    #[test]
    fn nothing_matches() {
        assert_eq!(classify("The dal is lovely today."), Mood::Idle);
        assert_eq!(classify(""), Mood::Idle);
        assert_eq!(classify("ha"), Mood::Idle);
    }

    #[test]
    fn unicode_text_is_fine() {
        assert_eq!(classify("కారం 🌶️ FIRE"), Mood::Eyerolled);
        assert_eq!(classify("ఆవకాయ"), Mood::Idle);
    }
}
