//! Headnote ("Leitsätze") extraction.

use std::sync::LazyLock;

use regex::Regex;

/// Everything between the `Leitsätze:` label and the `Tenor` section.
static HEADNOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)Leits(?:ätze|aetze|atz)\s*:?(.*?)Tenor").unwrap());

/// The decision's official headnote, verbatim and trimmed.
///
/// `None` when the transcript has no headnote section or it is empty.
pub fn extract_headnote(transcript: &str) -> Option<String> {
    HEADNOTE
        .captures(transcript)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|h| !h.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_until_tenor() {
        let text = "BUNDESFINANZHOF Urteil vom 4.9.2025\n\nLeitsätze:\n\n1. Gewinne aus Kryptowährungen sind steuerbar.\n2. Die Haltefrist beträgt ein Jahr.\n\nTenor\n\nDie Revision wird zurückgewiesen.";

        let headnote = extract_headnote(text).unwrap();

        assert!(headnote.starts_with("1. Gewinne"));
        assert!(headnote.ends_with("ein Jahr."));
        assert!(!headnote.contains("Tenor"));
    }

    #[test]
    fn test_singular_and_case_insensitive() {
        let text = "LEITSATZ: Nur ein Satz. TENOR: Aufgehoben.";
        assert_eq!(extract_headnote(text).unwrap(), "Nur ein Satz.");
    }

    #[test]
    fn test_stops_at_first_tenor() {
        let text = "Leitsätze: A\nTenor\nB\nTenor\nC";
        assert_eq!(extract_headnote(text).unwrap(), "A");
    }

    #[test]
    fn test_missing_or_empty() {
        assert!(extract_headnote("Gründe ohne Leitsatz und ohne Urteilsformel").is_none());
        assert!(extract_headnote("Leitsätze:   \nTenor").is_none());
        assert!(extract_headnote("Leitsätze: ohne Ende").is_none());
    }
}
