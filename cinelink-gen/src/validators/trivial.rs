//! Trivial-pattern blacklist
//!
//! Connections any title list satisfies ("has 'the' in the title", "one-word
//! titles", "from the 1990s") make for dull puzzles and are rejected outright.

use once_cell::sync::Lazy;
use regex::Regex;

static TRIVIAL_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    [
        (
            "article or filler word in title",
            r#"\b(?:has|have|having|with|contains?|containing|includes?|including)\s+(?:the\s+word\s+)?['"“]?(?:the|a|an|of|and|in)['"”]?\s+in\s+(?:the\s+|their\s+|its\s+)?titles?\b"#,
        ),
        (
            "title word count",
            r"\b(?:one|single|two|three|1|2|3)[- ]word\s+titles?\b",
        ),
        (
            "release decade",
            r"\b(?:from|released\s+in|made\s+in|came\s+out\s+in)\s+the\s+(?:[0-9]{2,4}'?s|(?:nineteen|twenty)[- ]\w+)\b",
        ),
        (
            "release year",
            r"\breleased\s+in\s+(?:the\s+same\s+(?:year|decade)|[0-9]{4})\b",
        ),
        (
            "title starts with a letter or article",
            r#"\btitles?\s+(?:that\s+)?(?:start|starts|starting|begin|begins|beginning)\s+with\s+(?:the\s+letter\s+\w|['"]?(?:the|a|an|[a-z])['"]?)(?:\s|$|\b)"#,
        ),
        (
            "title contains a letter",
            r"\b(?:contains?|containing|with|has|have)\s+the\s+letter\s+\w\b",
        ),
        (
            "no connection",
            r"^\s*(?:all\s+)?(?:(?:are\s+)?(?:movies|films)|feature films|english[- ]language films)\s*$",
        ),
    ]
    .into_iter()
    .map(|(label, pattern)| {
        let regex = Regex::new(&format!("(?i){}", pattern)).expect("hardcoded regex");
        (label, regex)
    })
    .collect()
});

/// Check connection text against the blacklist; returns the rejection detail
pub fn detect_trivial_pattern(connection: &str) -> Option<String> {
    TRIVIAL_PATTERNS
        .iter()
        .find(|(_, re)| re.is_match(connection))
        .map(|(label, _)| format!("Trivial connection ({})", label))
}
