//! Structural claims a connection makes about titles
//!
//! "Titles phrased as questions" is only true if every selected title ends in
//! a question mark. Claims are detected from the connection text and checked
//! against the actual titles.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// A checkable claim about title structure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleClaim {
    Question,
    Exclamation,
    Subtitle,
    ContainsNumber,
    Possessive,
}

impl TitleClaim {
    pub const ALL: [TitleClaim; 5] = [
        TitleClaim::Question,
        TitleClaim::Exclamation,
        TitleClaim::Subtitle,
        TitleClaim::ContainsNumber,
        TitleClaim::Possessive,
    ];

    fn pattern(self) -> &'static Regex {
        match self {
            TitleClaim::Question => &QUESTION,
            TitleClaim::Exclamation => &EXCLAMATION,
            TitleClaim::Subtitle => &SUBTITLE,
            TitleClaim::ContainsNumber => &NUMBER,
            TitleClaim::Possessive => &POSSESSIVE,
        }
    }

    /// Whether a title satisfies the claim
    pub fn holds_for(self, title: &str) -> bool {
        let title = title.trim();
        match self {
            TitleClaim::Question => title.ends_with('?'),
            TitleClaim::Exclamation => title.contains('!'),
            TitleClaim::Subtitle => title.contains(':'),
            TitleClaim::ContainsNumber => NUMBER_IN_TITLE.is_match(title),
            TitleClaim::Possessive => POSSESSIVE_IN_TITLE.is_match(title),
        }
    }
}

impl fmt::Display for TitleClaim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TitleClaim::Question => "phrased as a question",
            TitleClaim::Exclamation => "an exclamation",
            TitleClaim::Subtitle => "subtitled",
            TitleClaim::ContainsNumber => "numbered",
            TitleClaim::Possessive => "possessive",
        };
        write!(f, "{}", s)
    }
}

fn claim_regex(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){}", pattern)).expect("hardcoded regex")
}

static MENTIONS_TITLE: Lazy<Regex> = Lazy::new(|| claim_regex(r"\b(?:titles?|titled|named|phrased)\b"));

static QUESTION: Lazy<Regex> = Lazy::new(|| claim_regex(r"\bquestions?\b|\bquestion marks?\b"));
static EXCLAMATION: Lazy<Regex> = Lazy::new(|| claim_regex(r"\bexclamations?\b|\bexclamation (?:marks?|points?)\b"));
static SUBTITLE: Lazy<Regex> = Lazy::new(|| claim_regex(r"\b(?:colons?|subtitles?|subtitled)\b"));
static NUMBER: Lazy<Regex> = Lazy::new(|| claim_regex(r"\b(?:numbers?|numerals?|digits?|numbered)\b"));
static POSSESSIVE: Lazy<Regex> = Lazy::new(|| claim_regex(r"\bpossessives?\b"));

static NUMBER_IN_TITLE: Lazy<Regex> = Lazy::new(|| {
    claim_regex(
        r"[0-9]|\b(?:one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve|thirteen|twenty|thirty|forty|fifty|hundred|thousand|million|ii|iii|iv|vi|vii|viii|ix)\b",
    )
});

static POSSESSIVE_IN_TITLE: Lazy<Regex> = Lazy::new(|| claim_regex(r"\w['’]s\b|\ws['’](?:\s|$)"));

/// Claims made by connection text; empty unless the text talks about titles
pub fn detect_title_claims(connection: &str) -> Vec<TitleClaim> {
    if !MENTIONS_TITLE.is_match(connection) {
        return Vec::new();
    }
    TitleClaim::ALL
        .into_iter()
        .filter(|claim| claim.pattern().is_match(connection))
        .collect()
}

/// Check every claim against every title; returns the first violation
pub fn check_title_claims(connection: &str, titles: &[&str]) -> Option<String> {
    for claim in detect_title_claims(connection) {
        if let Some(title) = titles.iter().find(|t| !claim.holds_for(t)) {
            return Some(format!("'{}' is not {}", title, claim));
        }
    }
    None
}
