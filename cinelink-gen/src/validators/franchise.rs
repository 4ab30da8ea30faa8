//! Franchise clustering detection
//!
//! Grouping sequels of one franchise is trivially easy and therefore rejected.
//! A suggestion clusters a franchise when:
//! 1. its connection text names a known franchise,
//! 2. its connection text talks about franchises/series/sagas/trilogies,
//!    cinematic universes or sequels, or
//! 3. three or more selected titles belong to one franchise, either a known
//!    one or by sharing a base title ("Scream", "Scream 2", "Scream 3") where
//!    at least one title carries a sequel marker or subtitle.

use once_cell::sync::Lazy;
use regex::Regex;

/// Selected titles from one franchise that trigger rejection
pub const FRANCHISE_TITLE_THRESHOLD: usize = 3;

/// Minimum normalized Levenshtein similarity for two base titles to match
const BASE_TITLE_SIMILARITY: f64 = 0.9;

static KNOWN_FRANCHISES: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    [
        ("Star Wars", r"\bstar wars\b|\bempire strikes back\b|\breturn of the jedi\b|\bthe (?:force awakens|last jedi|phantom menace)\b"),
        ("Star Trek", r"\bstar trek\b"),
        ("Harry Potter", r"\bharry potter\b|\bfantastic beasts\b"),
        ("Marvel", r"\bmarvel\b|\bavengers\b|\biron man\b|\bcaptain america\b|\bguardians of the galaxy\b|\bant-man\b"),
        ("Spider-Man", r"\bspider-?man\b"),
        ("Batman", r"\bbatman\b|\bdark knight\b"),
        ("Superman", r"\bsuperman\b|\bman of steel\b"),
        ("X-Men", r"\bx-men\b|\bwolverine\b|\bdeadpool\b"),
        ("Fast & Furious", r"\bfast (?:&|and) (?:the )?furious\b|\bfast five\b|\bfurious [0-9]\b|\b2 fast 2 furious\b"),
        ("James Bond", r"\bjames bond\b|\b007\b"),
        ("Middle-earth", r"\blord of the rings\b|\bthe hobbit\b|\bmiddle-earth\b"),
        ("Jurassic Park", r"\bjurassic (?:park|world)\b"),
        ("Mission: Impossible", r"\bmission:? impossible\b"),
        ("Transformers", r"\btransformers\b"),
        ("Pirates of the Caribbean", r"\bpirates of the caribbean\b"),
        ("Toy Story", r"\btoy story\b"),
        ("Shrek", r"\bshrek\b"),
        ("Rocky", r"\brocky (?:ii|iii|iv|v|balboa)\b|^rocky$"),
        ("Rambo", r"\brambo\b|\bfirst blood\b"),
        ("Terminator", r"\bterminator\b"),
        ("The Matrix", r"\bthe matrix\b"),
        ("Indiana Jones", r"\bindiana jones\b|\braiders of the lost ark\b"),
        ("The Hunger Games", r"\bhunger games\b|\bmockingjay\b"),
        ("Twilight", r"\btwilight saga\b|\bbreaking dawn\b"),
        ("John Wick", r"\bjohn wick\b"),
        ("Die Hard", r"\bdie hard\b"),
        ("Back to the Future", r"\bback to the future\b"),
        ("Despicable Me", r"\bdespicable me\b|\bminions\b"),
        ("Ice Age", r"\bice age\b"),
        ("Kung Fu Panda", r"\bkung fu panda\b"),
        ("The Godfather", r"\bgodfather\b"),
        ("Mad Max", r"\bmad max\b|\bfury road\b"),
        ("Planet of the Apes", r"\bplanet of the apes\b|\bof the planet of the apes\b"),
        ("Resident Evil", r"\bresident evil\b"),
        ("Final Destination", r"\bfinal destination\b"),
        ("Paranormal Activity", r"\bparanormal activity\b"),
        ("The Conjuring", r"\bconjuring\b|\bannabelle\b"),
        ("Jason Bourne", r"\bbourne\b"),
        ("Men in Black", r"\bmen in black\b"),
        ("Ghostbusters", r"\bghostbusters\b"),
        ("A Nightmare on Elm Street", r"\bnightmare on elm street\b"),
        ("Friday the 13th", r"\bfriday the 13th\b"),
    ]
    .into_iter()
    .map(|(name, pattern)| {
        let regex = Regex::new(&format!("(?i){}", pattern)).expect("hardcoded regex");
        (name, regex)
    })
    .collect()
});

static FRANCHISE_WORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:franchises?|series|sagas?|trilog(?:y|ies)|cinematic universes?|(?:se|pre)quels?)\b")
        .expect("hardcoded regex")
});

/// Trailing sequel markers: numerals, roman numerals, "part N", "chapter N"
static SEQUEL_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s*\b(?:(?:part|chapter|episode)\s+\w+|[0-9]+|ii|iii|iv|v|vi|vii|viii|ix|x)\s*$")
        .expect("hardcoded regex")
});

/// Check a suggestion for franchise clustering; returns the rejection detail
pub fn detect_franchise_clustering(connection: &str, titles: &[&str]) -> Option<String> {
    if let Some((name, _)) = KNOWN_FRANCHISES.iter().find(|(_, re)| re.is_match(connection)) {
        return Some(format!("Connection names the {} franchise", name));
    }

    if let Some(word) = FRANCHISE_WORDS.find(connection) {
        return Some(format!("Connection mentions '{}'", word.as_str()));
    }

    for (name, re) in KNOWN_FRANCHISES.iter() {
        let count = titles.iter().filter(|t| re.is_match(t)).count();
        if count >= FRANCHISE_TITLE_THRESHOLD {
            return Some(format!("{} titles belong to the {} franchise", count, name));
        }
    }

    shared_base_title(titles).map(|(base, count)| {
        format!("{} titles share the base title '{}'", count, base)
    })
}

/// Base title with subtitle and sequel markers stripped, lower-cased
pub fn base_title(title: &str) -> String {
    let mut base = title
        .split(':')
        .next()
        .unwrap_or(title)
        .trim()
        .to_lowercase();
    // "Rocky IV" → "rocky"; keep stripping "Part II 2"-style stacks
    loop {
        let stripped = SEQUEL_SUFFIX.replace(&base, "").trim().to_string();
        if stripped == base || stripped.is_empty() {
            break;
        }
        base = stripped;
    }
    base
}

/// Largest set of titles sharing one base title, if it reaches the threshold
///
/// Titles that merely start with the same word ("It", "It Follows") do not
/// match; bases must be equal or near-equal, and at least one member of the
/// set must have had a marker stripped.
fn shared_base_title(titles: &[&str]) -> Option<(String, usize)> {
    let bases: Vec<(String, bool)> = titles
        .iter()
        .map(|t| {
            let base = base_title(t);
            let stripped = base != t.trim().to_lowercase();
            (base, stripped)
        })
        .collect();

    bases
        .iter()
        .filter(|(base, _)| !base.is_empty())
        .filter_map(|(candidate, _)| {
            let members: Vec<&(String, bool)> = bases
                .iter()
                .filter(|(other, _)| {
                    other == candidate
                        || strsim::normalized_levenshtein(candidate, other) >= BASE_TITLE_SIMILARITY
                })
                .collect();
            let any_sequel = members.iter().any(|(_, stripped)| *stripped);
            (any_sequel && members.len() >= FRANCHISE_TITLE_THRESHOLD)
                .then(|| (candidate.clone(), members.len()))
        })
        .max_by_key(|(_, count)| *count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_naming_franchise_rejected() {
        let detail = detect_franchise_clustering("Star Wars movies", &["A", "B", "C", "D"]).unwrap();
        assert!(detail.contains("Star Wars"));
    }

    #[test]
    fn test_franchise_words_rejected() {
        for connection in ["Part of a trilogy", "Film series", "Same cinematic universe", "Horror sagas", "Sequels"] {
            assert!(
                detect_franchise_clustering(connection, &["A", "B", "C", "D"]).is_some(),
                "{} should be rejected",
                connection
            );
        }
    }

    #[test]
    fn test_three_known_franchise_titles_rejected() {
        let titles = ["Iron Man", "The Avengers", "Captain America: Civil War", "Heat"];
        let detail = detect_franchise_clustering("Heroes in armor", &titles).unwrap();
        assert!(detail.contains("Marvel"), "detail was {}", detail);
    }

    #[test]
    fn test_two_franchise_titles_allowed() {
        let titles = ["Iron Man", "The Avengers", "Heat", "Ronin"];
        assert!(detect_franchise_clustering("Heists gone wrong", &titles).is_none());
    }

    #[test]
    fn test_shared_base_title_rejected() {
        let titles = ["Scream", "Scream 2", "Scream 3", "Heat"];
        let detail = detect_franchise_clustering("Meta horror", &titles).unwrap();
        assert!(detail.contains("'scream'"), "detail was {}", detail);
    }

    #[test]
    fn test_base_title_strips_markers() {
        assert_eq!(base_title("Rocky IV"), "rocky");
        assert_eq!(base_title("Kill Bill: Vol. 2"), "kill bill");
        assert_eq!(base_title("Back to the Future Part III"), "back to the future");
        assert_eq!(base_title("Alien"), "alien");
    }

    #[test]
    fn test_shared_leading_word_is_not_a_franchise() {
        let titles = ["It", "It Follows", "It Comes at Night", "Insidious"];
        assert!(detect_franchise_clustering("Haunted by an unseen presence", &titles).is_none());
    }

    #[test]
    fn test_remakes_without_sequel_marker_pass() {
        let titles = ["Halloween", "Halloween", "Halloween", "Heat"];
        assert!(detect_franchise_clustering("Holiday horror", &titles).is_none());
    }

    #[test]
    fn test_ambiguous_franchise_words_in_connection_pass() {
        let titles = ["Heat", "Ronin", "Collateral", "Thief"];
        for connection in ["Set in the Rocky Mountains", "Characters trapped in a matrix of lies"] {
            assert!(
                detect_franchise_clustering(connection, &titles).is_none(),
                "{} should pass",
                connection
            );
        }
        assert!(detect_franchise_clustering("Inspired by The Matrix", &titles).is_some());
    }

    #[test]
    fn test_rocky_titles_rejected() {
        let titles = ["Rocky", "Rocky II", "Rocky Balboa", "Heat"];
        let detail = detect_franchise_clustering("Boxing underdogs", &titles).unwrap();
        assert!(detail.contains("Rocky"), "detail was {}", detail);
        assert!(detect_franchise_clustering("Boxing underdogs", &["Rocky Road", "Heat", "Ronin", "Thief"]).is_none());
    }

    #[test]
    fn test_unrelated_titles_pass() {
        let titles = ["Heat", "Ronin", "Collateral", "Thief"];
        assert!(detect_franchise_clustering("Michael Mann crime films", &titles).is_none());
    }
}
