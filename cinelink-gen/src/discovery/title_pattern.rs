//! Title-pattern groups: films whose title contains a catalogue word
//!
//! Matching is a plain substring test on the lower-cased title, the same test
//! the `title-contains` verification applies, so every group self-verifies.
//! Short words that hide inside unrelated words ("one" in "Gone", "red" in
//! "Hundred") are left out of the catalogue.

use super::chunk_groups;
use crate::types::Discoverer;
use cinelink_common::config::DiscovererKind;
use cinelink_common::models::{
    CandidateGroup, Category, ConnectionType, FilmRecord, TitlePatternCategory,
    VerificationDescriptor, VerificationParams, VerificationType,
};

const COLORS: &[&str] = &[
    "blue", "green", "black", "white", "gold", "silver", "pink", "purple", "orange",
    "yellow", "gray", "grey", "scarlet", "crimson", "violet", "brown",
];

const NUMBERS: &[&str] = &[
    "two", "three", "four", "five", "seven", "eight", "nine", "twelve",
    "hundred", "thousand", "million", "first", "second", "third", "double", "zero",
];

const ANIMALS: &[&str] = &[
    "wolf", "dog", "horse", "bird", "shark", "snake", "lion", "tiger", "spider",
    "eagle", "monkey", "rabbit", "whale", "crow", "dragon", "mouse", "duck", "goat",
];

const BODY_PARTS: &[&str] = &[
    "heart", "hand", "head", "blood", "bone", "face", "skin", "mouth", "tooth", "teeth",
    "foot", "feet", "fist", "brain", "skull", "finger", "lips",
];

const TIME_WORDS: &[&str] = &[
    "night", "morning", "midnight", "tomorrow", "yesterday", "today", "hour", "minute",
    "week", "summer", "winter", "spring", "autumn", "time", "forever",
];

const DEATH_WORDS: &[&str] = &[
    "death", "dead", "kill", "murder", "grave", "ghost", "funeral", "corpse", "zombie", "tomb",
    "doom", "slaughter",
];

/// Catalogue words for one pattern category
pub fn catalogue_words(category: TitlePatternCategory) -> &'static [&'static str] {
    match category {
        TitlePatternCategory::Colors => COLORS,
        TitlePatternCategory::Numbers => NUMBERS,
        TitlePatternCategory::Animals => ANIMALS,
        TitlePatternCategory::BodyParts => BODY_PARTS,
        TitlePatternCategory::Time => TIME_WORDS,
        TitlePatternCategory::Death => DEATH_WORDS,
    }
}

/// Groups films by catalogue words found in their titles
#[derive(Debug)]
pub struct TitlePatternDiscoverer {
    categories: Vec<TitlePatternCategory>,
}

impl TitlePatternDiscoverer {
    /// Discoverer over the full catalogue
    pub fn new() -> Self {
        Self {
            categories: TitlePatternCategory::ALL.to_vec(),
        }
    }

    /// Discoverer restricted to some pattern categories
    pub fn with_categories(categories: Vec<TitlePatternCategory>) -> Self {
        Self { categories }
    }
}

impl Default for TitlePatternDiscoverer {
    fn default() -> Self {
        Self::new()
    }
}

impl Discoverer for TitlePatternDiscoverer {
    fn name(&self) -> &'static str {
        "TitlePattern"
    }

    fn kind(&self) -> DiscovererKind {
        DiscovererKind::Title
    }

    fn analyze(&self, pool: &[FilmRecord]) -> Vec<CandidateGroup> {
        let lowered: Vec<String> = pool.iter().map(|f| f.title.to_lowercase()).collect();
        let mut groups = Vec::new();

        for &category in &self.categories {
            for &word in catalogue_words(category) {
                let matches: Vec<&FilmRecord> = pool
                    .iter()
                    .zip(&lowered)
                    .filter(|(_, title)| title.contains(word))
                    .map(|(film, _)| film)
                    .collect();

                for film_ids in chunk_groups(&matches) {
                    groups.push(CandidateGroup::deterministic(
                        film_ids,
                        ConnectionType::TitlePattern(category),
                        format!("Titles containing \"{}\"", word),
                        Category::Title,
                        VerificationDescriptor::new(
                            VerificationType::TitleContains,
                            VerificationParams::substring(word),
                        ),
                    ));
                }
            }
        }

        groups
    }
}
