//! Film and connection-group data model
//!
//! Wire format shared by the metadata source (film records), the external
//! suggestion generator (suggestions) and the persistence layer (formatted
//! groups). All records serialise with camelCase field names.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Film identifier (unique within a pool)
pub type FilmId = u64;
/// Cast/crew member identifier
pub type PersonId = u64;
/// Genre identifier
pub type GenreId = u32;

/// Crew job string that marks a director credit
pub const DIRECTOR_JOB: &str = "Director";

/// Number of films in every connection group
pub const GROUP_SIZE: usize = 4;

// ============================================================================
// Film records
// ============================================================================

/// Genre tag attached to a film
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

/// Credited cast member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastMember {
    pub id: PersonId,
    pub name: String,
    /// Zero-based prominence rank in the credited cast list
    #[serde(alias = "order")]
    pub billing_order: u32,
}

/// Credited crew member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewMember {
    pub id: PersonId,
    pub name: String,
    pub job: String,
}

/// Film metadata record
///
/// Immutable once fetched. The generator treats the pool of records as a
/// read-only snapshot for the duration of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilmRecord {
    pub id: FilmId,
    pub title: String,
    pub release_year: i32,
    #[serde(default)]
    pub overview: String,
    /// Genres in source order; the first entry is the primary genre
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
    /// Number of audience votes (popularity proxy)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<f64>,
}

impl FilmRecord {
    /// Create a bare record with no credits or genres
    pub fn new(id: FilmId, title: impl Into<String>, release_year: i32) -> Self {
        Self {
            id,
            title: title.into(),
            release_year,
            overview: String::new(),
            genres: Vec::new(),
            cast: Vec::new(),
            crew: Vec::new(),
            vote_count: None,
            popularity: None,
        }
    }

    pub fn with_overview(mut self, overview: impl Into<String>) -> Self {
        self.overview = overview.into();
        self
    }

    pub fn with_genre(mut self, id: GenreId, name: impl Into<String>) -> Self {
        self.genres.push(Genre { id, name: name.into() });
        self
    }

    pub fn with_director(self, id: PersonId, name: impl Into<String>) -> Self {
        self.with_crew(id, name, DIRECTOR_JOB)
    }

    pub fn with_crew(mut self, id: PersonId, name: impl Into<String>, job: impl Into<String>) -> Self {
        self.crew.push(CrewMember {
            id,
            name: name.into(),
            job: job.into(),
        });
        self
    }

    pub fn with_cast(mut self, id: PersonId, name: impl Into<String>, billing_order: u32) -> Self {
        self.cast.push(CastMember {
            id,
            name: name.into(),
            billing_order,
        });
        self
    }

    pub fn with_vote_count(mut self, vote_count: u64) -> Self {
        self.vote_count = Some(vote_count);
        self
    }

    pub fn with_popularity(mut self, popularity: f64) -> Self {
        self.popularity = Some(popularity);
        self
    }

    /// Decade of release (1989 → 1980)
    pub fn decade(&self) -> i32 {
        self.release_year.div_euclid(10) * 10
    }

    /// Crew entries credited with the director job
    pub fn directors(&self) -> impl Iterator<Item = &CrewMember> {
        self.crew.iter().filter(|c| c.job == DIRECTOR_JOB)
    }

    /// Cast entries with billing order strictly below `limit`
    pub fn top_billed(&self, limit: u32) -> impl Iterator<Item = &CastMember> {
        self.cast.iter().filter(move |c| c.billing_order < limit)
    }

    /// First-listed genre
    pub fn primary_genre(&self) -> Option<&Genre> {
        self.genres.first()
    }

    pub fn has_genre(&self, genre_id: GenreId) -> bool {
        self.genres.iter().any(|g| g.id == genre_id)
    }
}

// ============================================================================
// Enumerations
// ============================================================================

/// Title-pattern catalogue category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TitlePatternCategory {
    Colors,
    Numbers,
    Animals,
    BodyParts,
    Time,
    Death,
}

impl TitlePatternCategory {
    /// Catalogue order, also used as discovery priority between subtypes
    pub const ALL: [TitlePatternCategory; 6] = [
        TitlePatternCategory::Colors,
        TitlePatternCategory::Numbers,
        TitlePatternCategory::Animals,
        TitlePatternCategory::BodyParts,
        TitlePatternCategory::Time,
        TitlePatternCategory::Death,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            TitlePatternCategory::Colors => "colors",
            TitlePatternCategory::Numbers => "numbers",
            TitlePatternCategory::Animals => "animals",
            TitlePatternCategory::BodyParts => "body-parts",
            TitlePatternCategory::Time => "time",
            TitlePatternCategory::Death => "death",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.slug() == slug)
    }
}

/// Connection type tag
///
/// Serialises as a plain string: `director`, `actor`, `title-pattern-<category>`,
/// `genre`, or any other (suggested) string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConnectionType {
    Director,
    Actor,
    TitlePattern(TitlePatternCategory),
    Genre,
    Suggested(String),
}

impl ConnectionType {
    /// Family key used by the diversity-aware cap
    pub fn family(&self) -> &str {
        match self {
            ConnectionType::Director => "director",
            ConnectionType::Actor => "actor",
            ConnectionType::TitlePattern(_) => "title-pattern",
            ConnectionType::Genre => "genre",
            ConnectionType::Suggested(_) => "suggested",
        }
    }
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionType::Director => f.write_str("director"),
            ConnectionType::Actor => f.write_str("actor"),
            ConnectionType::TitlePattern(category) => write!(f, "title-pattern-{}", category.slug()),
            ConnectionType::Genre => f.write_str("genre"),
            ConnectionType::Suggested(tag) => f.write_str(tag),
        }
    }
}

impl From<String> for ConnectionType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "director" => ConnectionType::Director,
            "actor" => ConnectionType::Actor,
            "genre" => ConnectionType::Genre,
            other => match other
                .strip_prefix("title-pattern-")
                .and_then(TitlePatternCategory::from_slug)
            {
                Some(category) => ConnectionType::TitlePattern(category),
                None => ConnectionType::Suggested(value),
            },
        }
    }
}

impl From<ConnectionType> for String {
    fn from(value: ConnectionType) -> Self {
        value.to_string()
    }
}

/// Group category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Thematic,
    Title,
    Setting,
    Plot,
    Crew,
    Cast,
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "thematic" => Ok(Category::Thematic),
            "title" => Ok(Category::Title),
            "setting" => Ok(Category::Setting),
            "plot" => Ok(Category::Plot),
            "crew" => Ok(Category::Crew),
            "cast" => Ok(Category::Cast),
            other => Err(Error::InvalidInput(format!("Unknown category: {}", other))),
        }
    }
}

/// Verification rule selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerificationType {
    OverviewKeywords,
    TitleContains,
    TitlePattern,
    GenreIncludes,
    Director,
    Actor,
    Decade,
    YearRange,
}

impl VerificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationType::OverviewKeywords => "overview-keywords",
            VerificationType::TitleContains => "title-contains",
            VerificationType::TitlePattern => "title-pattern",
            VerificationType::GenreIncludes => "genre-includes",
            VerificationType::Director => "director",
            VerificationType::Actor => "actor",
            VerificationType::Decade => "decade",
            VerificationType::YearRange => "year-range",
        }
    }
}

impl fmt::Display for VerificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerificationType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        [
            VerificationType::OverviewKeywords,
            VerificationType::TitleContains,
            VerificationType::TitlePattern,
            VerificationType::GenreIncludes,
            VerificationType::Director,
            VerificationType::Actor,
            VerificationType::Decade,
            VerificationType::YearRange,
        ]
        .into_iter()
        .find(|t| t.as_str() == normalized)
        .ok_or_else(|| Error::InvalidInput(format!("Unknown verification type: {}", s)))
    }
}

/// Difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Hardest,
}

impl Difficulty {
    pub fn color(&self) -> GroupColor {
        match self {
            Difficulty::Easy => GroupColor::Yellow,
            Difficulty::Medium => GroupColor::Green,
            Difficulty::Hard => GroupColor::Blue,
            Difficulty::Hardest => GroupColor::Purple,
        }
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" | "yellow" => Ok(Difficulty::Easy),
            "medium" | "green" => Ok(Difficulty::Medium),
            "hard" | "blue" => Ok(Difficulty::Hard),
            "hardest" | "purple" | "tricky" => Ok(Difficulty::Hardest),
            other => Err(Error::InvalidInput(format!("Unknown difficulty: {}", other))),
        }
    }
}

/// Display color paired with a difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupColor {
    Yellow,
    Green,
    Blue,
    Purple,
}

/// Group provenance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupSource {
    #[serde(rename = "deterministic")]
    Deterministic,
    #[serde(rename = "ai-thematic")]
    AiThematic,
}

// ============================================================================
// Verification descriptor
// ============================================================================

/// Parameters for a verification rule
///
/// Each verification type reads only the fields it needs; the rest stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_all: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substring: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre_id: Option<GenreId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_id: Option<PersonId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decade: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_year: Option<i32>,
}

impl VerificationParams {
    pub fn person(person_id: PersonId) -> Self {
        Self {
            person_id: Some(person_id),
            ..Default::default()
        }
    }

    pub fn substring(substring: impl Into<String>) -> Self {
        Self {
            substring: Some(substring.into()),
            ..Default::default()
        }
    }

    pub fn genre(genre_id: GenreId) -> Self {
        Self {
            genre_id: Some(genre_id),
            ..Default::default()
        }
    }

    pub fn keywords<I, S>(keywords: I, require_all: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: Some(keywords.into_iter().map(Into::into).collect()),
            require_all: Some(require_all),
            ..Default::default()
        }
    }

    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self {
            pattern: Some(pattern.into()),
            ..Default::default()
        }
    }

    pub fn decade(decade: i32) -> Self {
        Self {
            decade: Some(decade),
            ..Default::default()
        }
    }

    pub fn year_range(min_year: Option<i32>, max_year: Option<i32>) -> Self {
        Self {
            min_year,
            max_year,
            ..Default::default()
        }
    }
}

/// The (type, params) pair used to mechanically re-check a claimed connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationDescriptor {
    pub verification_type: VerificationType,
    pub verification_params: VerificationParams,
}

impl VerificationDescriptor {
    pub fn new(verification_type: VerificationType, verification_params: VerificationParams) -> Self {
        Self {
            verification_type,
            verification_params,
        }
    }
}

// ============================================================================
// Groups
// ============================================================================

/// Candidate connection group of exactly four distinct films
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateGroup {
    pub film_ids: [FilmId; GROUP_SIZE],
    pub connection_type: ConnectionType,
    /// Human-readable connection text
    pub connection: String,
    pub category: Category,
    pub verification: VerificationDescriptor,
    pub source: GroupSource,
    /// Difficulty declared by the suggestion author (suggested groups only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl CandidateGroup {
    /// Build a deterministic group. Caller guarantees the ids are distinct.
    pub fn deterministic(
        film_ids: [FilmId; GROUP_SIZE],
        connection_type: ConnectionType,
        connection: impl Into<String>,
        category: Category,
        verification: VerificationDescriptor,
    ) -> Self {
        Self {
            film_ids,
            connection_type,
            connection: connection.into(),
            category,
            verification,
            source: GroupSource::Deterministic,
            declared_difficulty: None,
            explanation: None,
        }
    }

    /// Convert an arbitrary id list into a group id array
    ///
    /// Fails unless there are exactly four pairwise distinct ids.
    pub fn checked_ids(ids: &[FilmId]) -> Result<[FilmId; GROUP_SIZE]> {
        let film_ids: [FilmId; GROUP_SIZE] = ids.try_into().map_err(|_| {
            Error::InvalidInput(format!("Expected {} films, got {}", GROUP_SIZE, ids.len()))
        })?;
        for (i, id) in film_ids.iter().enumerate() {
            if film_ids[i + 1..].contains(id) {
                return Err(Error::InvalidInput(format!("Duplicate film id {} in group", id)));
            }
        }
        Ok(film_ids)
    }

    /// Sorted film ids identifying the exact film set
    pub fn fingerprint(&self) -> [FilmId; GROUP_SIZE] {
        let mut ids = self.film_ids;
        ids.sort_unstable();
        ids
    }

    /// Number of films shared with another group
    pub fn shared_films(&self, other: &CandidateGroup) -> usize {
        self.film_ids
            .iter()
            .filter(|id| other.film_ids.contains(id))
            .count()
    }
}

/// Final output group handed to the persistence layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedGroup {
    pub id: Uuid,
    #[serde(flatten)]
    pub group: CandidateGroup,
    pub difficulty_score: f64,
    pub difficulty: Difficulty,
    pub color: GroupColor,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Suggestions
// ============================================================================

/// Untrusted candidate group from the external suggestion generator
///
/// Loosely typed on purpose: enumerations arrive as strings and parameters as
/// raw JSON so that one bad suggestion never fails parsing of a whole batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub connection: String,
    /// Positions in the film array passed to the generator
    #[serde(default)]
    pub film_indices: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_params: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_type: Option<String>,
}
