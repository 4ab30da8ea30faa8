//! Compiled verification rules
//!
//! A `(VerificationType, VerificationParams)` pair is compiled once per group
//! into a `VerificationRule`, then checked against each film. Compilation
//! failures (missing params, bad regex) are reported as a reason string and
//! turn into a failure for every film; they never panic.

use cinelink_common::models::{
    FilmRecord, GenreId, PersonId, VerificationParams, VerificationType,
};
use regex::{Regex, RegexBuilder};

/// A single checkable claim about a film
#[derive(Debug, Clone)]
pub enum VerificationRule {
    OverviewKeywords {
        /// Lower-cased, blank keywords removed
        keywords: Vec<String>,
        require_all: bool,
    },
    TitleContains {
        /// Lower-cased
        substring: String,
    },
    TitlePattern {
        regex: Regex,
    },
    GenreIncludes {
        genre_id: GenreId,
    },
    Director {
        person_id: PersonId,
    },
    Actor {
        person_id: PersonId,
    },
    Decade {
        decade: i32,
    },
    YearRange {
        min_year: Option<i32>,
        max_year: Option<i32>,
    },
}

impl VerificationRule {
    /// Compile a rule from its descriptor parts
    ///
    /// Returns the failure reason when the parameters cannot express a claim.
    pub fn compile(
        verification_type: VerificationType,
        params: &VerificationParams,
    ) -> Result<Self, String> {
        match verification_type {
            VerificationType::OverviewKeywords => {
                let keywords: Vec<String> = params
                    .keywords
                    .iter()
                    .flatten()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect();
                if keywords.is_empty() {
                    return Err("No keywords provided".to_string());
                }
                Ok(VerificationRule::OverviewKeywords {
                    keywords,
                    require_all: params.require_all.unwrap_or(false),
                })
            }
            VerificationType::TitleContains => match params.substring.as_deref() {
                Some(s) if !s.is_empty() => Ok(VerificationRule::TitleContains {
                    substring: s.to_lowercase(),
                }),
                _ => Err("No substring provided".to_string()),
            },
            VerificationType::TitlePattern => {
                let pattern = params
                    .pattern
                    .as_deref()
                    .filter(|p| !p.is_empty())
                    .ok_or_else(|| "No pattern provided".to_string())?;
                let regex = RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| format!("Invalid pattern '{}': {}", pattern, e))?;
                Ok(VerificationRule::TitlePattern { regex })
            }
            VerificationType::GenreIncludes => params
                .genre_id
                .map(|genre_id| VerificationRule::GenreIncludes { genre_id })
                .ok_or_else(|| "No genreId provided".to_string()),
            VerificationType::Director => params
                .person_id
                .map(|person_id| VerificationRule::Director { person_id })
                .ok_or_else(|| "No personId provided".to_string()),
            VerificationType::Actor => params
                .person_id
                .map(|person_id| VerificationRule::Actor { person_id })
                .ok_or_else(|| "No personId provided".to_string()),
            VerificationType::Decade => params
                .decade
                .map(|decade| VerificationRule::Decade { decade })
                .ok_or_else(|| "No decade provided".to_string()),
            VerificationType::YearRange => {
                if params.min_year.is_none() && params.max_year.is_none() {
                    return Err("No year range provided".to_string());
                }
                Ok(VerificationRule::YearRange {
                    min_year: params.min_year,
                    max_year: params.max_year,
                })
            }
        }
    }

    /// Check one film; `Err` carries the failure reason
    pub fn check(&self, film: &FilmRecord) -> Result<(), String> {
        match self {
            VerificationRule::OverviewKeywords {
                keywords,
                require_all,
            } => {
                let overview = film.overview.to_lowercase();
                if *require_all {
                    let missing: Vec<&str> = keywords
                        .iter()
                        .filter(|k| !overview.contains(k.as_str()))
                        .map(String::as_str)
                        .collect();
                    if missing.is_empty() {
                        Ok(())
                    } else {
                        Err(format!("Overview missing keywords: {}", missing.join(", ")))
                    }
                } else if keywords.iter().any(|k| overview.contains(k.as_str())) {
                    Ok(())
                } else {
                    Err(format!("Overview contains none of: {}", keywords.join(", ")))
                }
            }
            VerificationRule::TitleContains { substring } => {
                if film.title.to_lowercase().contains(substring.as_str()) {
                    Ok(())
                } else {
                    Err(format!("Title does not contain '{}'", substring))
                }
            }
            VerificationRule::TitlePattern { regex } => {
                if regex.is_match(&film.title) {
                    Ok(())
                } else {
                    Err(format!("Title does not match pattern '{}'", regex.as_str()))
                }
            }
            VerificationRule::GenreIncludes { genre_id } => {
                if film.has_genre(*genre_id) {
                    Ok(())
                } else {
                    Err(format!("Missing genre {}", genre_id))
                }
            }
            VerificationRule::Director { person_id } => {
                if film.directors().any(|d| d.id == *person_id) {
                    Ok(())
                } else {
                    Err(format!("Not directed by person {}", person_id))
                }
            }
            VerificationRule::Actor { person_id } => {
                if film.cast.iter().any(|c| c.id == *person_id) {
                    Ok(())
                } else {
                    Err(format!("Person {} not in cast", person_id))
                }
            }
            VerificationRule::Decade { decade } => {
                if film.decade() == *decade {
                    Ok(())
                } else {
                    Err(format!(
                        "Released {}, not in the {}s",
                        film.release_year, decade
                    ))
                }
            }
            VerificationRule::YearRange { min_year, max_year } => {
                let year = film.release_year;
                let above_min = min_year.map_or(true, |min| year >= min);
                let below_max = max_year.map_or(true, |max| year <= max);
                if above_min && below_max {
                    Ok(())
                } else {
                    Err(format!(
                        "Released {}, outside {}-{}",
                        year,
                        min_year.map_or_else(|| "…".to_string(), |y| y.to_string()),
                        max_year.map_or_else(|| "…".to_string(), |y| y.to_string()),
                    ))
                }
            }
        }
    }
}
