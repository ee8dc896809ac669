use serde::{Deserialize, Serialize};

use crate::text::limit_words;

// ============================================================================
// TMDb API Types
// ============================================================================

/// Entry of a TMDb movie list (`/movie/popular`, `/movie/now_playing`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TmdbListMovie {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}

/// Paged TMDb list response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TmdbMoviePage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<TmdbListMovie>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TmdbGenre {
    pub id: u64,
    pub name: String,
}

/// Response of `/movie/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TmdbMovieDetails {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    #[serde(default)]
    pub tagline: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TmdbKeyword {
    pub id: u64,
    pub name: String,
}

/// Response of `/movie/{id}/keywords`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TmdbKeywords {
    pub id: u64,
    #[serde(default)]
    pub keywords: Vec<TmdbKeyword>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TmdbReview {
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub content: String,
}

/// Response of `/movie/{id}/reviews`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TmdbReviewPage {
    #[serde(default)]
    pub results: Vec<TmdbReview>,
}

// ============================================================================
// Catalog views of TMDb data
// ============================================================================

/// Placeholder values of an incomplete external movie. Imports carrying any of
/// them are rejected.
pub const UNTITLED: &str = "Untitled";
pub const NOT_AVAILABLE: &str = "N/A";
pub const NO_DESCRIPTION: &str = "No description available.";
pub const NO_TAGS: &str = "No tags available.";
pub const NO_KEYWORDS: &str = "No keywords available.";

/// Word limit for descriptions and keyword lists on the latest page
pub const LATEST_WORD_LIMIT: usize = 50;

/// A complete TMDb movie shaped like a catalog row, ready to be imported
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExternalMovie {
    pub tmdb_id: u64,
    pub title: String,
    pub description: String,
    pub rating: f64,
    pub release_date: String,
    pub genres: String,
    pub tags: String,
    pub keywords: String,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl ExternalMovie {
    /// Combines details and keywords; `None` when any catalog field would be empty.
    ///
    /// A zero vote average counts as missing.
    pub fn from_tmdb(details: TmdbMovieDetails, keywords: TmdbKeywords) -> Option<Self> {
        let title = non_empty(details.title)?;
        let description = non_empty(details.overview.map(|o| limit_words(&o, LATEST_WORD_LIMIT)))?;
        let rating = details.vote_average.filter(|r| *r > 0.0)?;
        let release_date = non_empty(details.release_date)?;
        let genres = non_empty(Some(
            details
                .genres
                .iter()
                .map(|g| g.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        ))?;
        let tags = non_empty(details.tagline)?;
        let keywords = non_empty(Some(limit_words(
            &keywords
                .keywords
                .iter()
                .map(|k| k.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            LATEST_WORD_LIMIT,
        )))?;

        Some(Self {
            tmdb_id: details.id,
            title,
            description,
            rating,
            release_date,
            genres,
            tags,
            keywords,
        })
    }
}

/// A now-playing title with its release date
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NowPlayingMovie {
    pub title: String,
    pub release_date: Option<String>,
}

/// A popular TMDb movie with a few of its reviews
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PopularMovieReviews {
    pub title: String,
    pub rating: Option<f64>,
    pub description: Option<String>,
    pub reviews: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> TmdbMovieDetails {
        TmdbMovieDetails {
            id: 27205,
            title: Some("Inception".to_string()),
            overview: Some("Cobb steals secrets from dreams.".to_string()),
            vote_average: Some(8.4),
            release_date: Some("2010-07-15".to_string()),
            genres: vec![
                TmdbGenre {
                    id: 28,
                    name: "Action".to_string(),
                },
                TmdbGenre {
                    id: 878,
                    name: "Science Fiction".to_string(),
                },
            ],
            tagline: Some("Your mind is the scene of the crime.".to_string()),
        }
    }

    fn keywords() -> TmdbKeywords {
        TmdbKeywords {
            id: 27205,
            keywords: vec![
                TmdbKeyword {
                    id: 1,
                    name: "dream".to_string(),
                },
                TmdbKeyword {
                    id: 2,
                    name: "heist".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_complete_movie_converts() {
        let movie = ExternalMovie::from_tmdb(details(), keywords()).unwrap();
        assert_eq!(movie.tmdb_id, 27205);
        assert_eq!(movie.genres, "Action, Science Fiction");
        assert_eq!(movie.keywords, "dream, heist");
        assert_eq!(movie.tags, "Your mind is the scene of the crime.");
    }

    #[test]
    fn test_missing_tagline_is_dropped() {
        let details = TmdbMovieDetails {
            tagline: Some(String::new()),
            ..details()
        };
        assert_eq!(ExternalMovie::from_tmdb(details, keywords()), None);
    }

    #[test]
    fn test_zero_rating_is_dropped() {
        let details = TmdbMovieDetails {
            vote_average: Some(0.0),
            ..details()
        };
        assert_eq!(ExternalMovie::from_tmdb(details, keywords()), None);
    }

    #[test]
    fn test_no_keywords_is_dropped() {
        let keywords = TmdbKeywords {
            id: 27205,
            keywords: vec![],
        };
        assert_eq!(ExternalMovie::from_tmdb(details(), keywords), None);
    }

    #[test]
    fn test_details_deserialize_with_missing_fields() {
        let json = r#"{ "id": 550, "title": "Fight Club", "genres": [] }"#;
        let details: TmdbMovieDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.id, 550);
        assert_eq!(details.tagline, None);
        assert!(details.genres.is_empty());
    }
}
