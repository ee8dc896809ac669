use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::{validate_rating, validate_release_date};

/// A movie as stored in the `movies` table
///
/// `genres`, `tags` and `keywords` are comma separated lists ("Action, Drama").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub rating: f64,
    pub release_date: NaiveDate,
    pub genres: String,
    pub tags: String,
    pub keywords: String,
}

/// One row of the movie list query: a movie joined with at most one review
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MovieListRow {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub rating: f64,
    pub release_date: NaiveDate,
    pub genres: String,
    pub review_user_id: Option<i32>,
    pub review_rating: Option<f64>,
    pub review_text: Option<String>,
    pub reviewer_first_name: Option<String>,
    pub is_favorited: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewSummary {
    pub user_id: Option<i32>,
    pub user_name: Option<String>,
    pub rating: Option<f64>,
    pub comment: String,
}

/// A movie with all of its reviews, as shown on the list page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieListing {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub rating: f64,
    pub release_date: NaiveDate,
    pub genres: String,
    pub is_favorited: bool,
    pub reviews: Vec<ReviewSummary>,
}

#[derive(Debug, Serialize)]
pub struct MovieListResponse {
    pub shop_name: String,
    pub user_id: Option<i32>,
    pub first_name: String,
    pub available_movies: Vec<MovieListing>,
    pub favorite_movies: Vec<MovieListing>,
}

/// Form posted to `/movies/movieadded`
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct NewMovieForm {
    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 100,
        message = "Movie title must be between 1 and 100 characters long."
    ))]
    pub title: String,

    #[serde(default)]
    #[validate(length(
        min = 10,
        max = 1000,
        message = "Description must be between 10 and 1000 characters."
    ))]
    pub description: String,

    #[serde(default)]
    #[validate(custom(function = "validate_rating"))]
    pub rating: String,

    #[serde(default)]
    #[validate(custom(function = "validate_release_date"))]
    pub release_date: String,

    #[serde(default)]
    pub genres: String,

    #[serde(default)]
    pub tags: String,

    #[serde(default)]
    pub keywords: String,
}

impl NewMovieForm {
    /// Returns the form with every text field trimmed
    pub fn trimmed(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            rating: self.rating.trim().to_string(),
            release_date: self.release_date.trim().to_string(),
            genres: self.genres.trim().to_string(),
            tags: self.tags.trim().to_string(),
            keywords: self.keywords.trim().to_string(),
        }
    }
}

/// A movie ready to be inserted, after validation and defaults
#[derive(Debug, Clone, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub description: String,
    pub rating: f64,
    pub release_date: NaiveDate,
    pub genres: String,
    pub tags: String,
    pub keywords: String,
}

/// Form posted to `/movies/add-movie` when importing an external movie
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportMovieForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub rating: Option<String>,
    pub release_date: Option<String>,
    pub genres: Option<String>,
    pub tags: Option<String>,
    pub keywords: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieIdForm {
    pub movie_id: i32,
}

/// Ordering choices of the movie search page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    MostReviews,
    HighestRating,
    NewestRelease,
}

impl SortBy {
    /// Unknown values mean "no particular order"
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "mostReviews" => Some(SortBy::MostReviews),
            "highestRating" => Some(SortBy::HighestRating),
            "newestRelease" => Some(SortBy::NewestRelease),
            _ => None,
        }
    }
}

/// Query string of `/movies/search_result`; empty values are ignored
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieSearchParams {
    pub title: Option<String>,
    pub min_rating: Option<String>,
    pub max_rating: Option<String>,
    pub review_content: Option<String>,
    pub description_content: Option<String>,
    pub release_year: Option<String>,
    pub sort_by: Option<String>,
    pub genres: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MovieSearchRow {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub rating: f64,
    pub release_date: NaiveDate,
    pub genres: String,
    pub review_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieSearchResult {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub rating: f64,
    /// Human readable date, e.g. "Fri Jul 16 2010"
    pub release_date: String,
    pub genres: String,
    pub review_count: i64,
}

impl From<MovieSearchRow> for MovieSearchResult {
    fn from(row: MovieSearchRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            rating: row.rating,
            release_date: row.release_date.format("%a %b %d %Y").to_string(),
            genres: row.genres,
            review_count: row.review_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MovieSearchResponse {
    pub shop_name: String,
    pub movies: Option<Vec<MovieSearchResult>>,
}

/// The latest page: complete popular TMDb movies next to the newest catalog rows
#[derive(Debug, Serialize)]
pub struct LatestMoviesResponse {
    pub shop_name: String,
    pub user_id: Option<i32>,
    pub user_name: String,
    pub latest_movies_from_api: Vec<crate::models::ExternalMovie>,
    pub latest_movies_from_db: Vec<Movie>,
}

/// A favorite of the current user, as listed on the preferences page
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct FavoriteMovie {
    pub id: i32,
    pub title: String,
    pub genres: String,
    pub tags: String,
    pub keywords: String,
    pub description: String,
    pub release_date: NaiveDate,
}

/// A movie suggested from the local catalog
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct RecommendedMovie {
    pub id: i32,
    pub title: String,
    pub genres: String,
    pub tags: String,
    pub keywords: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_result_formats_release_date() {
        let row = MovieSearchRow {
            id: 1,
            title: "Inception".to_string(),
            description: "Dreams within dreams".to_string(),
            rating: 8.8,
            release_date: NaiveDate::from_ymd_opt(2010, 7, 16).unwrap(),
            genres: "Action, Sci-Fi".to_string(),
            review_count: 3,
        };

        let result = MovieSearchResult::from(row);
        assert_eq!(result.release_date, "Fri Jul 16 2010");
        assert_eq!(result.review_count, 3);
    }

    #[test]
    fn test_sort_by_parse() {
        assert_eq!(SortBy::parse("mostReviews"), Some(SortBy::MostReviews));
        assert_eq!(SortBy::parse("highestRating"), Some(SortBy::HighestRating));
        assert_eq!(SortBy::parse("newestRelease"), Some(SortBy::NewestRelease));
        assert_eq!(SortBy::parse("alphabetical"), None);
    }

    #[test]
    fn test_new_movie_form_validation_messages() {
        let form = NewMovieForm {
            title: "Inception".to_string(),
            description: "short".to_string(),
            rating: "11".to_string(),
            release_date: "someday".to_string(),
            genres: String::new(),
            tags: String::new(),
            keywords: String::new(),
        };

        let errors = crate::validation::field_errors(&form.validate().unwrap_err());
        let messages: Vec<&str> = errors.iter().map(|e| e.msg.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Description must be between 10 and 1000 characters.",
                "Rating must be between 0 and 10.",
                "Release date must be a valid date.",
            ]
        );
    }
}
