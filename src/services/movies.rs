//! Movie catalog: local CRUD and search, plus views over TMDb data.

use std::sync::Arc;

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    error::{AppError, AppResult},
    models::{
        tmdb::{NOT_AVAILABLE, NO_DESCRIPTION, NO_KEYWORDS, NO_TAGS, UNTITLED},
        ExternalMovie, ImportMovieForm, Movie, MovieListRow, MovieListing, MovieSearchParams,
        MovieSearchResult, MovieSearchRow, NewMovie, NewMovieForm, NowPlayingMovie,
        PopularMovieReviews, ReviewSummary, SortBy,
    },
    services::{books::escape_like, providers::MovieMetadataProvider},
    text::{limit_words, strip_html_tags},
};

pub const GENRE_VOCABULARY: [&str; 20] = [
    "Action", "Adventure", "Comedy", "Drama", "Fantasy", "Horror", "Mystery", "Romance", "Sci-Fi",
    "Thriller", "Western", "Musical", "War", "Historical", "Biography", "Crime", "Family",
    "Animation", "Documentary", "Sports",
];

pub const TAG_VOCABULARY: [&str; 19] = [
    "Epic", "Heroic", "Magical", "Survival", "Romantic", "Space", "Suspenseful", "Gritty",
    "Lighthearted", "Dark", "Intense", "Emotional", "Exciting", "Mysterious", "Heartwarming",
    "Adventurous", "Thrilling", "Captivating", "Dramatic",
];

pub const KEYWORD_VOCABULARY: [&str; 20] = [
    "Adventure", "Hero", "Fight", "Love", "Space", "Magic", "Mystery", "Horror", "Thrill", "Epic",
    "Journey", "Quest", "Battle", "Heroine", "Fantasy", "War", "Challenge", "Exploration",
    "Escape", "Discovery",
];

/// Items drawn when a new movie comes without genres, tags or keywords
pub const RANDOM_FILL_COUNT: usize = 3;

/// TMDb serves at most this many popular pages
pub const MAX_POPULAR_PAGE: u32 = 500;

pub const LATEST_EXTERNAL_COUNT: usize = 5;
pub const LATEST_LOCAL_COUNT: i64 = 5;
pub const NOW_PLAYING_COUNT: usize = 5;
pub const POPULAR_REVIEW_MOVIES: usize = 5;
pub const REVIEWS_PER_MOVIE: usize = 3;
pub const REVIEW_WORD_LIMIT: usize = 30;

pub const IMPORT_REJECTED: &str = "Failed to add movie. Missing or invalid required fields.";

const MOVIE_COLUMNS: &str = "id, title, description, rating, release_date, genres, tags, keywords";

// ============================================================================
// Adding movies
// ============================================================================

fn split_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|item| !item.is_empty())
}

/// Picks `count` distinct vocabulary items not in `exclude`, joined by ", "
pub fn random_unique_items<R: Rng + ?Sized>(
    rng: &mut R,
    vocabulary: &[&str],
    count: usize,
    exclude: &[&str],
) -> String {
    let mut candidates: Vec<&str> = vocabulary
        .iter()
        .copied()
        .filter(|item| !exclude.contains(item))
        .collect();
    candidates.shuffle(rng);
    candidates.truncate(count);
    candidates.join(", ")
}

/// Turns a validated form into an insertable movie.
///
/// Empty genres, tags and keywords are drawn from the vocabularies. Tags never
/// repeat a genre and keywords never repeat a genre or tag.
pub fn prepare_new_movie<R: Rng + ?Sized>(form: NewMovieForm, rng: &mut R) -> AppResult<NewMovie> {
    let rating: f64 = form
        .rating
        .parse()
        .map_err(|_| AppError::InvalidInput(format!("Invalid rating: {}", form.rating)))?;
    let release_date = NaiveDate::parse_from_str(&form.release_date, "%Y-%m-%d").map_err(|_| {
        AppError::InvalidInput(format!("Invalid release date: {}", form.release_date))
    })?;

    let genres = if form.genres.is_empty() {
        random_unique_items(rng, &GENRE_VOCABULARY, RANDOM_FILL_COUNT, &[])
    } else {
        form.genres
    };

    let tags = if form.tags.is_empty() {
        let exclude: Vec<&str> = split_list(&genres).collect();
        random_unique_items(rng, &TAG_VOCABULARY, RANDOM_FILL_COUNT, &exclude)
    } else {
        form.tags
    };

    let keywords = if form.keywords.is_empty() {
        let exclude: Vec<&str> = split_list(&genres).chain(split_list(&tags)).collect();
        random_unique_items(rng, &KEYWORD_VOCABULARY, RANDOM_FILL_COUNT, &exclude)
    } else {
        form.keywords
    };

    Ok(NewMovie {
        title: form.title,
        description: form.description,
        rating,
        release_date,
        genres,
        tags,
        keywords,
    })
}

pub async fn add(pool: &PgPool, movie: &NewMovie) -> AppResult<i32> {
    let movie_id: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO movies (title, description, rating, release_date, genres, tags, keywords)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id
        "#,
    )
    .bind(&movie.title)
    .bind(&movie.description)
    .bind(movie.rating)
    .bind(movie.release_date)
    .bind(&movie.genres)
    .bind(&movie.tags)
    .bind(&movie.keywords)
    .fetch_one(pool)
    .await?;

    tracing::info!(movie_id = movie_id, title = %movie.title, "Movie added");

    Ok(movie_id)
}

/// Checks a movie picked from the latest page before it is imported.
///
/// Every field must be present and must not hold its placeholder value.
pub fn validate_import(form: ImportMovieForm) -> AppResult<NewMovie> {
    fn required(value: Option<String>, placeholder: &str) -> AppResult<String> {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty() && v != placeholder)
            .ok_or_else(|| AppError::InvalidInput(IMPORT_REJECTED.to_string()))
    }

    let title = required(form.title, UNTITLED)?;
    let description = required(form.description, NO_DESCRIPTION)?;
    let rating = required(form.rating, NOT_AVAILABLE)?;
    let release_date = required(form.release_date, NOT_AVAILABLE)?;
    let genres = required(form.genres, NOT_AVAILABLE)?;
    let tags = required(form.tags, NO_TAGS)?;
    let keywords = required(form.keywords, NO_KEYWORDS)?;

    let rating: f64 = rating
        .parse()
        .ok()
        .filter(|r: &f64| r.is_finite())
        .ok_or_else(|| AppError::InvalidInput(IMPORT_REJECTED.to_string()))?;
    let release_date = NaiveDate::parse_from_str(&release_date, "%Y-%m-%d")
        .map_err(|_| AppError::InvalidInput(IMPORT_REJECTED.to_string()))?;

    Ok(NewMovie {
        title,
        description,
        rating,
        release_date,
        genres,
        tags,
        keywords,
    })
}

// ============================================================================
// Listing, favorites and search
// ============================================================================

/// Folds movie/review join rows into one listing per movie.
///
/// Rows must be ordered by movie id.
pub fn group_movie_rows(rows: Vec<MovieListRow>) -> Vec<MovieListing> {
    let mut movies: Vec<MovieListing> = Vec::new();

    for row in rows {
        let review = row.review_user_id.map(|user_id| ReviewSummary {
            user_id: Some(user_id),
            user_name: row.reviewer_first_name.clone(),
            rating: row.review_rating,
            comment: row.review_text.clone().unwrap_or_default(),
        });

        match movies.last_mut() {
            Some(movie) if movie.id == row.id => {
                movie.is_favorited |= row.is_favorited;
                movie.reviews.extend(review);
            }
            _ => movies.push(MovieListing {
                id: row.id,
                title: row.title,
                description: row.description,
                rating: row.rating,
                release_date: row.release_date,
                genres: row.genres,
                is_favorited: row.is_favorited,
                reviews: review.into_iter().collect(),
            }),
        }
    }

    movies
}

/// Every movie with its reviews; `is_favorited` refers to `user_id`
pub async fn list(pool: &PgPool, user_id: Option<i32>) -> AppResult<Vec<MovieListing>> {
    let rows = sqlx::query_as::<_, MovieListRow>(
        r#"
        SELECT m.id, m.title, m.description, m.rating, m.release_date, m.genres,
               r.user_id AS review_user_id,
               r.rating AS review_rating,
               r.review_text,
               u.first_name AS reviewer_first_name,
               (uf.user_id IS NOT NULL) AS is_favorited
        FROM movies m
        LEFT JOIN reviews r ON r.movie_id = m.id
        LEFT JOIN users u ON u.id = r.user_id
        LEFT JOIN user_favorites uf ON uf.movie_id = m.id AND uf.user_id = $1
        ORDER BY m.id, r.id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(group_movie_rows(rows))
}

/// Marks a movie as favorite; repeating it is a no-op
pub async fn favorite(pool: &PgPool, user_id: i32, movie_id: i32) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO user_favorites (user_id, movie_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, movie_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(movie_id)
    .execute(pool)
    .await
    .map_err(|e| {
        AppError::from_constraint(e, "Already a favorite", &format!("No movie with id {}", movie_id))
    })?;

    tracing::debug!(user_id = user_id, movie_id = movie_id, "Favorite added");
    Ok(())
}

pub async fn unfavorite(pool: &PgPool, user_id: i32, movie_id: i32) -> AppResult<()> {
    sqlx::query("DELETE FROM user_favorites WHERE user_id = $1 AND movie_id = $2")
        .bind(user_id)
        .bind(movie_id)
        .execute(pool)
        .await?;

    tracing::debug!(user_id = user_id, movie_id = movie_id, "Favorite removed");
    Ok(())
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Builds the filtered search query; empty or unparseable filters are ignored
pub fn build_search_query(params: &MovieSearchParams) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::<Postgres>::new(
        r#"
        SELECT m.id, m.title, m.description, m.rating, m.release_date, m.genres,
               COUNT(r.id) AS review_count
        FROM movies m
        LEFT JOIN reviews r ON r.movie_id = m.id
        WHERE 1=1"#,
    );

    if let Some(title) = non_empty(&params.title) {
        query
            .push(" AND m.title ILIKE ")
            .push_bind(format!("%{}%", escape_like(title)));
    }
    if let Some(min) = non_empty(&params.min_rating).and_then(|v| v.parse::<f64>().ok()) {
        query.push(" AND m.rating >= ").push_bind(min);
    }
    if let Some(max) = non_empty(&params.max_rating).and_then(|v| v.parse::<f64>().ok()) {
        query.push(" AND m.rating <= ").push_bind(max);
    }
    if let Some(text) = non_empty(&params.review_content) {
        query
            .push(" AND r.review_text ILIKE ")
            .push_bind(format!("%{}%", escape_like(text)));
    }
    if let Some(text) = non_empty(&params.description_content) {
        query
            .push(" AND m.description ILIKE ")
            .push_bind(format!("%{}%", escape_like(text)));
    }
    if let Some(year) = non_empty(&params.release_year).and_then(|v| v.parse::<i32>().ok()) {
        query
            .push(" AND EXTRACT(YEAR FROM m.release_date)::INT = ")
            .push_bind(year);
    }

    let genres: Vec<String> = non_empty(&params.genres)
        .map(|g| split_list(g).map(|genre| format!("%{}%", escape_like(genre))).collect())
        .unwrap_or_default();
    if !genres.is_empty() {
        query.push(" AND (");
        let mut any_genre = query.separated(" OR ");
        for pattern in genres {
            any_genre.push("m.genres ILIKE ");
            any_genre.push_bind_unseparated(pattern);
        }
        any_genre.push_unseparated(")");
    }

    query.push(" GROUP BY m.id");

    let order = match params.sort_by.as_deref().and_then(SortBy::parse) {
        Some(SortBy::MostReviews) => " ORDER BY review_count DESC, m.id",
        Some(SortBy::HighestRating) => " ORDER BY m.rating DESC, m.id",
        Some(SortBy::NewestRelease) => " ORDER BY m.release_date DESC, m.id",
        None => " ORDER BY m.id",
    };
    query.push(order);

    query
}

pub async fn search(pool: &PgPool, params: &MovieSearchParams) -> AppResult<Vec<MovieSearchResult>> {
    let rows = build_search_query(params)
        .build_query_as::<MovieSearchRow>()
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(MovieSearchResult::from).collect())
}

// ============================================================================
// TMDb views
// ============================================================================

pub fn random_popular_page() -> u32 {
    rand::thread_rng().gen_range(1..=MAX_POPULAR_PAGE)
}

/// Complete movies from one popular page.
///
/// Details and keywords of every entry are fetched concurrently; results keep
/// the page order and incomplete entries are dropped.
pub async fn external_latest(
    metadata: Arc<dyn MovieMetadataProvider>,
    page: u32,
) -> AppResult<Vec<ExternalMovie>> {
    let popular = metadata.popular(page).await?;

    let handles: Vec<_> = popular
        .results
        .into_iter()
        .take(LATEST_EXTERNAL_COUNT)
        .map(|entry| {
            let metadata = Arc::clone(&metadata);
            tokio::spawn(async move {
                let (details, keywords) = tokio::try_join!(
                    metadata.movie_details(entry.id),
                    metadata.movie_keywords(entry.id)
                )?;
                Ok::<_, AppError>(ExternalMovie::from_tmdb(details, keywords))
            })
        })
        .collect();

    let mut movies = Vec::with_capacity(handles.len());
    for handle in handles {
        let movie = handle
            .await
            .map_err(|e| AppError::Internal(format!("Metadata task failed: {}", e)))??;
        match movie {
            Some(movie) => movies.push(movie),
            None => tracing::debug!(page = page, "Skipping incomplete TMDb movie"),
        }
    }

    tracing::info!(page = page, movies = movies.len(), "Latest TMDb movies resolved");

    Ok(movies)
}

/// The most recently added catalog rows
pub async fn newest_local(pool: &PgPool) -> AppResult<Vec<Movie>> {
    let movies = sqlx::query_as::<_, Movie>(&format!(
        "SELECT {} FROM movies ORDER BY id DESC LIMIT $1",
        MOVIE_COLUMNS
    ))
    .bind(LATEST_LOCAL_COUNT)
    .fetch_all(pool)
    .await?;
    Ok(movies)
}

pub async fn now_playing(metadata: &dyn MovieMetadataProvider) -> AppResult<Vec<NowPlayingMovie>> {
    let page = metadata.now_playing().await?;

    Ok(page
        .results
        .into_iter()
        .take(NOW_PLAYING_COUNT)
        .map(|movie| NowPlayingMovie {
            title: movie.title.unwrap_or_else(|| UNTITLED.to_string()),
            release_date: movie.release_date,
        })
        .collect())
}

/// Cleans a raw review for display: markup removed, word count limited
pub fn review_excerpt(content: &str) -> String {
    limit_words(&strip_html_tags(content), REVIEW_WORD_LIMIT)
}

/// A few random popular movies, each with its first reviews
pub async fn popular_reviews(
    metadata: &dyn MovieMetadataProvider,
) -> AppResult<Vec<PopularMovieReviews>> {
    let mut entries = metadata.popular(1).await?.results;
    entries.shuffle(&mut rand::thread_rng());
    entries.truncate(POPULAR_REVIEW_MOVIES);

    let mut movies = Vec::with_capacity(entries.len());
    for entry in entries {
        let details = metadata.movie_details(entry.id).await?;
        let reviews = metadata.movie_reviews(entry.id).await?;

        movies.push(PopularMovieReviews {
            title: details.title.unwrap_or_else(|| UNTITLED.to_string()),
            rating: details.vote_average,
            description: details.overview,
            reviews: reviews
                .results
                .iter()
                .take(REVIEWS_PER_MOVIE)
                .map(|review| review_excerpt(&review.content))
                .collect(),
        });
    }

    Ok(movies)
}
