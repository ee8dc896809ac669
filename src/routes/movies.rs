use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, Query, State},
    response::Redirect,
    Form, Json,
};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::{CurrentUser, MaybeUser},
    models::{
        ImportMovieForm, LatestMoviesResponse, MovieIdForm, MovieListResponse, MovieReviewForm,
        MovieSearchParams, MovieSearchResponse, NewMovieForm, NewReview, NowPlayingMovie,
        PopularMovieReviews, ReviewTarget,
    },
    services::{movies, reviews},
    state::AppState,
    validation::validate_form,
};

pub async fn add(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
    Form(form): Form<NewMovieForm>,
) -> AppResult<Redirect> {
    let form = form.trimmed();
    validate_form(&form)?;

    let movie = movies::prepare_new_movie(form, &mut rand::thread_rng())?;
    movies::add(&state.db_pool, &movie).await?;

    Ok(Redirect::to(&state.config.path("/movies/list")))
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    user: MaybeUser,
) -> AppResult<Json<MovieListResponse>> {
    let available_movies = movies::list(&state.db_pool, user.id()).await?;
    let favorite_movies = available_movies
        .iter()
        .filter(|movie| movie.is_favorited)
        .cloned()
        .collect();

    Ok(Json(MovieListResponse {
        shop_name: state.config.shop_name.clone(),
        user_id: user.id(),
        first_name: user.display_name(),
        available_movies,
        favorite_movies,
    }))
}

pub async fn favorite(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<MovieIdForm>,
) -> AppResult<Redirect> {
    movies::favorite(&state.db_pool, user.id, form.movie_id).await?;
    Ok(Redirect::to(&state.config.path("/movies/list")))
}

pub async fn unfavorite(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<MovieIdForm>,
) -> AppResult<Redirect> {
    movies::unfavorite(&state.db_pool, user.id, form.movie_id).await?;
    Ok(Redirect::to(&state.config.path("/movies/list")))
}

pub async fn review(
    State(state): State<Arc<AppState>>,
    MaybeUser(user): MaybeUser,
    form: Result<Form<MovieReviewForm>, FormRejection>,
) -> AppResult<Redirect> {
    let user = user.ok_or_else(|| AppError::Forbidden(reviews::LOGIN_TO_REVIEW.to_string()))?;
    let Form(form) = form.map_err(|e| AppError::InvalidInput(e.body_text()))?;

    let review = NewReview {
        target: ReviewTarget::Movie(form.movie_id),
        user_id: user.id,
        rating: form.rating,
        review_text: form.comment.trim().to_string(),
    };
    reviews::submit(&state.db_pool, &review).await?;

    Ok(Redirect::to(&state.config.path("/movies/list")))
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MovieSearchParams>,
) -> AppResult<Json<MovieSearchResponse>> {
    let results = movies::search(&state.db_pool, &params).await?;

    Ok(Json(MovieSearchResponse {
        shop_name: state.config.shop_name.clone(),
        movies: (!results.is_empty()).then_some(results),
    }))
}

pub async fn latest(
    State(state): State<Arc<AppState>>,
    user: MaybeUser,
) -> AppResult<Json<LatestMoviesResponse>> {
    let page = movies::random_popular_page();
    let latest_movies_from_api = movies::external_latest(state.metadata.clone(), page).await?;
    let latest_movies_from_db = movies::newest_local(&state.db_pool).await?;

    Ok(Json(LatestMoviesResponse {
        shop_name: state.config.shop_name.clone(),
        user_id: user.id(),
        user_name: user.display_name(),
        latest_movies_from_api,
        latest_movies_from_db,
    }))
}

pub async fn import(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
    Form(form): Form<ImportMovieForm>,
) -> AppResult<Redirect> {
    let movie = movies::validate_import(form)?;
    movies::add(&state.db_pool, &movie).await?;
    Ok(Redirect::to(&state.config.path("/movies/latest")))
}

pub async fn now_playing(State(state): State<Arc<AppState>>) -> AppResult<Json<Value>> {
    let latest_movies: Vec<NowPlayingMovie> = movies::now_playing(state.metadata.as_ref()).await?;
    Ok(Json(json!({
        "shop_name": state.config.shop_name,
        "latest_movies": latest_movies,
    })))
}

pub async fn popular_reviews(State(state): State<Arc<AppState>>) -> AppResult<Json<Value>> {
    let movies: Vec<PopularMovieReviews> =
        movies::popular_reviews(state.metadata.as_ref()).await?;
    Ok(Json(json!({
        "shop_name": state.config.shop_name,
        "movies": movies,
    })))
}
