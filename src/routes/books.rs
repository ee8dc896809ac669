use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, Query, State},
    http::StatusCode,
    response::Redirect,
    Form, Json,
};

use crate::{
    error::{AppError, AppResult},
    middleware::{CurrentUser, MaybeUser},
    models::{
        Book, BookResponse, BookReviewForm, BookSearchQuery, NewBookForm, NewReview, ReviewTarget,
    },
    services::{books, reviews},
    state::AppState,
    validation::validate_form,
};

fn responses(books: Vec<Book>) -> Json<Vec<BookResponse>> {
    Json(books.into_iter().map(BookResponse::from).collect())
}

pub async fn list(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<BookResponse>>> {
    Ok(responses(books::list(&state.db_pool).await?))
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BookSearchQuery>,
) -> AppResult<Json<Vec<BookResponse>>> {
    Ok(responses(
        books::search(&state.db_pool, query.search_text.trim()).await?,
    ))
}

pub async fn bargains(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<BookResponse>>> {
    Ok(responses(books::bargains(&state.db_pool).await?))
}

pub async fn add(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
    Form(form): Form<NewBookForm>,
) -> AppResult<(StatusCode, Json<BookResponse>)> {
    validate_form(&form)?;
    let book = books::add(&state.db_pool, &form).await?;
    Ok((StatusCode::CREATED, Json(BookResponse::from(book))))
}

pub async fn review(
    State(state): State<Arc<AppState>>,
    MaybeUser(user): MaybeUser,
    form: Result<Form<BookReviewForm>, FormRejection>,
) -> AppResult<Redirect> {
    let user = user.ok_or_else(|| AppError::Forbidden(reviews::LOGIN_TO_REVIEW.to_string()))?;
    let Form(form) = form.map_err(|e| AppError::InvalidInput(e.body_text()))?;

    let review = NewReview {
        target: ReviewTarget::Book(form.book_id),
        user_id: user.id,
        rating: form.rating,
        review_text: form.comment.trim().to_string(),
    };
    reviews::submit(&state.db_pool, &review).await?;

    Ok(Redirect::to(&state.config.path("/books/list")))
}
