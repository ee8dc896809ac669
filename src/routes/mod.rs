use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::{
    middleware::{make_span_with_request_id, request_id_middleware},
    state::AppState,
};

pub mod books;
pub mod movies;
pub mod pages;
pub mod recommendations;
pub mod users;

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(state.config.session_secure)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            state.config.session_ttl_minutes,
        )));

    Router::new()
        .route("/", get(pages::home))
        .route("/about", get(pages::about))
        .route("/api-provision", get(pages::api_provision))
        .route("/health", get(pages::health_check))
        .nest("/users", user_routes())
        .nest("/books", book_routes())
        .nest("/movies", movie_routes())
        .route(
            "/api/recommendations/:user_id",
            get(recommendations::for_user),
        )
        .layer(session_layer)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

fn user_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/registered", post(users::register))
        .route("/resetpassword", post(users::reset_password))
        .route("/loggedin", post(users::login))
        .route("/logout", get(users::logout))
}

fn book_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/list", get(books::list))
        .route("/search_result", get(books::search))
        .route("/bookadded", post(books::add))
        .route("/bargainbooks", get(books::bargains))
        .route("/review", post(books::review))
}

fn movie_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/movieadded", post(movies::add))
        .route("/list", get(movies::list))
        .route("/favorite", post(movies::favorite))
        .route("/unfavorite", post(movies::unfavorite))
        .route("/review", post(movies::review))
        .route("/search_result", get(movies::search))
        .route("/latest", get(movies::latest))
        .route("/add-movie", post(movies::import))
        .route("/now-playing", get(movies::now_playing))
        .route("/popular-reviews", get(movies::popular_reviews))
        .route("/recommendations", get(recommendations::for_session))
        .route("/user-preferences", get(recommendations::user_preferences))
}
