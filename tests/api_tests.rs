mod common;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use serde_json::Value;

use common::offline_server;

#[tokio::test]
async fn test_health_check() {
    let server = offline_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_home_greets_guest() {
    let server = offline_server();
    let response = server.get("/").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["user_name"], "Guest");
    assert_eq!(body["shop_name"], "Betty's Movies");
    assert!(body["user_id"].is_null());
}

#[tokio::test]
async fn test_request_id_is_echoed_or_generated() {
    let server = offline_server();

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("trace-me-42"),
        )
        .await;
    assert_eq!(response.header("x-request-id"), "trace-me-42");

    let response = server.get("/health").await;
    let generated = response.header("x-request-id");
    assert_eq!(generated.to_str().unwrap().len(), 36);
}

#[tokio::test]
async fn test_registration_validation_returns_errors_and_previous_data() {
    let server = offline_server();

    let response = server
        .post("/users/registered")
        .form(&[
            ("username", ""),
            ("first", "Betty"),
            ("last", "Books"),
            ("email", "not-an-email"),
            ("password", "short"),
        ])
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    let messages: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["msg"].as_str().unwrap())
        .collect();
    assert_eq!(
        messages,
        vec![
            "Invalid email address",
            "Password must be at least 8 characters long",
            "Username is required",
        ]
    );
    assert_eq!(body["previous_data"]["first"], "Betty");
    assert!(body["previous_data"].get("password").is_none());
}

#[tokio::test]
async fn test_reset_password_rejects_short_password() {
    let server = offline_server();
    let response = server
        .post("/users/resetpassword")
        .form(&[("email", "betty@example.com"), ("newPassword", "short")])
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_login_required_routes_redirect() {
    let server = offline_server();

    let response = server.get("/users/logout").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/users/login");

    let response = server
        .post("/movies/favorite")
        .form(&[("movieId", "1")])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);

    let response = server
        .post("/books/bookadded")
        .form(&[("name", "Dune"), ("price", "9.99")])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/users/login");
}

#[tokio::test]
async fn test_api_provision_is_restricted() {
    let server = offline_server();
    let response = server.get("/api-provision").await;
    response.assert_status(StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["error"], "Access restricted");
}

#[tokio::test]
async fn test_recommendations_require_session() {
    let server = offline_server();

    for path in ["/movies/recommendations", "/movies/user-preferences"] {
        let response = server.get(path).await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: Value = response.json();
        assert_eq!(body["error"], "User not logged in.");
    }
}

#[tokio::test]
async fn test_review_requires_session() {
    let server = offline_server();
    let response = server
        .post("/movies/review")
        .form(&[("movieId", "1"), ("rating", "8"), ("comment", "Great")])
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["error"], "You must be logged in to submit a review.");
}

#[tokio::test]
async fn test_now_playing_lists_five_titles() {
    let server = offline_server();
    let response = server.get("/movies/now-playing").await;
    response.assert_status_ok();
    let body: Value = response.json();
    let movies = body["latest_movies"].as_array().unwrap();
    assert_eq!(movies.len(), 5);
    assert_eq!(movies[0]["title"], "Stub Movie 1");
}

#[tokio::test]
async fn test_popular_reviews_strip_markup() {
    let server = offline_server();
    let response = server.get("/movies/popular-reviews").await;
    response.assert_status_ok();
    let body: Value = response.json();
    let movies = body["movies"].as_array().unwrap();
    assert_eq!(movies.len(), 5);
    assert_eq!(movies[0]["reviews"][0], "Funny and warm");
}

#[tokio::test]
async fn test_review_checks_session_before_form() {
    let server = offline_server();

    let response = server
        .post("/movies/review")
        .form(&[("movieId", "1"), ("rating", "great")])
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["error"], "You must be logged in to submit a review.");

    let response = server
        .post("/books/review")
        .form(&[("comment", "No book id")])
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["error"], "You must be logged in to submit a review.");
}
