pub mod book;
pub mod movie;
pub mod recommendation;
pub mod review;
pub mod tmdb;
pub mod user;
pub mod web_search;

pub use book::{Book, BookResponse, BookSearchQuery, NewBookForm};
pub use movie::{
    FavoriteMovie, ImportMovieForm, LatestMoviesResponse, Movie, MovieIdForm, MovieListResponse,
    MovieListRow, MovieListing, MovieSearchParams, MovieSearchResponse, MovieSearchResult, MovieSearchRow,
    NewMovie, NewMovieForm, RecommendedMovie, ReviewSummary, SortBy,
};
pub use recommendation::{
    ApiRecommendation, RecommendationResponse, SnippetLimits, UserPreferencesResponse,
};
pub use review::{BookReviewForm, MovieReviewForm, NewReview, ReviewTarget};
pub use tmdb::{
    ExternalMovie, NowPlayingMovie, PopularMovieReviews, TmdbKeywords, TmdbMovieDetails,
    TmdbMoviePage, TmdbReviewPage,
};
pub use user::{LoginForm, RegisterForm, ResetPasswordForm, SessionUser, User};
pub use web_search::SearchHit;
