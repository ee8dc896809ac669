use serde::Deserialize;

/// What a review is attached to; a review row references exactly one of them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewTarget {
    Movie(i32),
    Book(i32),
}

impl ReviewTarget {
    pub fn id(&self) -> i32 {
        match self {
            ReviewTarget::Movie(id) | ReviewTarget::Book(id) => *id,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReviewTarget::Movie(_) => "movie",
            ReviewTarget::Book(_) => "book",
        }
    }
}

/// Review form posted to `/movies/review`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieReviewForm {
    pub movie_id: i32,
    pub rating: f64,
    #[serde(default)]
    pub comment: String,
}

/// Review form posted to `/books/review`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookReviewForm {
    pub book_id: i32,
    pub rating: f64,
    #[serde(default)]
    pub comment: String,
}

/// A review that passed validation and is ready to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub target: ReviewTarget,
    pub user_id: i32,
    pub rating: f64,
    pub review_text: String,
}
