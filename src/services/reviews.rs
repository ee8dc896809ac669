use sqlx::{PgPool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::{NewReview, ReviewTarget},
};

pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 10.0;

pub const RATING_OUT_OF_RANGE: &str = "Rating must be between 0 and 10";
pub const LOGIN_TO_REVIEW: &str = "You must be logged in to submit a review.";

/// Rejects ratings outside 0..=10 (and NaN)
pub fn check_rating(rating: f64) -> AppResult<()> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(AppError::InvalidInput(RATING_OUT_OF_RANGE.to_string()))
    }
}

/// Stores a review and refreshes the average rating of its target.
///
/// Both statements run in one transaction.
pub async fn submit(pool: &PgPool, review: &NewReview) -> AppResult<()> {
    check_rating(review.rating)?;

    let mut tx = pool.begin().await?;

    let (movie_id, book_id) = match review.target {
        ReviewTarget::Movie(id) => (Some(id), None),
        ReviewTarget::Book(id) => (None, Some(id)),
    };

    let missing = format!("No {} with id {}", review.target.label(), review.target.id());

    sqlx::query(
        r#"
        INSERT INTO reviews (movie_id, book_id, user_id, rating, review_text)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(movie_id)
    .bind(book_id)
    .bind(review.user_id)
    .bind(review.rating)
    .bind(&review.review_text)
    .execute(&mut *tx)
    .await
    .map_err(|e| AppError::from_constraint(e, "Review already exists", &missing))?;

    refresh_average(&mut tx, review.target).await?;

    tx.commit().await?;

    tracing::info!(
        review_target = review.target.label(),
        target_id = review.target.id(),
        user_id = review.user_id,
        rating = review.rating,
        "Review submitted"
    );

    Ok(())
}

async fn refresh_average(
    tx: &mut Transaction<'_, Postgres>,
    target: ReviewTarget,
) -> AppResult<()> {
    let sql = match target {
        ReviewTarget::Movie(_) => {
            r#"
            UPDATE movies
            SET rating = COALESCE((SELECT AVG(rating) FROM reviews WHERE movie_id = $1), 0)
            WHERE id = $1
            "#
        }
        ReviewTarget::Book(_) => {
            r#"
            UPDATE books
            SET rating = (SELECT AVG(rating) FROM reviews WHERE book_id = $1)
            WHERE id = $1
            "#
        }
    };

    let result = sqlx::query(sql).bind(target.id()).execute(&mut **tx).await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "No {} with id {}",
            target.label(),
            target.id()
        )));
    }

    Ok(())
}
