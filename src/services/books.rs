use sqlx::PgPool;

use crate::{
    error::{AppError, AppResult},
    models::{Book, NewBookForm},
    validation::parse_price_cents,
};

/// Books cheaper than this many cents are bargains
pub const BARGAIN_THRESHOLD_CENTS: i64 = 2000;

const BOOK_COLUMNS: &str = "id, name, author, price_cents, description, rating";

pub async fn list(pool: &PgPool) -> AppResult<Vec<Book>> {
    let books = sqlx::query_as::<_, Book>(&format!(
        "SELECT {} FROM books ORDER BY id",
        BOOK_COLUMNS
    ))
    .fetch_all(pool)
    .await?;
    Ok(books)
}

/// Case-insensitive substring match on the book name
pub async fn search(pool: &PgPool, text: &str) -> AppResult<Vec<Book>> {
    let pattern = format!("%{}%", escape_like(text));
    let books = sqlx::query_as::<_, Book>(&format!(
        "SELECT {} FROM books WHERE name ILIKE $1 ORDER BY id",
        BOOK_COLUMNS
    ))
    .bind(pattern)
    .fetch_all(pool)
    .await?;
    Ok(books)
}

pub async fn bargains(pool: &PgPool) -> AppResult<Vec<Book>> {
    let books = sqlx::query_as::<_, Book>(&format!(
        "SELECT {} FROM books WHERE price_cents < $1 ORDER BY price_cents, id",
        BOOK_COLUMNS
    ))
    .bind(BARGAIN_THRESHOLD_CENTS)
    .fetch_all(pool)
    .await?;
    Ok(books)
}

/// Inserts a validated book form
pub async fn add(pool: &PgPool, form: &NewBookForm) -> AppResult<Book> {
    let price_cents = parse_price_cents(&form.price)
        .ok_or_else(|| AppError::InvalidInput(format!("Invalid price: {}", form.price)))?;

    let book = sqlx::query_as::<_, Book>(&format!(
        "INSERT INTO books (name, price_cents) VALUES ($1, $2) RETURNING {}",
        BOOK_COLUMNS
    ))
    .bind(form.name.trim())
    .bind(price_cents)
    .fetch_one(pool)
    .await?;

    tracing::info!(book_id = book.id, name = %book.name, price_cents = price_cents, "Book added");

    Ok(book)
}

/// Escapes LIKE wildcards so user text matches literally
pub(crate) fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("dune"), "dune");
        assert_eq!(escape_like("100%_real\\"), "100\\%\\_real\\\\");
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_add_search_and_bargains(pool: PgPool) {
        let cheap = NewBookForm {
            name: "Dune".to_string(),
            price: "9.99".to_string(),
        };
        let pricey = NewBookForm {
            name: "Codex".to_string(),
            price: "45".to_string(),
        };
        add(&pool, &cheap).await.unwrap();
        add(&pool, &pricey).await.unwrap();

        let found = search(&pool, "dUn").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].price_cents, 999);

        let bargains = bargains(&pool).await.unwrap();
        assert_eq!(bargains.len(), 1);
        assert_eq!(bargains[0].name, "Dune");

        assert_eq!(list(&pool).await.unwrap().len(), 2);
    }
}
