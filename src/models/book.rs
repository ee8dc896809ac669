use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::{format_price_cents, validate_alphanumeric, validate_price};

/// A book as stored in the `books` table
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Book {
    pub id: i32,
    pub name: String,
    pub author: Option<String>,
    /// Price in cents (e.g., 1999 = 19.99)
    pub price_cents: i64,
    pub description: Option<String>,
    pub rating: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub id: i32,
    pub name: String,
    pub author: Option<String>,
    pub price: String,
    pub price_cents: i64,
    pub description: Option<String>,
    pub rating: Option<f64>,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            name: book.name,
            author: book.author,
            price: format_price_cents(book.price_cents),
            price_cents: book.price_cents,
            description: book.description,
            rating: book.rating,
        }
    }
}

/// Form posted to `/books/bookadded`
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct NewBookForm {
    #[serde(default)]
    #[validate(
        length(
            min = 1,
            max = 100,
            message = "Book name must be between 1 and 100 characters long."
        ),
        custom(function = "validate_alphanumeric")
    )]
    pub name: String,

    #[serde(default)]
    #[validate(custom(function = "validate_price"))]
    pub price: String,
}

#[derive(Debug, Deserialize)]
pub struct BookSearchQuery {
    #[serde(default)]
    pub search_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_response_formats_price() {
        let book = Book {
            id: 1,
            name: "Dune".to_string(),
            author: Some("Frank Herbert".to_string()),
            price_cents: 1850,
            description: None,
            rating: None,
        };

        let response = BookResponse::from(book);
        assert_eq!(response.price, "18.50");
        assert_eq!(response.price_cents, 1850);
    }

    #[test]
    fn test_new_book_form_rejects_symbols() {
        let form = NewBookForm {
            name: "Dune!".to_string(),
            price: "12.999".to_string(),
        };

        let errors = form.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("price"));
    }

    #[test]
    fn test_new_book_form_accepts_valid_input() {
        let form = NewBookForm {
            name: "Dune".to_string(),
            price: "12.99".to_string(),
        };
        assert!(form.validate().is_ok());
    }
}
