pub mod books;
pub mod movies;
pub mod preferences;
pub mod providers;
pub mod recommendations;
pub mod reviews;
pub mod users;
