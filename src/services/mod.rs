pub mod auth_service;
pub mod book_service;
pub mod saved_books_service;
