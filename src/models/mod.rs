//! Data models for the bookstore

pub mod author;
pub mod book;
pub mod query;
pub mod user;

// Re-export commonly used types
pub use author::{Author, AuthorDto};
pub use book::{Book, BookDto, BookType, BookWithAuthor};
pub use query::{PageRequest, PagedResult, SortDirection};
pub use user::{Permission, UserClaims};
