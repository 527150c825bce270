//! Repository layer for database operations

pub mod authors;
pub mod books;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        author::{Author, AuthorSearch},
        book::{Book, BookSearch, BookWithAuthor},
    },
};

/// Persistence gateway for authors
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    /// Get author by ID, `NotFound` if absent
    async fn get(&self, id: Uuid) -> AppResult<Author>;

    /// Exact, case-sensitive name lookup
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Author>>;

    /// One page of authors matching the search
    async fn list(&self, search: &AuthorSearch) -> AppResult<Vec<Author>>;

    /// Number of authors matching the search filter, ignoring pagination
    async fn count(&self, search: &AuthorSearch) -> AppResult<i64>;

    /// Every author ordered by name
    async fn all(&self) -> AppResult<Vec<Author>>;

    /// Fails with `AuthorAlreadyExists` when the name is already stored
    async fn insert(&self, author: &Author) -> AppResult<()>;

    /// Fails with `NotFound` if absent, `AuthorAlreadyExists` on a name clash
    async fn update(&self, author: &Author) -> AppResult<()>;

    /// Delete author and their books, `NotFound` if absent
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Persistence gateway for books, always read joined with the author name
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn get(&self, id: Uuid) -> AppResult<BookWithAuthor>;

    async fn list(&self, search: &BookSearch) -> AppResult<Vec<BookWithAuthor>>;

    async fn count(&self) -> AppResult<i64>;

    /// Fails with `NotFound` if the referenced author does not exist
    async fn insert(&self, book: &Book) -> AppResult<()>;

    async fn update(&self, book: &Book) -> AppResult<()>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Main repository struct holding the entity repositories
#[derive(Clone)]
pub struct Repository {
    pool: Option<Pool<Postgres>>,
    pub authors: Arc<dyn AuthorRepository>,
    pub books: Arc<dyn BookRepository>,
}

impl Repository {
    /// Create a Postgres-backed repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            authors: Arc::new(authors::PgAuthorRepository::new(pool.clone())),
            books: Arc::new(books::PgBookRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Create a repository keeping everything in process memory
    pub fn in_memory() -> Self {
        let store = Arc::new(memory::MemoryRepository::new());
        Self {
            pool: None,
            authors: store.clone(),
            books: store,
        }
    }

    /// Check that the backing store answers
    pub async fn ping(&self) -> AppResult<()> {
        if let Some(pool) = &self.pool {
            sqlx::query("SELECT 1").execute(pool).await?;
        }
        Ok(())
    }
}

/// Escape `%`, `_` and `\` so user input matches literally inside LIKE
pub(crate) fn like_pattern(filter: &str) -> String {
    let mut pattern = String::with_capacity(filter.len() + 2);
    pattern.push('%');
    for c in filter.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("Tol"), "%Tol%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }
}
