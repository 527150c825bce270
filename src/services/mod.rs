//! Business logic services

pub mod author_manager;
pub mod authors;
pub mod books;
pub mod ids;

use std::sync::Arc;

use crate::{error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub authors: authors::AuthorsService,
    pub books: books::BooksService,
    repository: Repository,
}

impl Services {
    /// Create all services over the given repository
    pub fn new(repository: Repository, id_generator: Arc<dyn ids::IdGenerator>) -> Self {
        let manager = author_manager::AuthorManager::new(
            repository.authors.clone(),
            id_generator.clone(),
        );
        Self {
            authors: authors::AuthorsService::new(repository.clone(), manager),
            books: books::BooksService::new(repository.clone(), id_generator),
            repository,
        }
    }

    /// Services over a fresh in-memory store with random UUIDs
    pub fn in_memory() -> Self {
        Self::new(Repository::in_memory(), Arc::new(ids::UuidV4Generator))
    }

    /// Check that the backing store answers
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
