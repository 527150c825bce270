//! Author application service

use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::author_manager::AuthorManager;
use crate::{
    error::AppResult,
    models::{
        author::{AuthorDto, AuthorQuery, AuthorSearch, CreateAuthor, UpdateAuthor},
        query::PagedResult,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
    manager: AuthorManager,
}

impl AuthorsService {
    pub fn new(repository: Repository, manager: AuthorManager) -> Self {
        Self {
            repository,
            manager,
        }
    }

    /// Get author by ID
    pub async fn get(&self, id: Uuid) -> AppResult<AuthorDto> {
        let author = self.repository.authors.get(id).await?;
        Ok(author.into())
    }

    /// List authors, sorted by name unless the query says otherwise
    pub async fn list(&self, query: &AuthorQuery) -> AppResult<PagedResult<AuthorDto>> {
        let search = AuthorSearch::from_query(query)?;

        let authors = self.repository.authors.list(&search).await?;
        let total_count = self.repository.authors.count(&search).await?;

        Ok(PagedResult {
            total_count,
            items: authors.into_iter().map(AuthorDto::from).collect(),
        })
    }

    /// Create an author with a unique name
    #[tracing::instrument(skip(self, data), fields(name = %data.name))]
    pub async fn create(&self, data: &CreateAuthor) -> AppResult<AuthorDto> {
        data.validate()?;

        let author = self
            .manager
            .create(&data.name, data.birth_date, data.short_bio.clone())
            .await?;
        self.repository.authors.insert(&author).await?;

        info!(author_id = %author.id, "Created author");
        Ok(author.into())
    }

    /// Update an author; a changed name goes through the uniqueness check
    #[tracing::instrument(skip(self, data))]
    pub async fn update(&self, id: Uuid, data: &UpdateAuthor) -> AppResult<()> {
        data.validate()?;

        let mut author = self.repository.authors.get(id).await?;

        if author.name() != data.name {
            self.manager.rename(&mut author, &data.name).await?;
        }

        author.birth_date = data.birth_date;
        author.short_bio = data.short_bio.clone();
        author.last_modification_time = Some(Utc::now());

        self.repository.authors.update(&author).await?;

        info!(author_id = %id, "Updated author");
        Ok(())
    }

    /// Delete an author (and, through the store, their books)
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.authors.delete(id).await?;
        info!(author_id = %id, "Deleted author");
        Ok(())
    }
}
