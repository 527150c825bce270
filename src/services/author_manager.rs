//! Author domain rules: the name uniqueness invariant

use std::sync::Arc;

use chrono::NaiveDate;

use super::ids::IdGenerator;
use crate::{
    error::{AppError, AppResult},
    models::author::{Author, AUTHOR_MAX_NAME_LENGTH},
    repository::AuthorRepository,
};

/// Creates and renames authors while keeping names unique.
///
/// The manager never persists anything; callers insert or update the
/// returned/mutated author themselves.
#[derive(Clone)]
pub struct AuthorManager {
    authors: Arc<dyn AuthorRepository>,
    id_generator: Arc<dyn IdGenerator>,
}

fn check_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("Author name cannot be empty".to_string()));
    }
    if name.chars().count() as u64 > AUTHOR_MAX_NAME_LENGTH {
        return Err(AppError::Validation(format!(
            "Author name cannot be longer than {} characters",
            AUTHOR_MAX_NAME_LENGTH
        )));
    }
    Ok(())
}

impl AuthorManager {
    pub fn new(authors: Arc<dyn AuthorRepository>, id_generator: Arc<dyn IdGenerator>) -> Self {
        Self {
            authors,
            id_generator,
        }
    }

    /// Build a new, not yet persisted author
    pub async fn create(
        &self,
        name: &str,
        birth_date: NaiveDate,
        short_bio: Option<String>,
    ) -> AppResult<Author> {
        check_name(name)?;

        if self.authors.find_by_name(name).await?.is_some() {
            return Err(AppError::AuthorAlreadyExists(name.to_string()));
        }

        Ok(Author::new(
            self.id_generator.generate(),
            name.to_string(),
            birth_date,
            short_bio,
        ))
    }

    /// Rename an author in place; renaming to the current name is a no-op
    pub async fn rename(&self, author: &mut Author, new_name: &str) -> AppResult<()> {
        check_name(new_name)?;

        if let Some(existing) = self.authors.find_by_name(new_name).await? {
            if existing.id != author.id {
                return Err(AppError::AuthorAlreadyExists(new_name.to_string()));
            }
        }

        author.set_name(new_name.to_string());
        Ok(())
    }
}
