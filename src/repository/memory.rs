//! In-memory repository, used for tests and database-less runs

use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AuthorRepository, BookRepository};
use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, AuthorSearch, AuthorSortField},
        book::{Book, BookSearch, BookSortField, BookWithAuthor},
        query::PageRequest,
    },
};

#[derive(Debug, Default)]
struct Store {
    authors: HashMap<Uuid, Author>,
    books: HashMap<Uuid, Book>,
}

impl Store {
    /// Mirrors the unique index on `authors.name`
    fn check_name_free(&self, author: &Author) -> AppResult<()> {
        let taken = self
            .authors
            .values()
            .any(|other| other.id != author.id && other.name() == author.name());
        if taken {
            return Err(AppError::AuthorAlreadyExists(author.name().to_string()));
        }
        Ok(())
    }

    fn author_name(&self, id: Uuid) -> AppResult<&str> {
        self.authors
            .get(&id)
            .map(Author::name)
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))
    }

    fn with_author(&self, book: &Book) -> AppResult<BookWithAuthor> {
        Ok(BookWithAuthor {
            book: book.clone(),
            author_name: self.author_name(book.author_id)?.to_string(),
        })
    }
}

fn page<T>(rows: Vec<T>, page: PageRequest) -> Vec<T> {
    rows.into_iter()
        .skip(page.skip as usize)
        .take(page.take as usize)
        .collect()
}

fn compare_authors(a: &Author, b: &Author, field: AuthorSortField) -> Ordering {
    match field {
        AuthorSortField::Name => a.name().cmp(b.name()),
        AuthorSortField::BirthDate => a.birth_date.cmp(&b.birth_date),
    }
}

fn compare_books(a: &BookWithAuthor, b: &BookWithAuthor, field: BookSortField) -> Ordering {
    match field {
        BookSortField::Name => a.book.name.cmp(&b.book.name),
        BookSortField::BookType => i16::from(a.book.book_type).cmp(&i16::from(b.book.book_type)),
        BookSortField::PublishDate => a.book.publish_date.cmp(&b.book.publish_date),
        BookSortField::Price => a.book.price.total_cmp(&b.book.price),
        BookSortField::AuthorName => a.author_name.cmp(&b.author_name),
    }
}

/// In-memory implementation of the author and book repositories.
///
/// Both share one store so that deleting an author cascades to their books
/// the same way the Postgres schema does.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    store: Arc<RwLock<Store>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthorRepository for MemoryRepository {
    async fn get(&self, id: Uuid) -> AppResult<Author> {
        self.store
            .read()
            .await
            .authors
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Author>> {
        let store = self.store.read().await;
        Ok(store.authors.values().find(|a| a.name() == name).cloned())
    }

    async fn list(&self, search: &AuthorSearch) -> AppResult<Vec<Author>> {
        let store = self.store.read().await;
        let mut rows: Vec<Author> = store
            .authors
            .values()
            .filter(|a| search.matches(a.name()))
            .cloned()
            .collect();

        rows.sort_by(|a, b| {
            search
                .sort
                .direction
                .apply(compare_authors(a, b, search.sort.field))
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(page(rows, search.page))
    }

    async fn count(&self, search: &AuthorSearch) -> AppResult<i64> {
        let store = self.store.read().await;
        let count = store
            .authors
            .values()
            .filter(|a| search.matches(a.name()))
            .count();
        Ok(count as i64)
    }

    async fn all(&self) -> AppResult<Vec<Author>> {
        let store = self.store.read().await;
        let mut rows: Vec<Author> = store.authors.values().cloned().collect();
        rows.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn insert(&self, author: &Author) -> AppResult<()> {
        let mut store = self.store.write().await;
        if store.authors.contains_key(&author.id) {
            return Err(AppError::Internal(format!("Author {} already stored", author.id)));
        }
        store.check_name_free(author)?;
        store.authors.insert(author.id, author.clone());
        Ok(())
    }

    async fn update(&self, author: &Author) -> AppResult<()> {
        let mut store = self.store.write().await;
        if !store.authors.contains_key(&author.id) {
            return Err(AppError::NotFound(format!("Author {} not found", author.id)));
        }
        store.check_name_free(author)?;
        store.authors.insert(author.id, author.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut store = self.store.write().await;
        if store.authors.remove(&id).is_none() {
            return Err(AppError::NotFound(format!("Author {} not found", id)));
        }
        store.books.retain(|_, book| book.author_id != id);
        Ok(())
    }
}

#[async_trait]
impl BookRepository for MemoryRepository {
    async fn get(&self, id: Uuid) -> AppResult<BookWithAuthor> {
        let store = self.store.read().await;
        let book = store
            .books
            .get(&id)
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;
        store.with_author(book)
    }

    async fn list(&self, search: &BookSearch) -> AppResult<Vec<BookWithAuthor>> {
        let store = self.store.read().await;
        let mut rows = store
            .books
            .values()
            .map(|book| store.with_author(book))
            .collect::<AppResult<Vec<_>>>()?;

        rows.sort_by(|a, b| {
            search
                .sort
                .direction
                .apply(compare_books(a, b, search.sort.field))
                .then_with(|| a.book.id.cmp(&b.book.id))
        });

        Ok(page(rows, search.page))
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.store.read().await.books.len() as i64)
    }

    async fn insert(&self, book: &Book) -> AppResult<()> {
        let mut store = self.store.write().await;
        store.author_name(book.author_id)?;
        if store.books.contains_key(&book.id) {
            return Err(AppError::Internal(format!("Book {} already stored", book.id)));
        }
        store.books.insert(book.id, book.clone());
        Ok(())
    }

    async fn update(&self, book: &Book) -> AppResult<()> {
        let mut store = self.store.write().await;
        store.author_name(book.author_id)?;
        match store.books.get_mut(&book.id) {
            Some(existing) => {
                *existing = book.clone();
                Ok(())
            }
            None => Err(AppError::NotFound(format!("Book {} not found", book.id))),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut store = self.store.write().await;
        match store.books.remove(&id) {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!("Book {} not found", id))),
        }
    }
}
