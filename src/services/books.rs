//! Book application service

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::ids::IdGenerator;
use crate::{
    error::AppResult,
    models::{
        book::{
            AuthorLookupDto, Book, BookDto, BookQuery, BookSearch, BookWithAuthor,
            CreateUpdateBook,
        },
        query::PagedResult,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
    id_generator: Arc<dyn IdGenerator>,
}

impl BooksService {
    pub fn new(repository: Repository, id_generator: Arc<dyn IdGenerator>) -> Self {
        Self {
            repository,
            id_generator,
        }
    }

    /// Get book by ID, with its author's name
    pub async fn get(&self, id: Uuid) -> AppResult<BookDto> {
        Ok(self.repository.books.get(id).await?.into())
    }

    /// List books, sorted by book name unless the query says otherwise
    pub async fn list(&self, query: &BookQuery) -> AppResult<PagedResult<BookDto>> {
        let search = BookSearch::from_query(query)?;

        let books = self.repository.books.list(&search).await?;
        let total_count = self.repository.books.count().await?;

        Ok(PagedResult {
            total_count,
            items: books.into_iter().map(BookDto::from).collect(),
        })
    }

    /// Create a book for an existing author
    #[tracing::instrument(skip(self, data), fields(name = %data.name))]
    pub async fn create(&self, data: &CreateUpdateBook) -> AppResult<BookDto> {
        data.validate()?;

        let author = self.repository.authors.get(data.author_id).await?;
        let book = Book {
            id: self.id_generator.generate(),
            name: data.name.clone(),
            book_type: data.book_type,
            publish_date: data.publish_date,
            price: data.price,
            author_id: author.id,
            creation_time: Utc::now(),
            last_modification_time: None,
        };
        self.repository.books.insert(&book).await?;

        info!(book_id = %book.id, author_id = %author.id, "Created book");
        Ok(BookWithAuthor {
            book,
            author_name: author.name().to_string(),
        }
        .into())
    }

    /// Replace a book's fields
    #[tracing::instrument(skip(self, data))]
    pub async fn update(&self, id: Uuid, data: &CreateUpdateBook) -> AppResult<BookDto> {
        data.validate()?;

        let mut book = self.repository.books.get(id).await?.book;
        let author = self.repository.authors.get(data.author_id).await?;

        book.name = data.name.clone();
        book.book_type = data.book_type;
        book.publish_date = data.publish_date;
        book.price = data.price;
        book.author_id = author.id;
        book.last_modification_time = Some(Utc::now());

        self.repository.books.update(&book).await?;

        info!(book_id = %id, "Updated book");
        Ok(BookWithAuthor {
            book,
            author_name: author.name().to_string(),
        }
        .into())
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        info!(book_id = %id, "Deleted book");
        Ok(())
    }

    /// All authors as id/name pairs for picking a book's author
    pub async fn author_lookup(&self) -> AppResult<Vec<AuthorLookupDto>> {
        let authors = self.repository.authors.all().await?;
        Ok(authors.into_iter().map(AuthorLookupDto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{
        error::AppError,
        models::{
            author::{AuthorDto, CreateAuthor},
            book::BookType,
        },
        services::Services,
    };

    async fn author(services: &Services, name: &str) -> AuthorDto {
        services
            .authors
            .create(&CreateAuthor {
                name: name.to_string(),
                birth_date: NaiveDate::from_ymd_opt(1900, 1, 1).unwrap(),
                short_bio: None,
            })
            .await
            .unwrap()
    }

    fn book_input(name: &str, author_id: Uuid, price: f32) -> CreateUpdateBook {
        CreateUpdateBook {
            name: name.to_string(),
            book_type: BookType::Dystopia,
            publish_date: NaiveDate::from_ymd_opt(1949, 6, 8).unwrap(),
            price,
            author_id,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_carry_author_name() {
        let services = Services::in_memory();
        let orwell = author(&services, "Orwell").await;

        let created = services
            .books
            .create(&book_input("1984", orwell.id, 12.5))
            .await
            .unwrap();
        assert_eq!(created.author_name, "Orwell");

        let fetched = services.books.get(created.id).await.unwrap();
        assert_eq!(fetched.name, "1984");
        assert_eq!(fetched.book_type, BookType::Dystopia);
        assert_eq!(fetched.author_name, "Orwell");
    }

    #[tokio::test]
    async fn test_create_for_missing_author() {
        let services = Services::in_memory();
        let result = services
            .books
            .create(&book_input("1984", Uuid::new_v4(), 12.5))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_negative_price() {
        let services = Services::in_memory();
        let orwell = author(&services, "Orwell").await;
        let result = services
            .books
            .create(&book_input("1984", orwell.id, -1.0))
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_list_sorted_by_author_name() {
        let services = Services::in_memory();
        let orwell = author(&services, "Orwell").await;
        let huxley = author(&services, "Huxley").await;
        services
            .books
            .create(&book_input("1984", orwell.id, 10.0))
            .await
            .unwrap();
        services
            .books
            .create(&book_input("Brave New World", huxley.id, 11.0))
            .await
            .unwrap();

        let page = services
            .books
            .list(&BookQuery {
                sort: Some("authorName desc".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let authors: Vec<&str> = page.items.iter().map(|b| b.author_name.as_str()).collect();
        assert_eq!(authors, vec!["Orwell", "Huxley"]);
        assert_eq!(page.total_count, 2);
    }

    #[tokio::test]
    async fn test_update_moves_book_to_other_author() {
        let services = Services::in_memory();
        let orwell = author(&services, "Orwell").await;
        let huxley = author(&services, "Huxley").await;
        let book = services
            .books
            .create(&book_input("Brave New World", orwell.id, 10.0))
            .await
            .unwrap();

        let updated = services
            .books
            .update(book.id, &book_input("Brave New World", huxley.id, 9.0))
            .await
            .unwrap();

        assert_eq!(updated.author_id, huxley.id);
        assert_eq!(updated.author_name, "Huxley");
        assert_eq!(updated.price, 9.0);
        assert!(updated.last_modification_time.is_some());
    }

    #[tokio::test]
    async fn test_deleting_author_removes_books() {
        let services = Services::in_memory();
        let orwell = author(&services, "Orwell").await;
        let book = services
            .books
            .create(&book_input("1984", orwell.id, 10.0))
            .await
            .unwrap();

        services.authors.delete(orwell.id).await.unwrap();

        assert!(matches!(services.books.get(book.id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_author_lookup_sorted_by_name() {
        let services = Services::in_memory();
        author(&services, "Orwell").await;
        author(&services, "Huxley").await;

        let lookup = services.books.author_lookup().await.unwrap();
        let names: Vec<&str> = lookup.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Huxley", "Orwell"]);
    }
}
