//! Book model and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::{
    author::Author,
    query::{PageRequest, Sort, SortField},
};

/// Book genre
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum BookType {
    #[default]
    Undefined = 0,
    Adventure = 1,
    Biography = 2,
    Dystopia = 3,
    Fantastic = 4,
    Horror = 5,
    Science = 6,
    ScienceFiction = 7,
    Poetry = 8,
}

impl From<i16> for BookType {
    fn from(v: i16) -> Self {
        match v {
            1 => BookType::Adventure,
            2 => BookType::Biography,
            3 => BookType::Dystopia,
            4 => BookType::Fantastic,
            5 => BookType::Horror,
            6 => BookType::Science,
            7 => BookType::ScienceFiction,
            8 => BookType::Poetry,
            _ => BookType::Undefined,
        }
    }
}

impl From<BookType> for i16 {
    fn from(t: BookType) -> Self {
        t as i16
    }
}

/// Book entity as persisted
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub id: Uuid,
    pub name: String,
    pub book_type: BookType,
    pub publish_date: NaiveDate,
    pub price: f32,
    pub author_id: Uuid,
    pub creation_time: DateTime<Utc>,
    pub last_modification_time: Option<DateTime<Utc>>,
}

/// Book joined with its author's display name
#[derive(Debug, Clone, PartialEq)]
pub struct BookWithAuthor {
    pub book: Book,
    pub author_name: String,
}

/// Book as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookDto {
    pub id: Uuid,
    pub name: String,
    pub book_type: BookType,
    pub publish_date: NaiveDate,
    pub price: f32,
    pub author_id: Uuid,
    pub author_name: String,
    pub creation_time: DateTime<Utc>,
    pub last_modification_time: Option<DateTime<Utc>>,
}

impl From<BookWithAuthor> for BookDto {
    fn from(row: BookWithAuthor) -> Self {
        let BookWithAuthor { book, author_name } = row;
        Self {
            id: book.id,
            name: book.name,
            book_type: book.book_type,
            publish_date: book.publish_date,
            price: book.price,
            author_id: book.author_id,
            author_name,
            creation_time: book.creation_time,
            last_modification_time: book.last_modification_time,
        }
    }
}

/// Create or update book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUpdateBook {
    #[validate(length(min = 1, max = 128, message = "Name must be between 1 and 128 characters"))]
    pub name: String,
    #[serde(default)]
    pub book_type: BookType,
    pub publish_date: NaiveDate,
    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: f32,
    pub author_id: Uuid,
}

/// Book list query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Rows to skip (default: 0)
    pub skip: Option<i64>,
    /// Rows to return (default: 10, max: 1000)
    pub take: Option<i64>,
    /// `name`, `book_type`, `publish_date`, `price` or `author_name`,
    /// optionally followed by `asc` / `desc`
    pub sort: Option<String>,
}

/// Sortable book fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookSortField {
    #[default]
    Name,
    BookType,
    PublishDate,
    Price,
    AuthorName,
}

impl BookSortField {
    /// ORDER BY expression in the books/authors join
    pub fn order_by(&self) -> &'static str {
        match self {
            BookSortField::Name => "b.name COLLATE \"C\"",
            BookSortField::BookType => "b.book_type",
            BookSortField::PublishDate => "b.publish_date",
            BookSortField::Price => "b.price",
            BookSortField::AuthorName => "a.name COLLATE \"C\"",
        }
    }
}

impl SortField for BookSortField {
    fn from_normalized(name: &str) -> Option<Self> {
        match name {
            "name" => Some(BookSortField::Name),
            "booktype" | "type" => Some(BookSortField::BookType),
            "publishdate" => Some(BookSortField::PublishDate),
            "price" => Some(BookSortField::Price),
            "authorname" => Some(BookSortField::AuthorName),
            _ => None,
        }
    }
}

pub type BookSort = Sort<BookSortField>;

/// Validated book search handed to the repository
#[derive(Debug, Clone, Default)]
pub struct BookSearch {
    pub page: PageRequest,
    pub sort: BookSort,
}

impl BookSearch {
    pub fn from_query(query: &BookQuery) -> crate::error::AppResult<Self> {
        Ok(Self {
            page: PageRequest::new(query.skip, query.take)?,
            sort: BookSort::parse_or_default(query.sort.as_deref())?,
        })
    }
}

/// Author entry for the book form's author picker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuthorLookupDto {
    pub id: Uuid,
    pub name: String,
}

impl From<Author> for AuthorLookupDto {
    fn from(author: Author) -> Self {
        Self {
            id: author.id,
            name: author.name().to_string(),
        }
    }
}
