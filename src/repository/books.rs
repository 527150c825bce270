//! Books repository (Postgres)

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, Pool, Postgres};
use uuid::Uuid;

use super::BookRepository;
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookSearch, BookWithAuthor},
};

const SELECT_WITH_AUTHOR: &str = r#"
    SELECT b.id, b.name, b.book_type, b.publish_date, b.price, b.author_id,
           b.creation_time, b.last_modification_time, a.name AS author_name
    FROM books b
    INNER JOIN authors a ON a.id = b.author_id
"#;

#[derive(FromRow)]
struct BookRow {
    id: Uuid,
    name: String,
    book_type: i16,
    publish_date: NaiveDate,
    price: f32,
    author_id: Uuid,
    creation_time: DateTime<Utc>,
    last_modification_time: Option<DateTime<Utc>>,
    author_name: String,
}

impl From<BookRow> for BookWithAuthor {
    fn from(row: BookRow) -> Self {
        Self {
            book: Book {
                id: row.id,
                name: row.name,
                book_type: row.book_type.into(),
                publish_date: row.publish_date,
                price: row.price,
                author_id: row.author_id,
                creation_time: row.creation_time,
                last_modification_time: row.last_modification_time,
            },
            author_name: row.author_name,
        }
    }
}

fn map_missing_author(err: sqlx::Error, author_id: Uuid) -> AppError {
    if AppError::is_foreign_key_violation(&err) {
        AppError::NotFound(format!("Author {} not found", author_id))
    } else {
        AppError::Database(err)
    }
}

#[derive(Clone)]
pub struct PgBookRepository {
    pool: Pool<Postgres>,
}

impl PgBookRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepository for PgBookRepository {
    async fn get(&self, id: Uuid) -> AppResult<BookWithAuthor> {
        let query = format!("{} WHERE b.id = $1", SELECT_WITH_AUTHOR);
        sqlx::query_as::<_, BookRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(BookWithAuthor::from)
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    async fn list(&self, search: &BookSearch) -> AppResult<Vec<BookWithAuthor>> {
        let query = format!(
            "{} ORDER BY {} {}, b.id LIMIT $1 OFFSET $2",
            SELECT_WITH_AUTHOR,
            search.sort.field.order_by(),
            search.sort.direction.as_sql()
        );
        let rows = sqlx::query_as::<_, BookRow>(&query)
            .bind(search.page.take)
            .bind(search.page.skip)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(BookWithAuthor::from).collect())
    }

    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*)::bigint FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn insert(&self, book: &Book) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO books (id, name, book_type, publish_date, price, author_id, creation_time, last_modification_time)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(book.id)
        .bind(&book.name)
        .bind(i16::from(book.book_type))
        .bind(book.publish_date)
        .bind(book.price)
        .bind(book.author_id)
        .bind(book.creation_time)
        .bind(book.last_modification_time)
        .execute(&self.pool)
        .await
        .map_err(|e| map_missing_author(e, book.author_id))?;
        Ok(())
    }

    async fn update(&self, book: &Book) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET name = $2, book_type = $3, publish_date = $4, price = $5, author_id = $6,
                last_modification_time = $7
            WHERE id = $1
            "#,
        )
        .bind(book.id)
        .bind(&book.name)
        .bind(i16::from(book.book_type))
        .bind(book.publish_date)
        .bind(book.price)
        .bind(book.author_id)
        .bind(book.last_modification_time)
        .execute(&self.pool)
        .await
        .map_err(|e| map_missing_author(e, book.author_id))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", book.id)));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        Ok(())
    }
}
