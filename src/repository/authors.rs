//! Authors repository (Postgres)

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::{like_pattern, AuthorRepository};
use crate::{
    error::{AppError, AppResult},
    models::author::{Author, AuthorSearch},
};

#[derive(Clone)]
pub struct PgAuthorRepository {
    pool: Pool<Postgres>,
}

impl PgAuthorRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Translate a unique index hit on `authors.name` into a domain error
fn map_name_conflict(err: sqlx::Error, name: &str) -> AppError {
    if AppError::is_unique_violation(&err) {
        AppError::AuthorAlreadyExists(name.to_string())
    } else {
        AppError::Database(err)
    }
}

#[async_trait]
impl AuthorRepository for PgAuthorRepository {
    async fn get(&self, id: Uuid) -> AppResult<Author> {
        sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Author>> {
        let author = sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE name = $1 LIMIT 1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(author)
    }

    async fn list(&self, search: &AuthorSearch) -> AppResult<Vec<Author>> {
        // Sort expression and direction come from closed enums, never from caller text
        let order_by = format!(
            "ORDER BY {} {}, id",
            search.sort.field.order_by(),
            search.sort.direction.as_sql()
        );

        let rows = match &search.filter {
            Some(filter) => {
                let query = format!(
                    "SELECT * FROM authors WHERE name ILIKE $1 {} LIMIT $2 OFFSET $3",
                    order_by
                );
                sqlx::query_as::<_, Author>(&query)
                    .bind(like_pattern(filter))
                    .bind(search.page.take)
                    .bind(search.page.skip)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let query = format!("SELECT * FROM authors {} LIMIT $1 OFFSET $2", order_by);
                sqlx::query_as::<_, Author>(&query)
                    .bind(search.page.take)
                    .bind(search.page.skip)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(rows)
    }

    async fn count(&self, search: &AuthorSearch) -> AppResult<i64> {
        let count: i64 = match &search.filter {
            Some(filter) => {
                sqlx::query_scalar("SELECT COUNT(*)::bigint FROM authors WHERE name ILIKE $1")
                    .bind(like_pattern(filter))
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*)::bigint FROM authors")
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(count)
    }

    async fn all(&self) -> AppResult<Vec<Author>> {
        let rows = sqlx::query_as::<_, Author>(r#"SELECT * FROM authors ORDER BY name COLLATE "C", id"#)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn insert(&self, author: &Author) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO authors (id, name, birth_date, short_bio, creation_time, last_modification_time)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(author.id)
        .bind(author.name())
        .bind(author.birth_date)
        .bind(&author.short_bio)
        .bind(author.creation_time)
        .bind(author.last_modification_time)
        .execute(&self.pool)
        .await
        .map_err(|e| map_name_conflict(e, author.name()))?;
        Ok(())
    }

    async fn update(&self, author: &Author) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE authors
            SET name = $2, birth_date = $3, short_bio = $4, last_modification_time = $5
            WHERE id = $1
            "#,
        )
        .bind(author.id)
        .bind(author.name())
        .bind(author.birth_date)
        .bind(&author.short_bio)
        .bind(author.last_modification_time)
        .execute(&self.pool)
        .await
        .map_err(|e| map_name_conflict(e, author.name()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Author {} not found", author.id)));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        // Books go with their author through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Author {} not found", id)));
        }
        Ok(())
    }
}
