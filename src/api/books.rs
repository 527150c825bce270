//! Book endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        book::{AuthorLookupDto, BookDto, BookQuery, CreateUpdateBook},
        query::PagedResult,
        user::Permission,
    },
};

use super::AuthenticatedUser;

/// List books with their author names
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    params(BookQuery),
    responses(
        (status = 200, description = "Page of books", body = BookPage),
        (status = 400, description = "Invalid sort or page")
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<PagedResult<BookDto>>> {
    claims.require(Permission::Books)?;
    let page = state.services.books.list(&query).await?;
    Ok(Json(page))
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookDto),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BookDto>> {
    claims.require(Permission::Books)?;
    let book = state.services.books.get(id).await?;
    Ok(Json(book))
}

/// Create a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateUpdateBook,
    responses(
        (status = 201, description = "Book created", body = BookDto),
        (status = 404, description = "Author not found")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateUpdateBook>,
) -> AppResult<(StatusCode, Json<BookDto>)> {
    claims.require(Permission::BooksCreate)?;
    let book = state.services.books.create(&data).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Update a book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Book ID")),
    request_body = CreateUpdateBook,
    responses(
        (status = 200, description = "Book updated", body = BookDto),
        (status = 404, description = "Book or author not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<CreateUpdateBook>,
) -> AppResult<Json<BookDto>> {
    claims.require(Permission::BooksEdit)?;
    let book = state.services.books.update(id, &data).await?;
    Ok(Json(book))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require(Permission::BooksDelete)?;
    state.services.books.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Authors available as a book's author
#[utoipa::path(
    get,
    path = "/books/author-lookup",
    tag = "books",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Author id/name pairs", body = Vec<AuthorLookupDto>)
    )
)]
pub async fn author_lookup(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<AuthorLookupDto>>> {
    claims.require(Permission::Books)?;
    let authors = state.services.books.author_lookup().await?;
    Ok(Json(authors))
}
