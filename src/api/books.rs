//! Catalog endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::book::{Book, BookInput, BookQuery},
};

use super::{ApiPath, ApiQuery, ApiResponse, AuthenticatedUser, ValidatedJson};

/// List books, optionally filtered by a search term
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Matching books", body = Vec<Book>)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    ApiQuery(query): ApiQuery<BookQuery>,
) -> AppResult<Json<ApiResponse<Vec<Book>>>> {
    let books = state.services.catalog.search_books(&query).await?;
    Ok(ApiResponse::ok(books))
}

/// Get book details
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<ApiResponse<Book>>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(ApiResponse::ok(book))
}

/// Add a book to the catalog
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = BookInput,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid data", body = crate::error::ErrorResponse),
        (status = 403, description = "Librarian role required", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedJson(input): ValidatedJson<BookInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Book>>)> {
    claims.require_librarian()?;

    let book = state.services.catalog.create_book(input).await?;
    Ok((StatusCode::CREATED, ApiResponse::with_message(book, "Book created")))
}

/// Update a book's bibliographic data
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = BookInput,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid data", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiPath(id): ApiPath<i32>,
    ValidatedJson(input): ValidatedJson<BookInput>,
) -> AppResult<Json<ApiResponse<Book>>> {
    claims.require_librarian()?;

    let book = state.services.catalog.update_book(id, input).await?;
    Ok(ApiResponse::with_message(book, "Book updated"))
}

/// Delete a book with its loans, reservations and reviews
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book deleted"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<ApiResponse<()>>> {
    claims.require_librarian()?;

    state.services.catalog.delete_book(id).await?;
    Ok(ApiResponse::message("Book deleted"))
}
