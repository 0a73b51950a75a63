//! Review endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::review::{BookRating, CreateReview, ReviewDetails},
};

use super::{ApiPath, ApiResponse, AuthenticatedUser, ValidatedJson};

/// List reviews of a book
#[utoipa::path(
    get,
    path = "/books/{id}/reviews",
    tag = "reviews",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Reviews, newest first", body = Vec<ReviewDetails>),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book_reviews(
    State(state): State<crate::AppState>,
    ApiPath(book_id): ApiPath<i32>,
) -> AppResult<Json<ApiResponse<Vec<ReviewDetails>>>> {
    let reviews = state.services.reviews.get_book_reviews(book_id).await?;
    Ok(ApiResponse::ok(reviews))
}

/// Average rating of a book
#[utoipa::path(
    get,
    path = "/books/{id}/rating",
    tag = "reviews",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Average rating and review count", body = BookRating),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book_rating(
    State(state): State<crate::AppState>,
    ApiPath(book_id): ApiPath<i32>,
) -> AppResult<Json<ApiResponse<BookRating>>> {
    let rating = state.services.reviews.get_book_rating(book_id).await?;
    Ok(ApiResponse::ok(rating))
}

/// List the current member's reviews
#[utoipa::path(
    get,
    path = "/reviews/my",
    tag = "reviews",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own reviews", body = Vec<ReviewDetails>)
    )
)]
pub async fn my_reviews(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<Vec<ReviewDetails>>>> {
    claims.require_member()?;

    let reviews = state.services.reviews.get_user_reviews(claims.user_id).await?;
    Ok(ApiResponse::ok(reviews))
}

/// Review a book
#[utoipa::path(
    post,
    path = "/reviews",
    tag = "reviews",
    security(("bearer_auth" = [])),
    request_body = CreateReview,
    responses(
        (status = 201, description = "Review created", body = ReviewDetails),
        (status = 400, description = "Invalid rating or book already reviewed", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_review(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<CreateReview>,
) -> AppResult<(StatusCode, Json<ApiResponse<ReviewDetails>>)> {
    claims.require_member()?;

    let review = state.services.reviews.create_review(claims.user_id, request).await?;
    Ok((StatusCode::CREATED, ApiResponse::with_message(review, "Review added")))
}

/// Delete one of the current member's reviews
#[utoipa::path(
    delete,
    path = "/reviews/{id}",
    tag = "reviews",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review deleted"),
        (status = 403, description = "Not your review", body = crate::error::ErrorResponse),
        (status = 404, description = "Review not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_review(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<ApiResponse<()>>> {
    claims.require_member()?;

    state.services.reviews.delete_review(id, claims.user_id).await?;
    Ok(ApiResponse::message("Review deleted"))
}
