//! User management endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        enums::Role,
        user::{CreateUser, User},
    },
};

use super::{ApiPath, ApiResponse, AuthenticatedUser, ValidatedJson};

/// List all users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All users", body = Vec<User>),
        (status = 403, description = "Librarian role required", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<Vec<User>>>> {
    claims.require_librarian()?;

    let users = state.services.users.list(None).await?;
    Ok(ApiResponse::ok(users))
}

/// List members only
#[utoipa::path(
    get,
    path = "/users/members",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Members", body = Vec<User>)
    )
)]
pub async fn list_members(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<Vec<User>>>> {
    claims.require_librarian()?;

    let users = state.services.users.list(Some(Role::Member)).await?;
    Ok(ApiResponse::ok(users))
}

/// Get user details
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = User),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<ApiResponse<User>>> {
    claims.require_librarian()?;

    let user = state.services.users.get_by_id(id).await?;
    Ok(ApiResponse::ok(user))
}

/// Create a user account
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid data or email already in use", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<CreateUser>,
) -> AppResult<(StatusCode, Json<ApiResponse<User>>)> {
    claims.require_librarian()?;

    let user = state.services.users.create_user(request).await?;
    Ok((StatusCode::CREATED, ApiResponse::with_message(user, "User created")))
}

/// Delete a user account
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 400, description = "User has open loans or is the caller", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<ApiResponse<()>>> {
    claims.require_librarian()?;

    state.services.users.delete_user(id, claims.user_id).await?;
    Ok(ApiResponse::message("User deleted"))
}
