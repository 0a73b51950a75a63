//! Fine endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::fine::{CreateFine, FineDetails},
};

use super::{ApiPath, ApiResponse, AuthenticatedUser, ValidatedJson};

/// List all fines
#[utoipa::path(
    get,
    path = "/fines",
    tag = "fines",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All fines, newest first", body = Vec<FineDetails>),
        (status = 403, description = "Librarian role required", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_fines(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<Vec<FineDetails>>>> {
    claims.require_librarian()?;

    let fines = state.services.fines.list_fines().await?;
    Ok(ApiResponse::ok(fines))
}

/// List the current member's fines
#[utoipa::path(
    get,
    path = "/fines/my",
    tag = "fines",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own fines", body = Vec<FineDetails>)
    )
)]
pub async fn my_fines(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<Vec<FineDetails>>>> {
    claims.require_member()?;

    let fines = state.services.fines.get_user_fines(claims.user_id).await?;
    Ok(ApiResponse::ok(fines))
}

/// Issue a fine
#[utoipa::path(
    post,
    path = "/fines",
    tag = "fines",
    security(("bearer_auth" = [])),
    request_body = CreateFine,
    responses(
        (status = 201, description = "Fine issued", body = FineDetails),
        (status = 400, description = "Invalid amount or reason", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_fine(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<CreateFine>,
) -> AppResult<(StatusCode, Json<ApiResponse<FineDetails>>)> {
    claims.require_librarian()?;

    let fine = state.services.fines.create_fine(request).await?;
    Ok((StatusCode::CREATED, ApiResponse::with_message(fine, "Fine created")))
}

/// Mark a fine as paid
#[utoipa::path(
    post,
    path = "/fines/{id}/pay",
    tag = "fines",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Fine ID")),
    responses(
        (status = 200, description = "Fine paid", body = FineDetails),
        (status = 400, description = "Fine is already paid", body = crate::error::ErrorResponse),
        (status = 404, description = "Fine not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn pay_fine(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<ApiResponse<FineDetails>>> {
    claims.require_librarian()?;

    let fine = state.services.fines.mark_paid(id).await?;
    Ok(ApiResponse::with_message(fine, "Fine marked as paid"))
}
