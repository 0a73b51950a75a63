//! Statistics endpoints

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::stats::{LibrarianStats, MemberStats},
};

use super::{ApiResponse, AuthenticatedUser};

/// Library-wide dashboard counters
#[utoipa::path(
    get,
    path = "/stats/librarian",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Library statistics", body = LibrarianStats),
        (status = 403, description = "Librarian role required", body = crate::error::ErrorResponse)
    )
)]
pub async fn librarian_stats(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<LibrarianStats>>> {
    claims.require_librarian()?;

    let stats = state.services.stats.librarian_stats().await?;
    Ok(ApiResponse::ok(stats))
}

/// Personal dashboard counters
#[utoipa::path(
    get,
    path = "/stats/member",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Member statistics", body = MemberStats),
        (status = 403, description = "Member role required", body = crate::error::ErrorResponse)
    )
)]
pub async fn member_stats(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<MemberStats>>> {
    claims.require_member()?;

    let stats = state.services.stats.member_stats(claims.user_id).await?;
    Ok(ApiResponse::ok(stats))
}
