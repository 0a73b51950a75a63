//! Reservation endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        loan::LoanDetails,
        reservation::{CreateReservation, ReservationDetails, ReservationQuery},
    },
};

use super::{ApiPath, ApiQuery, ApiResponse, AuthenticatedUser, ValidatedJson};

/// Result of an expiry sweep
#[derive(Serialize, ToSchema)]
pub struct ExpireResponse {
    /// Number of pending reservations removed
    pub removed: u64,
}

/// List reservations
#[utoipa::path(
    get,
    path = "/reservations",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(ReservationQuery),
    responses(
        (status = 200, description = "Reservations", body = Vec<ReservationDetails>),
        (status = 403, description = "Librarian role required", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_reservations(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiQuery(query): ApiQuery<ReservationQuery>,
) -> AppResult<Json<ApiResponse<Vec<ReservationDetails>>>> {
    claims.require_librarian()?;

    let reservations = state
        .services
        .reservations
        .list(query.pending.unwrap_or(false))
        .await?;
    Ok(ApiResponse::ok(reservations))
}

/// List the current member's reservations
#[utoipa::path(
    get,
    path = "/reservations/my",
    tag = "reservations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own reservations, newest first", body = Vec<ReservationDetails>)
    )
)]
pub async fn my_reservations(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<Vec<ReservationDetails>>>> {
    claims.require_member()?;

    let reservations = state
        .services
        .reservations
        .get_user_reservations(claims.user_id)
        .await?;
    Ok(ApiResponse::ok(reservations))
}

/// Reserve an available book
#[utoipa::path(
    post,
    path = "/reservations",
    tag = "reservations",
    security(("bearer_auth" = [])),
    request_body = CreateReservation,
    responses(
        (status = 201, description = "Reservation created", body = ReservationDetails),
        (status = 400, description = "Book unavailable or already reserved", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_reservation(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<CreateReservation>,
) -> AppResult<(StatusCode, Json<ApiResponse<ReservationDetails>>)> {
    claims.require_member()?;

    let reservation = state
        .services
        .reservations
        .reserve(claims.user_id, request)
        .await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(reservation, "Reservation created"),
    ))
}

/// Approve a reservation, creating the loan
#[utoipa::path(
    post,
    path = "/reservations/{id}/approve",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation approved, loan created", body = LoanDetails),
        (status = 400, description = "Already approved or book no longer available", body = crate::error::ErrorResponse),
        (status = 404, description = "Reservation not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn approve_reservation(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<ApiResponse<LoanDetails>>> {
    claims.require_librarian()?;

    let loan = state.services.reservations.approve(id).await?;
    Ok(ApiResponse::with_message(loan, "Reservation approved and loan created"))
}

/// Cancel a pending reservation
#[utoipa::path(
    delete,
    path = "/reservations/{id}",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation cancelled"),
        (status = 400, description = "Reservation already approved", body = crate::error::ErrorResponse),
        (status = 403, description = "Not your reservation", body = crate::error::ErrorResponse),
        (status = 404, description = "Reservation not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn cancel_reservation(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.services.reservations.cancel(id, &claims).await?;
    Ok(ApiResponse::message("Reservation cancelled"))
}

/// Remove pending reservations past their expiry date
#[utoipa::path(
    post,
    path = "/reservations/expire",
    tag = "reservations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Expired reservations removed", body = ExpireResponse)
    )
)]
pub async fn expire_reservations(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<ExpireResponse>>> {
    claims.require_librarian()?;

    let removed = state.services.reservations.expire().await?;
    Ok(ApiResponse::ok(ExpireResponse { removed }))
}
