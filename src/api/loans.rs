//! Loan management endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::loan::{CreateLoan, LoanDetails},
};

use super::{ApiPath, ApiResponse, AuthenticatedUser, ValidatedJson};

/// List all loans
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All loans, newest first", body = Vec<LoanDetails>),
        (status = 403, description = "Librarian role required", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_loans(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<Vec<LoanDetails>>>> {
    claims.require_librarian()?;

    let loans = state.services.loans.list_loans().await?;
    Ok(ApiResponse::ok(loans))
}

/// List the current member's loans
#[utoipa::path(
    get,
    path = "/loans/my",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own loans, newest first", body = Vec<LoanDetails>),
        (status = 403, description = "Member role required", body = crate::error::ErrorResponse)
    )
)]
pub async fn my_loans(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<Vec<LoanDetails>>>> {
    claims.require_member()?;

    let loans = state.services.loans.get_user_loans(claims.user_id).await?;
    Ok(ApiResponse::ok(loans))
}

/// Lend a book to a user
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    request_body = CreateLoan,
    responses(
        (status = 201, description = "Loan created", body = LoanDetails),
        (status = 400, description = "Book is not available", body = crate::error::ErrorResponse),
        (status = 404, description = "Book or user not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_loan(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<CreateLoan>,
) -> AppResult<(StatusCode, Json<ApiResponse<LoanDetails>>)> {
    claims.require_librarian()?;

    let loan = state.services.loans.create_loan(request).await?;
    Ok((StatusCode::CREATED, ApiResponse::with_message(loan, "Loan created")))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/loans/{id}/return",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Book returned", body = LoanDetails),
        (status = 400, description = "Loan already returned", body = crate::error::ErrorResponse),
        (status = 404, description = "Loan not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn return_loan(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<ApiResponse<LoanDetails>>> {
    claims.require_librarian()?;

    let loan = state.services.loans.return_loan(id).await?;
    Ok(ApiResponse::with_message(loan, "Book returned"))
}

/// Flag Active loans past their due date as Overdue
#[utoipa::path(
    post,
    path = "/loans/check-overdue",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Loans that became overdue", body = Vec<LoanDetails>)
    )
)]
pub async fn check_overdue(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<Vec<LoanDetails>>>> {
    claims.require_librarian()?;

    let loans = state.services.loans.check_overdue().await?;
    let message = format!("{} loan(s) marked overdue", loans.len());
    Ok(ApiResponse::with_message(loans, message))
}
