//! Loan model and lifecycle rules

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{book::BookShort, enums::LoanStatus, user::UserShort};
use crate::error::{AppError, AppResult};

/// Loan model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: i32,
    pub book_id: i32,
    pub user_id: i32,
    pub loan_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub status: LoanStatus,
}

impl Loan {
    /// A loan can be returned once; Returned is terminal.
    pub fn ensure_returnable(&self) -> AppResult<()> {
        if self.status == LoanStatus::Returned {
            return Err(AppError::BadRequest("Loan already returned".to_string()));
        }
        Ok(())
    }
}

/// Due date of a loan starting at `start` and lasting `days`
pub fn due_date(start: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    start + Duration::days(days)
}

/// Internal row structure joining a loan with its book and borrower
#[derive(Debug, Clone, FromRow)]
pub struct LoanDetailsRow {
    id: i32,
    book_id: i32,
    user_id: i32,
    loan_date: DateTime<Utc>,
    due_date: DateTime<Utc>,
    return_date: Option<DateTime<Utc>>,
    status: LoanStatus,
    book_title: String,
    book_author: String,
    user_email: String,
}

impl From<LoanDetailsRow> for LoanDetails {
    fn from(row: LoanDetailsRow) -> Self {
        LoanDetails {
            id: row.id,
            loan_date: row.loan_date,
            due_date: row.due_date,
            return_date: row.return_date,
            status: row.status,
            book: BookShort {
                id: row.book_id,
                title: row.book_title,
                author: row.book_author,
            },
            user: UserShort {
                id: row.user_id,
                email: row.user_email,
            },
        }
    }
}

/// Loan with book and borrower for display
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoanDetails {
    pub id: i32,
    pub loan_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub status: LoanStatus,
    pub book: BookShort,
    pub user: UserShort,
}

/// Create loan request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLoan {
    pub book_id: i32,
    pub user_id: i32,
    /// Loan duration in days (default from configuration)
    #[validate(range(min = 1, max = 365, message = "Days must be between 1 and 365"))]
    pub days: Option<i64>,
}
