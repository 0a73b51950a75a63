//! Fine model

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::{book::not_blank, user::UserShort};
use crate::error::{AppError, AppResult};

/// Fine model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Fine {
    pub id: i32,
    pub user_id: i32,
    #[schema(value_type = String, example = "2.50")]
    pub amount: Decimal,
    pub reason: String,
    pub issue_date: DateTime<Utc>,
    pub is_paid: bool,
    pub paid_date: Option<DateTime<Utc>>,
}

impl Fine {
    /// Paid is terminal.
    pub fn ensure_payable(&self) -> AppResult<()> {
        if self.is_paid {
            return Err(AppError::BadRequest("Fine is already paid".to_string()));
        }
        Ok(())
    }
}

/// Internal row structure joining a fine with its user
#[derive(Debug, Clone, FromRow)]
pub struct FineDetailsRow {
    id: i32,
    user_id: i32,
    amount: Decimal,
    reason: String,
    issue_date: DateTime<Utc>,
    is_paid: bool,
    paid_date: Option<DateTime<Utc>>,
    user_email: String,
}

impl From<FineDetailsRow> for FineDetails {
    fn from(row: FineDetailsRow) -> Self {
        FineDetails {
            id: row.id,
            amount: row.amount,
            reason: row.reason,
            issue_date: row.issue_date,
            is_paid: row.is_paid,
            paid_date: row.paid_date,
            user: UserShort {
                id: row.user_id,
                email: row.user_email,
            },
        }
    }
}

/// Fine with user for display
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FineDetails {
    pub id: i32,
    #[schema(value_type = String, example = "2.50")]
    pub amount: Decimal,
    pub reason: String,
    pub issue_date: DateTime<Utc>,
    pub is_paid: bool,
    pub paid_date: Option<DateTime<Utc>>,
    pub user: UserShort,
}

/// Create fine request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateFine {
    pub user_id: i32,
    #[schema(value_type = String, example = "2.50")]
    #[validate(custom(function = "fine_amount"))]
    pub amount: Decimal,
    #[validate(custom(function = "not_blank", message = "Reason is required"))]
    pub reason: String,
}

/// Largest amount a `NUMERIC(10,2)` column holds, plus one cent
const AMOUNT_LIMIT: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

/// Round to cents the way PostgreSQL rounds into `NUMERIC(10,2)`
pub fn to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Checked on the value that is stored, not the one received
fn fine_amount(amount: &Decimal) -> Result<(), ValidationError> {
    let stored = to_cents(*amount);
    if stored <= Decimal::ZERO {
        return Err(ValidationError::new("not_positive")
            .with_message("Amount must be greater than 0".into()));
    }
    if stored >= AMOUNT_LIMIT {
        return Err(ValidationError::new("too_large")
            .with_message("Amount must be less than 100000000".into()));
    }
    Ok(())
}
