//! Reservation (hold request) model and approval rules

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{book::BookShort, user::UserShort};
use crate::error::{AppError, AppResult};

/// Reservation model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Reservation {
    pub id: i32,
    pub book_id: i32,
    pub user_id: i32,
    pub reservation_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    pub is_approved: bool,
}

impl Reservation {
    /// Approval is one-way.
    pub fn ensure_approvable(&self) -> AppResult<()> {
        if self.is_approved {
            return Err(AppError::BadRequest("Reservation already approved".to_string()));
        }
        Ok(())
    }

    /// Only pending reservations can be cancelled.
    pub fn ensure_cancellable(&self) -> AppResult<()> {
        if self.is_approved {
            return Err(AppError::BadRequest(
                "Approved reservations cannot be cancelled".to_string(),
            ));
        }
        Ok(())
    }
}

/// Internal row structure joining a reservation with its book and user
#[derive(Debug, Clone, FromRow)]
pub struct ReservationDetailsRow {
    id: i32,
    book_id: i32,
    user_id: i32,
    reservation_date: DateTime<Utc>,
    expiry_date: DateTime<Utc>,
    is_approved: bool,
    book_title: String,
    book_author: String,
    user_email: String,
}

impl From<ReservationDetailsRow> for ReservationDetails {
    fn from(row: ReservationDetailsRow) -> Self {
        ReservationDetails {
            id: row.id,
            reservation_date: row.reservation_date,
            expiry_date: row.expiry_date,
            is_approved: row.is_approved,
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

/// Reservation with book and user for display
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReservationDetails {
    pub id: i32,
    pub reservation_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    pub is_approved: bool,
    pub book: BookShort,
    pub user: UserShort,
}

/// Create reservation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReservation {
    pub book_id: i32,
}

/// Reservation list filters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ReservationQuery {
    /// Only reservations awaiting approval
    pub pending: Option<bool>,
}
