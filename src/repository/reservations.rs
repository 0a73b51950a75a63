//! Reservations repository for database operations

use chrono::{DateTime, Duration, Utc};
use sqlx::{Pool, Postgres};

use super::{
    books::{lock_book, set_availability},
    loans::{get_details, insert_active_loan},
};
use crate::{
    error::{AppError, AppResult},
    models::{
        loan::LoanDetails,
        reservation::{Reservation, ReservationDetails, ReservationDetailsRow},
    },
};

const RESERVATION_DETAILS_SELECT: &str = r#"
    SELECT r.id, r.book_id, r.user_id, r.reservation_date, r.expiry_date, r.is_approved,
           b.title AS book_title, b.author AS book_author, u.email AS user_email
    FROM reservations r
    JOIN books b ON b.id = r.book_id
    JOIN users u ON u.id = r.user_id
"#;

#[derive(Clone)]
pub struct ReservationsRepository {
    pool: Pool<Postgres>,
}

impl ReservationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Reservation> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Reservation not found".to_string()))
    }

    async fn get_details(&self, id: i32) -> AppResult<ReservationDetails> {
        let query = format!("{} WHERE r.id = $1", RESERVATION_DETAILS_SELECT);
        sqlx::query_as::<_, ReservationDetailsRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(ReservationDetails::from)
            .ok_or_else(|| AppError::NotFound("Reservation not found".to_string()))
    }

    /// All reservations, newest first. The pending queue is served oldest first.
    pub async fn list(&self, pending_only: bool) -> AppResult<Vec<ReservationDetails>> {
        let query = if pending_only {
            format!(
                "{} WHERE NOT r.is_approved ORDER BY r.reservation_date, r.id",
                RESERVATION_DETAILS_SELECT
            )
        } else {
            format!(
                "{} ORDER BY r.reservation_date DESC, r.id DESC",
                RESERVATION_DETAILS_SELECT
            )
        };
        let rows = sqlx::query_as::<_, ReservationDetailsRow>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(ReservationDetails::from).collect())
    }

    /// Reservations of one member, newest first
    pub async fn list_by_user(&self, user_id: i32) -> AppResult<Vec<ReservationDetails>> {
        let query = format!(
            "{} WHERE r.user_id = $1 ORDER BY r.reservation_date DESC, r.id DESC",
            RESERVATION_DETAILS_SELECT
        );
        let rows = sqlx::query_as::<_, ReservationDetailsRow>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(ReservationDetails::from).collect())
    }

    /// Place a hold on an available book for `expiry_days` days
    pub async fn create(
        &self,
        book_id: i32,
        user_id: i32,
        expiry_days: i64,
    ) -> AppResult<ReservationDetails> {
        let is_available: bool =
            sqlx::query_scalar("SELECT is_available FROM books WHERE id = $1")
                .bind(book_id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;
        if !is_available {
            return Err(AppError::BadRequest("Book is not available".to_string()));
        }

        let pending: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM reservations
                WHERE user_id = $1 AND book_id = $2 AND NOT is_approved
            )
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_one(&self.pool)
        .await?;
        if pending {
            return Err(AppError::BadRequest(
                "You already have an active reservation for this book".to_string(),
            ));
        }

        // reservations_pending_key still rejects a concurrent duplicate
        let now = Utc::now();
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO reservations (book_id, user_id, reservation_date, expiry_date, is_approved)
            VALUES ($1, $2, $3, $4, FALSE)
            RETURNING id
            "#,
        )
        .bind(book_id)
        .bind(user_id)
        .bind(now)
        .bind(now + Duration::days(expiry_days))
        .fetch_one(&self.pool)
        .await?;

        self.get_details(id).await
    }

    /// Approve a reservation: mark it approved, take the book off the shelf
    /// and open an Active loan, all in one transaction. Reservation and book
    /// rows are locked so a reservation cannot be approved twice.
    pub async fn approve(&self, id: i32, loan_days: i64) -> AppResult<LoanDetails> {
        let mut tx = self.pool.begin().await?;

        let reservation =
            sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::NotFound("Reservation not found".to_string()))?;

        reservation.ensure_approvable()?;

        let book = lock_book(&mut tx, reservation.book_id).await?;
        if !book.is_available {
            return Err(AppError::BadRequest("Book is no longer available".to_string()));
        }

        sqlx::query("UPDATE reservations SET is_approved = TRUE WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        set_availability(&mut tx, book.id, false).await?;
        let loan_id =
            insert_active_loan(&mut tx, book.id, reservation.user_id, Utc::now(), loan_days).await?;
        let loan = get_details(&mut tx, loan_id).await?;

        tx.commit().await?;
        Ok(loan)
    }

    /// Delete a pending reservation
    pub async fn delete_pending(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = $1 AND NOT is_approved")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            // Either gone or approved in the meantime
            self.get_by_id(id).await?.ensure_cancellable()?;
        }
        Ok(())
    }

    /// Remove pending reservations that expired before `now`
    pub async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result =
            sqlx::query("DELETE FROM reservations WHERE NOT is_approved AND expiry_date < $1")
                .bind(now)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }
}
