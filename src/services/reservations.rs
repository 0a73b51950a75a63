//! Reservation (hold) service

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::{
        loan::LoanDetails,
        reservation::{CreateReservation, ReservationDetails},
        user::UserClaims,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct ReservationsService {
    repository: Repository,
    expiry_days: i64,
    loan_days: i64,
}

impl ReservationsService {
    pub fn new(repository: Repository, expiry_days: i64, loan_days: i64) -> Self {
        Self {
            repository,
            expiry_days,
            loan_days,
        }
    }

    pub async fn list(&self, pending_only: bool) -> AppResult<Vec<ReservationDetails>> {
        self.repository.reservations.list(pending_only).await
    }

    pub async fn get_user_reservations(&self, user_id: i32) -> AppResult<Vec<ReservationDetails>> {
        self.repository.reservations.list_by_user(user_id).await
    }

    /// Place a hold on an available book
    pub async fn reserve(&self, user_id: i32, request: CreateReservation) -> AppResult<ReservationDetails> {
        let reservation = self
            .repository
            .reservations
            .create(request.book_id, user_id, self.expiry_days)
            .await?;
        tracing::info!(
            "Reservation {} placed on book {} by user {}",
            reservation.id,
            reservation.book.id,
            user_id
        );
        Ok(reservation)
    }

    /// Approve a reservation and open the matching loan
    pub async fn approve(&self, id: i32) -> AppResult<LoanDetails> {
        let loan = self.repository.reservations.approve(id, self.loan_days).await?;
        tracing::info!("Reservation {} approved, loan {} created", id, loan.id);
        Ok(loan)
    }

    /// Cancel a pending reservation. Members may only cancel their own.
    pub async fn cancel(&self, id: i32, claims: &UserClaims) -> AppResult<()> {
        let reservation = self.repository.reservations.get_by_id(id).await?;

        if !claims.is_librarian() && reservation.user_id != claims.user_id {
            return Err(AppError::Authorization(
                "You can only cancel your own reservations".to_string(),
            ));
        }
        reservation.ensure_cancellable()?;

        self.repository.reservations.delete_pending(id).await?;
        tracing::info!("Reservation {} cancelled by user {}", id, claims.user_id);
        Ok(())
    }

    /// Drop pending reservations past their expiry date
    pub async fn expire(&self) -> AppResult<u64> {
        let removed = self.repository.reservations.delete_expired(Utc::now()).await?;
        if removed > 0 {
            tracing::info!("{} expired reservation(s) removed", removed);
        }
        Ok(removed)
    }
}
