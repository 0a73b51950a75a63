//! Business logic services

pub mod catalog;
pub mod fines;
pub mod loans;
pub mod reservations;
pub mod reviews;
pub mod stats;
pub mod users;

use std::time::Duration;

use crate::{config::AppConfig, error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub catalog: catalog::CatalogService,
    pub loans: loans::LoansService,
    pub reservations: reservations::ReservationsService,
    pub fines: fines::FinesService,
    pub reviews: reviews::ReviewsService,
    pub stats: stats::StatsService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        let lending = &config.lending;
        Self {
            users: users::UsersService::new(repository.clone(), config.auth.clone()),
            catalog: catalog::CatalogService::new(repository.clone()),
            loans: loans::LoansService::new(repository.clone(), lending.loan_days),
            reservations: reservations::ReservationsService::new(
                repository.clone(),
                lending.reservation_expiry_days,
                lending.loan_days,
            ),
            fines: fines::FinesService::new(repository.clone()),
            reviews: reviews::ReviewsService::new(repository.clone()),
            stats: stats::StatsService::new(repository.clone()),
            repository,
        }
    }

    /// Check that the database answers
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }

    /// One pass of the periodic housekeeping: overdue loans, then expired holds
    pub async fn sweep(&self) -> AppResult<()> {
        self.loans.check_overdue().await?;
        self.reservations.expire().await?;
        Ok(())
    }

    /// Run `sweep` forever at the given interval. Failures are logged and the
    /// next tick tries again.
    pub async fn run_sweeper(self, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(e) = self.sweep().await {
                tracing::error!("Lending sweep failed: {}", e);
            }
        }
    }
}
