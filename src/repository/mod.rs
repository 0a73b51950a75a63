//! Repository layer for database operations

pub mod books;
pub mod fines;
pub mod loans;
pub mod reservations;
pub mod reviews;
pub mod stats;
pub mod users;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub users: users::UsersRepository,
    pub books: books::BooksRepository,
    pub loans: loans::LoansRepository,
    pub reservations: reservations::ReservationsRepository,
    pub fines: fines::FinesRepository,
    pub reviews: reviews::ReviewsRepository,
    pub stats: stats::StatsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: users::UsersRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            loans: loans::LoansRepository::new(pool.clone()),
            reservations: reservations::ReservationsRepository::new(pool.clone()),
            fines: fines::FinesRepository::new(pool.clone()),
            reviews: reviews::ReviewsRepository::new(pool.clone()),
            stats: stats::StatsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Cheap round trip used by the readiness probe
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
