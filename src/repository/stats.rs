//! Dashboard counters

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::stats::{LibrarianStats, MemberStats},
};

#[derive(Clone)]
pub struct StatsRepository {
    pool: Pool<Postgres>,
}

impl StatsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn librarian(&self) -> AppResult<LibrarianStats> {
        let stats = sqlx::query_as::<_, LibrarianStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM books) AS total_books,
                (SELECT COUNT(*) FROM books WHERE is_available) AS available_books,
                (SELECT COUNT(*) FROM loans) AS total_loans,
                (SELECT COUNT(*) FROM loans WHERE status = 'Active') AS active_loans,
                (SELECT COUNT(*) FROM loans WHERE status = 'Overdue') AS overdue_loans,
                (SELECT COUNT(*) FROM reservations WHERE NOT is_approved) AS pending_reservations,
                (SELECT COUNT(*) FROM users WHERE role = 'Member') AS total_members
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(stats)
    }

    pub async fn member(&self, user_id: i32) -> AppResult<MemberStats> {
        let stats = sqlx::query_as::<_, MemberStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM loans WHERE user_id = $1 AND status = 'Active') AS my_active_loans,
                (SELECT COUNT(*) FROM reservations WHERE user_id = $1 AND NOT is_approved)
                    AS my_pending_reservations,
                (SELECT COUNT(*) FROM books WHERE is_available) AS available_books
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(stats)
    }
}
