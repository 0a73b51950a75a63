//! Fines repository for database operations

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::fine::{to_cents, Fine, FineDetails, FineDetailsRow},
};

const FINE_DETAILS_SELECT: &str = r#"
    SELECT f.id, f.user_id, f.amount, f.reason, f.issue_date, f.is_paid, f.paid_date,
           u.email AS user_email
    FROM fines f
    JOIN users u ON u.id = f.user_id
"#;

#[derive(Clone)]
pub struct FinesRepository {
    pool: Pool<Postgres>,
}

impl FinesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn get_details(&self, id: i32) -> AppResult<FineDetails> {
        let query = format!("{} WHERE f.id = $1", FINE_DETAILS_SELECT);
        sqlx::query_as::<_, FineDetailsRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(FineDetails::from)
            .ok_or_else(|| AppError::NotFound("Fine not found".to_string()))
    }

    /// List fines, newest first, optionally for a single user
    pub async fn list(&self, user_id: Option<i32>) -> AppResult<Vec<FineDetails>> {
        let query = format!(
            "{} WHERE ($1::int IS NULL OR f.user_id = $1) ORDER BY f.issue_date DESC, f.id DESC",
            FINE_DETAILS_SELECT
        );
        let rows = sqlx::query_as::<_, FineDetailsRow>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(FineDetails::from).collect())
    }

    /// Issue an unpaid fine
    pub async fn create(&self, user_id: i32, amount: Decimal, reason: &str) -> AppResult<FineDetails> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO fines (user_id, amount, reason, issue_date, is_paid)
            SELECT id, $2, $3, $4, FALSE FROM users WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(to_cents(amount))
        .bind(reason.trim())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        self.get_details(id).await
    }

    /// Mark a fine as paid; a paid fine cannot be paid again
    pub async fn mark_paid(&self, id: i32) -> AppResult<FineDetails> {
        let mut tx = self.pool.begin().await?;

        let fine = sqlx::query_as::<_, Fine>("SELECT * FROM fines WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Fine not found".to_string()))?;

        fine.ensure_payable()?;

        sqlx::query("UPDATE fines SET is_paid = TRUE, paid_date = $1 WHERE id = $2")
            .bind(Utc::now())
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        self.get_details(id).await
    }
}
